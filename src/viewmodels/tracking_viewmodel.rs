// ============================================================================
// TRACKING VIEWMODEL - Sesión de tracking de posición
// ============================================================================
// Stopped → Starting → Active con `start()`, vuelta a Stopped con `stop()`.
// Error solo si la plataforma no tiene GPS (o rechaza el watch); un nuevo
// `start()` es el reintento explícito.
// Los fallos de fix o de ping NUNCA sacan la sesión de Active.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use futures::task::LocalSpawnExt;
use crate::config::TrackingConfig;
use crate::error::{ApiError, PositionError, TrackingError};
use crate::models::{PingAck, PositionReading};
use crate::services::geolocation::{ErrorCallback, PositionSampler, ReadingCallback};
use crate::services::PingDispatcher;
use crate::state::{ReactiveState, TrackingState, TrackingStatus};
use crate::utils::{Clock, SharedSpawner};

type PingListener = Rc<dyn Fn(&Result<PingAck, ApiError>)>;

/// Sesión de tracking - un solo watch de GPS vivo como máximo
#[derive(Clone)]
pub struct TrackingSession {
    inner: Rc<TrackingInner>,
}

struct TrackingInner {
    sampler: Rc<dyn PositionSampler>,
    dispatcher: PingDispatcher,
    spawner: SharedSpawner,
    clock: Rc<dyn Clock>,
    config: TrackingConfig,
    state: ReactiveState<TrackingState>,
    ping_listeners: RefCell<Vec<PingListener>>,
}

impl TrackingSession {
    pub fn new(
        sampler: Rc<dyn PositionSampler>,
        dispatcher: PingDispatcher,
        spawner: SharedSpawner,
        clock: Rc<dyn Clock>,
        config: TrackingConfig,
    ) -> Self {
        Self {
            inner: Rc::new(TrackingInner {
                sampler,
                dispatcher,
                spawner,
                clock,
                config,
                state: ReactiveState::new(TrackingState::default()),
                ping_listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> ReactiveState<TrackingState> {
        self.inner.state.clone()
    }

    pub fn status(&self) -> TrackingStatus {
        self.inner.state.with(|state| state.status)
    }

    pub fn snapshot(&self) -> TrackingState {
        self.inner.state.get()
    }

    /// Llamado al terminar cada ping (éxito o fallo)
    pub fn on_ping_complete<F>(&self, listener: F)
    where
        F: Fn(&Result<PingAck, ApiError>) + 'static,
    {
        self.inner.ping_listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Arrancar el tracking continuo (idempotente)
    pub async fn start(&self) {
        let status = self.status();
        if matches!(status, TrackingStatus::Starting | TrackingStatus::Active) {
            log::debug!("📍 [TRACKING] start() ignorado, ya en {:?}", status);
            return;
        }

        if !self.inner.sampler.is_available() {
            log::warn!("⚠️ [TRACKING] Geolocalización no soportada");
            self.inner.state.update(|state| {
                state.status = TrackingStatus::Error;
                state.last_error = Some(TrackingError::CapabilityUnavailable);
            });
            return;
        }

        let generation = self.inner.state.update(|state| {
            state.status = TrackingStatus::Starting;
            state.generation += 1;
            state.generation
        });
        log::info!("📍 [TRACKING] Iniciando tracking (generación {})", generation);

        let on_reading: ReadingCallback = {
            let weak = Rc::downgrade(&self.inner);
            Rc::new(move |reading| {
                if let Some(inner) = weak.upgrade() {
                    TrackingSession { inner }.handle_reading(generation, reading);
                }
            })
        };
        let on_error: ErrorCallback = {
            let weak = Rc::downgrade(&self.inner);
            Rc::new(move |error| {
                if let Some(inner) = weak.upgrade() {
                    TrackingSession { inner }.handle_fix_error(generation, error);
                }
            })
        };

        let options = self.inner.config.watch_options();
        match self.inner.sampler.start_continuous(&options, on_reading, on_error).await {
            Ok(handle) => {
                let still_ours = self.inner.state.with(|state| {
                    state.generation == generation && state.status == TrackingStatus::Starting
                });
                if !still_ours {
                    // stop() llegó mientras el watch se registraba
                    log::info!("🛑 [TRACKING] Stop durante el arranque, cancelando watch");
                    self.inner.sampler.cancel(handle).await;
                    return;
                }
                self.inner.state.update(|state| {
                    state.status = TrackingStatus::Active;
                    state.watch_handle = Some(handle);
                    state.last_error = None;
                    state.permission_denied = false;
                });
                log::info!("✅ [TRACKING] Tracking activo");
            }
            Err(e) => {
                log::error!("❌ [TRACKING] No se pudo iniciar el tracking: {}", e);
                self.inner.state.update(|state| {
                    if state.generation == generation {
                        state.status = TrackingStatus::Error;
                        state.last_error = Some(e);
                    }
                });
            }
        }
    }

    /// Detener el tracking. Resuelve cuando el watch está cancelado.
    pub async fn stop(&self) {
        let handle = self.inner.state.update(|state| {
            state.generation += 1;
            state.status = TrackingStatus::Stopped;
            state.watch_handle.take()
        });

        match handle {
            Some(handle) => {
                self.inner.sampler.cancel(handle).await;
                log::info!("🛑 [TRACKING] Tracking detenido");
            }
            None => log::debug!("🛑 [TRACKING] stop() sin watch activo"),
        }
    }

    /// Ping manual (modo one-shot): última posición si es fresca, si no un fix nuevo
    pub async fn ping_now(&self) -> Result<PingAck, TrackingError> {
        let now = self.inner.clock.now();
        let maximum_age_ms = self.inner.config.maximum_age_ms;
        let cached = self
            .inner
            .state
            .with(|state| state.last_location)
            .filter(|reading| reading.is_fresh(now, maximum_age_ms));

        let reading = match cached {
            Some(reading) => reading,
            None => {
                if !self.inner.sampler.is_available() {
                    return Err(TrackingError::CapabilityUnavailable);
                }
                let options = self.inner.config.one_shot_options();
                match self.inner.sampler.sample_once(&options).await {
                    Ok(reading) => {
                        self.inner.state.update(|state| state.last_location = Some(reading));
                        reading
                    }
                    Err(e) => {
                        log::warn!("⚠️ [TRACKING] Ping manual sin posición: {}", e);
                        if e == PositionError::PermissionDenied {
                            self.inner.state.update(|state| state.permission_denied = true);
                        }
                        return Err(e.into());
                    }
                }
            }
        };

        self.dispatch(reading).await.map_err(TrackingError::from)
    }

    fn handle_reading(&self, generation: u64, reading: PositionReading) {
        let accepted = self.inner.state.update(|state| {
            if !state.accepts(generation) {
                return false;
            }
            state.last_location = Some(reading);
            true
        });
        if !accepted {
            log::debug!("📍 [TRACKING] Lectura de un watch antiguo, ignorada");
            return;
        }

        let session = self.clone();
        let spawned = self.inner.spawner.spawn_local(async move {
            // Un ping encolado antes de stop() no debe salir después
            if !session.inner.state.with(|state| state.accepts(generation)) {
                return;
            }
            let _ = session.dispatch(reading).await;
        });
        if let Err(e) = spawned {
            log::error!("❌ [TRACKING] No se pudo lanzar el ping: {}", e);
        }
    }

    fn handle_fix_error(&self, generation: u64, error: PositionError) {
        self.inner.state.update(|state| {
            if !state.accepts(generation) {
                return;
            }
            if error == PositionError::PermissionDenied {
                state.permission_denied = true;
            }
            state.last_error = Some(TrackingError::Position(error));
        });
        log::warn!("⚠️ [TRACKING] Error de GPS (el tracking sigue): {}", error);
    }

    async fn dispatch(&self, reading: PositionReading) -> Result<PingAck, ApiError> {
        let result = self.inner.dispatcher.send_ping(&reading).await;

        if result.is_ok() {
            let now = self.inner.clock.now();
            self.inner.state.update(|state| {
                state.last_ping_at = Some(now);
                state.last_error = None;
            });
        }

        let listeners: Vec<PingListener> = self.inner.ping_listeners.borrow().clone();
        for listener in listeners {
            listener(&result);
        }
        result
    }
}
