// ============================================================================
// FEED VIEWMODEL - Polling del contador de no leídas y de la lista de cruces
// ============================================================================
// - refresh(): contador de no leídas (timer cada 30s + focus + vuelta online)
// - refresh_crossings(): lista de cruces (carga inicial + después de cada ping,
//   haya salido bien o no)
// Best-effort: un fetch fallido se registra y el estado queda como estaba.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use futures::task::LocalSpawnExt;
use gloo_timers::callback::Interval;
use crate::config::FeedConfig;
use crate::services::api_client::CrossingApi;
use crate::state::FeedState;
use crate::utils::SharedSpawner;
use crate::viewmodels::TrackingSession;

type BounceListener = Rc<dyn Fn(u32)>;

#[derive(Clone)]
pub struct CrossingFeedPoller {
    inner: Rc<FeedInner>,
}

struct FeedInner {
    api: Rc<dyn CrossingApi>,
    spawner: SharedSpawner,
    config: FeedConfig,
    state: FeedState,
    bounce_listeners: RefCell<Vec<BounceListener>>,
    interval: RefCell<Option<Interval>>,
}

impl CrossingFeedPoller {
    pub fn new(api: Rc<dyn CrossingApi>, spawner: SharedSpawner, config: FeedConfig) -> Self {
        Self {
            inner: Rc::new(FeedInner {
                api,
                spawner,
                config,
                state: FeedState::new(),
                bounce_listeners: RefCell::new(Vec::new()),
                interval: RefCell::new(None),
            }),
        }
    }

    pub fn state(&self) -> FeedState {
        self.inner.state.clone()
    }

    /// Señal de un solo disparo cuando sube el contador (la UI anima 400ms)
    pub fn on_bounce<F>(&self, listener: F)
    where
        F: Fn(u32) + 'static,
    {
        self.inner.bounce_listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Refrescar el contador de no leídas. Devuelve el valor leído, si lo hubo.
    pub async fn refresh(&self) -> Option<u32> {
        let fetched = match self.inner.api.fetch_unread_count().await {
            Ok(count) => count,
            Err(e) => {
                log::warn!("⚠️ [FEED] Contador no disponible: {}", e);
                return None;
            }
        };

        let bounce = self.inner.state.unread.with(|counter| counter.should_bounce(fetched));
        if bounce {
            log::info!("🔔 [FEED] Nuevas notificaciones: {}", fetched);
            let listeners: Vec<BounceListener> = self.inner.bounce_listeners.borrow().clone();
            for listener in listeners {
                listener(fetched);
            }
        }

        self.inner.state.unread.update(|counter| counter.record(fetched));
        Some(fetched)
    }

    /// Recargar la lista de cruces (reemplazo completo)
    pub async fn refresh_crossings(&self) {
        match self.inner.api.fetch_crossings().await {
            Ok(crossings) => {
                log::debug!("🔄 [FEED] {} cruces", crossings.len());
                self.inner.state.replace_crossings(crossings);
            }
            Err(e) => log::warn!("⚠️ [FEED] Cruces no disponibles: {}", e),
        }
    }

    /// Lanzar `refresh()` sin esperar (timer, focus, online)
    pub fn request_refresh(&self) {
        let poller = self.clone();
        self.spawn(async move {
            poller.refresh().await;
        });
    }

    /// Lanzar `refresh_crossings()` sin esperar (después de cada ping)
    pub fn request_crossings_refresh(&self) {
        let poller = self.clone();
        self.spawn(async move {
            poller.refresh_crossings().await;
        });
    }

    /// Recargar la lista al terminar cada ping de la sesión de tracking.
    /// El resultado del ping no importa: un fallo también dispara el refresh.
    pub fn follow(&self, tracking: &TrackingSession) {
        let weak = Rc::downgrade(&self.inner);
        tracking.on_ping_complete(move |result| {
            if let Err(e) = result {
                log::debug!("🔄 [FEED] Ping fallido ({}), refrescando cruces igualmente", e);
            }
            if let Some(inner) = weak.upgrade() {
                CrossingFeedPoller { inner }.request_crossings_refresh();
            }
        });
    }

    /// Olvidar contador y cruces de la sesión anterior (logout)
    pub fn reset(&self) {
        self.inner.state.reset();
        log::debug!("🧹 [FEED] Estado del feed reiniciado");
    }

    /// Carga inicial: contador + cruces
    pub fn load_initial(&self) {
        self.request_refresh();
        self.request_crossings_refresh();
    }

    /// Carga inicial + timer periódico (solo navegador)
    pub fn start(&self) {
        self.load_initial();

        if self.inner.interval.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let interval = Interval::new(self.inner.config.poll_interval_ms, move || {
            if let Some(inner) = weak.upgrade() {
                CrossingFeedPoller { inner }.request_refresh();
            }
        });
        *self.inner.interval.borrow_mut() = Some(interval);
        log::info!(
            "⏰ [FEED] Polling cada {} segundos",
            self.inner.config.poll_interval_ms / 1000
        );
    }

    /// Parar el timer (el drop de `Interval` hace clearInterval)
    pub fn stop(&self) {
        if self.inner.interval.borrow_mut().take().is_some() {
            log::info!("⏹️ [FEED] Polling detenido");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.inner.interval.borrow().is_some()
    }

    fn spawn<F>(&self, future: F)
    where
        F: std::future::Future<Output = ()> + 'static,
    {
        if let Err(e) = self.inner.spawner.spawn_local(future) {
            log::error!("❌ [FEED] No se pudo lanzar el refresh: {}", e);
        }
    }
}
