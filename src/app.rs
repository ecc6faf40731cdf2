// ============================================================================
// APP - Cableado de la sesión con los eventos del navegador
// ============================================================================
// - lookup:login → tracking + feed
// - lookup:logout → stop() del tracking, feed parado, token borrado,
//   y solo entonces lookup:logged-out
// - lookup:route-change / popstate / scroll / resize → contraste
// - focus / vuelta online → refresco del contador
// Emite lookup:crossings y lookup:icons cuando cambian la lista de cruces
// o el estilo de iconos (los valores se leen con `crossings()` / `lightIcons()`).
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use crate::config::AppConfig;
use crate::dom::{dispatch_window_event, BrowserContrastSurface, BrowserPassScheduler, NotificationBadge, WindowListener};
use crate::error::TrackingError;
use crate::models::{CrossingSummary, PingAck};
use crate::services::{ApiClient, BrowserGeolocation, CrossingApi, NetworkMonitor, NetworkStatus, PingDispatcher};
use crate::utils::constants::{
    CROSSINGS_UPDATED_EVENT, ICONS_CHANGED_EVENT, LOGGED_OUT_EVENT, LOGIN_EVENT, LOGOUT_EVENT, ROUTE_CHANGE_EVENT,
};
use crate::utils::storage::{clear_token, load_token};
use crate::utils::{browser_spawner, SystemClock};
use crate::viewmodels::{BackgroundContrastSampler, CrossingFeedPoller, TrackingSession};

/// Aplicación principal
#[derive(Clone)]
pub struct App {
    inner: Rc<AppInner>,
}

struct AppInner {
    tracking: TrackingSession,
    feed: CrossingFeedPoller,
    contrast: BackgroundContrastSampler,
    network: NetworkMonitor,
    badge: Rc<NotificationBadge>,
    listeners: RefCell<Vec<WindowListener>>,
}

impl App {
    /// Crear la aplicación a partir de la configuración
    pub fn new(config: AppConfig) -> Self {
        let api: Rc<dyn CrossingApi> = Rc::new(ApiClient::new(&config));
        let spawner = browser_spawner();

        let tracking = TrackingSession::new(
            Rc::new(BrowserGeolocation::new()),
            PingDispatcher::new(api.clone()),
            spawner.clone(),
            Rc::new(SystemClock),
            config.tracking.clone(),
        );
        let feed = CrossingFeedPoller::new(api, spawner, config.feed.clone());
        let contrast = BackgroundContrastSampler::new(
            Rc::new(BrowserContrastSurface::new(&config.contrast.overlay_element_id)),
            Rc::new(BrowserPassScheduler),
            config.contrast.clone(),
        );
        let badge = Rc::new(NotificationBadge::new(
            &config.feed.badge_element_id,
            config.feed.bounce_duration_ms,
        ));

        Self {
            inner: Rc::new(AppInner {
                tracking,
                feed,
                contrast,
                network: NetworkMonitor::new(),
                badge,
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn tracking(&self) -> &TrackingSession {
        &self.inner.tracking
    }

    pub fn feed(&self) -> &CrossingFeedPoller {
        &self.inner.feed
    }

    /// Conectar viewmodels entre sí y con los eventos de window
    pub fn mount(&self) -> Result<(), JsValue> {
        self.wire_viewmodels();
        self.register_window_listeners()?;

        let feed = self.inner.feed.clone();
        self.inner.network.start_monitoring(move |status| {
            if status == NetworkStatus::Online && feed.is_polling() {
                feed.request_refresh();
            }
        });
        log::info!(
            "🌐 [APP] Red inicial: {:?} (online={}, offline={})",
            self.inner.network.current_status(),
            self.inner.network.is_online(),
            self.inner.network.is_offline()
        );

        self.inner.contrast.on_route_change();

        // Un token guardado cuenta como sesión abierta
        if load_token().is_some() {
            log::info!("💾 [APP] Token encontrado, reanudando sesión");
            self.login();
        }
        Ok(())
    }

    fn wire_viewmodels(&self) {
        self.inner.feed.follow(&self.inner.tracking);

        let badge = self.inner.badge.clone();
        self.inner.feed.on_bounce(move |_count| badge.bounce());

        let badge = self.inner.badge.clone();
        self.inner
            .feed
            .state()
            .unread
            .subscribe(move |counter| badge.show_count(counter.count));

        self.inner
            .feed
            .state()
            .crossings
            .subscribe(|crossings| {
                log::debug!("📰 [APP] {} cruces disponibles para el feed", crossings.len());
                emit(CROSSINGS_UPDATED_EVENT);
            });

        self.inner
            .contrast
            .light_icons_state()
            .subscribe(|_light_icons| emit(ICONS_CHANGED_EVENT));
    }

    fn register_window_listeners(&self) -> Result<(), JsValue> {
        let mut listeners = Vec::new();

        listeners.push(self.listen(LOGIN_EVENT, |app| app.login())?);
        listeners.push(self.listen(LOGOUT_EVENT, |app| {
            wasm_bindgen_futures::spawn_local(async move {
                app.logout().await;
            });
        })?);
        for route_event in [ROUTE_CHANGE_EVENT, "popstate"] {
            listeners.push(self.listen(route_event, |app| app.inner.contrast.on_route_change())?);
        }
        listeners.push(self.listen("scroll", |app| app.inner.contrast.on_scroll())?);
        listeners.push(self.listen("resize", |app| app.inner.contrast.on_resize())?);
        listeners.push(self.listen("focus", |app| {
            if app.inner.feed.is_polling() {
                app.inner.feed.request_refresh();
            }
        })?);

        *self.inner.listeners.borrow_mut() = listeners;
        log::info!("✅ [APP] Listeners de window registrados");
        Ok(())
    }

    /// Listener que solo guarda un Weak de la app (sin ciclos con `listeners`)
    fn listen<F>(&self, event_type: &str, handler: F) -> Result<WindowListener, JsValue>
    where
        F: Fn(App) + 'static,
    {
        let weak: Weak<AppInner> = Rc::downgrade(&self.inner);
        WindowListener::new(event_type, move |_event| {
            if let Some(inner) = weak.upgrade() {
                handler(App { inner });
            }
        })
    }

    /// Sesión abierta: tracking + polling del feed
    pub fn login(&self) {
        log::info!("🔐 [APP] Login");
        self.inner.feed.start();
        let tracking = self.inner.tracking.clone();
        wasm_bindgen_futures::spawn_local(async move {
            tracking.start().await;
        });
    }

    /// Cierre de sesión ordenado. El token se borra solo cuando el watch
    /// ya está cancelado, así no sale ningún ping sin sesión.
    pub async fn logout(&self) {
        log::info!("🚪 [APP] Logout");
        self.inner.tracking.stop().await;
        self.inner.feed.stop();
        self.inner.feed.reset();
        clear_token();
        emit(LOGGED_OUT_EVENT);
    }

    pub async fn ping_now(&self) -> Result<PingAck, TrackingError> {
        self.inner.tracking.ping_now().await
    }

    pub fn route_changed(&self) {
        self.inner.contrast.on_route_change();
    }

    /// Lista de cruces en caché, en el orden del servidor
    pub fn crossings(&self) -> Vec<CrossingSummary> {
        self.inner.feed.state().crossings()
    }

    pub fn light_icons(&self) -> bool {
        self.inner.contrast.light_icons()
    }
}

fn emit(event_type: &str) {
    if let Err(e) = dispatch_window_event(event_type) {
        log::warn!("⚠️ [APP] No se pudo emitir '{}': {:?}", event_type, e);
    }
}
