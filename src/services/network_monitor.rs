// ============================================================================
// MONITOR DE ESTADO DE RED
// ============================================================================
// Detecta cambios en la conectividad (online/offline). Al volver la red se
// refresca el contador de no leídas; los pings perdidos no se reintentan.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use crate::dom::{window, WindowListener};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
    Unknown,
}

impl NetworkStatus {
    pub fn from_on_line(on_line: Option<bool>) -> Self {
        match on_line {
            Some(true) => NetworkStatus::Online,
            Some(false) => NetworkStatus::Offline,
            None => NetworkStatus::Unknown,
        }
    }

    /// Transición que merece avisar al callback
    pub fn is_reconnect(previous: NetworkStatus, next: NetworkStatus) -> bool {
        next == NetworkStatus::Online && previous != NetworkStatus::Online
    }
}

/// Monitor de red. Previene múltiples registros de listeners.
pub struct NetworkMonitor {
    status: Rc<Cell<NetworkStatus>>,
    monitoring_started: Cell<bool>,
    listeners: RefCell<Vec<WindowListener>>,
}

impl NetworkMonitor {
    pub fn new() -> Self {
        Self {
            status: Rc::new(Cell::new(NetworkStatus::from_on_line(read_navigator_on_line()))),
            monitoring_started: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Iniciar monitoreo. Solo se registra una vez.
    pub fn start_monitoring<F>(&self, callback: F)
    where
        F: Fn(NetworkStatus) + 'static,
    {
        if self.monitoring_started.replace(true) {
            log::warn!("⚠️ [NETWORK] start_monitoring ya fue llamado, ignorando llamada duplicada");
            return;
        }

        let callback = Rc::new(callback);
        let mut listeners = Vec::new();

        for (event_type, next) in [("online", NetworkStatus::Online), ("offline", NetworkStatus::Offline)] {
            let status = self.status.clone();
            let callback = callback.clone();
            let listener = WindowListener::new(event_type, move |_event| {
                let previous = status.replace(next);
                if previous == next {
                    return;
                }
                if NetworkStatus::is_reconnect(previous, next) {
                    log::info!("🌐 [NETWORK] ONLINE");
                } else {
                    log::warn!("📴 [NETWORK] OFFLINE");
                }
                callback(next);
            });
            match listener {
                Ok(listener) => listeners.push(listener),
                Err(e) => log::error!("❌ [NETWORK] No se pudo registrar '{}': {:?}", event_type, e),
            }
        }

        *self.listeners.borrow_mut() = listeners;
        log::info!("✅ [NETWORK] Listeners registrados (solo una vez)");
    }

    pub fn current_status(&self) -> NetworkStatus {
        self.status.get()
    }

    pub fn is_online(&self) -> bool {
        matches!(self.current_status(), NetworkStatus::Online)
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.current_status(), NetworkStatus::Offline)
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// navigator.onLine vía Reflect (no todos los navegadores lo exponen igual)
fn read_navigator_on_line() -> Option<bool> {
    let win = window()?;
    let navigator = js_sys::Reflect::get(&win, &JsValue::from_str("navigator")).ok()?;
    js_sys::Reflect::get(&navigator, &JsValue::from_str("onLine"))
        .ok()
        .and_then(|value| value.as_bool())
}
