// ============================================================================
// BADGE - Presentación del contador de notificaciones
// ============================================================================
// `data-count` refleja el contador; `data-bounce` se pone durante la
// animación (el CSS hace el resto). Un bounce nuevo reinicia el timer.
// ============================================================================

use std::cell::RefCell;
use gloo_timers::callback::Timeout;
use crate::dom::{get_element_by_id, remove_attribute, set_attribute};

pub struct NotificationBadge {
    element_id: String,
    bounce_duration_ms: u32,
    pending: RefCell<Option<Timeout>>,
}

impl NotificationBadge {
    pub fn new(element_id: &str, bounce_duration_ms: u32) -> Self {
        Self {
            element_id: element_id.to_string(),
            bounce_duration_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn show_count(&self, count: u32) {
        let Some(badge) = get_element_by_id(&self.element_id) else {
            return;
        };
        if let Err(e) = set_attribute(&badge, "data-count", &count.to_string()) {
            log::warn!("⚠️ [FEED] No se pudo actualizar el contador del badge: {:?}", e);
        }
    }

    pub fn bounce(&self) {
        let Some(badge) = get_element_by_id(&self.element_id) else {
            log::debug!("🔔 [FEED] Badge '{}' no montado", self.element_id);
            return;
        };
        if let Err(e) = set_attribute(&badge, "data-bounce", "true") {
            log::warn!("⚠️ [FEED] No se pudo animar el badge: {:?}", e);
            return;
        }

        // Drop del Timeout anterior = clearTimeout
        let timeout = Timeout::new(self.bounce_duration_ms, move || {
            remove_attribute(&badge, "data-bounce");
        });
        *self.pending.borrow_mut() = Some(timeout);
    }
}
