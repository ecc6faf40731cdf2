// ============================================================================
// EVENT HANDLING - Listeners de window
// ============================================================================
// GESTIÓN DE MEMORY LEAKS:
// - Los listeners globales (window) se registran UNA VEZ al arrancar la app.
// - `WindowListener` guarda el closure y lo desregistra en `Drop`, así que
//   no hace falta `closure.forget()`: quien guarda el listener decide su vida.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Event;
use crate::dom::window;

/// Listener registrado en `window`, se desregistra al hacer drop
pub struct WindowListener {
    event_type: String,
    closure: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    pub fn new<F>(event_type: &str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let win = window().ok_or_else(|| JsValue::from_str("No window"))?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        win.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            event_type: event_type.to_string(),
            closure,
        })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(win) = window() {
            let _ = win.remove_event_listener_with_callback(
                &self.event_type,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Emitir un evento simple en `window` (lo escucha el resto de la app)
pub fn dispatch_window_event(event_type: &str) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("No window"))?;
    let event = Event::new(event_type)?;
    win.dispatch_event(&event)?;
    Ok(())
}
