// ============================================================================
// LOOKUP CROSSINGS - CLIENTE WASM (RUST PURO)
// ============================================================================
// Arquitectura MVVM:
// - ViewModels: tracking, feed de cruces, contraste de la barra inferior
// - Services: GPS, API de cruces, estado de red
// - State: State Management con Rc<RefCell> + suscriptores
// - Models: Estructuras compartidas con backend
// - Dom: implementaciones de navegador de los traits de los viewmodels
// ============================================================================

mod error;
mod models;
mod services;
mod viewmodels;
mod state;
mod dom;
mod utils;
mod config;
mod app;

#[cfg(test)]
mod test_support;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_logger::Config;
use crate::app::App;
use crate::config::AppConfig;

// Instancia global de la App (un solo hilo en wasm)
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_env();
    let level = if config.enable_logging {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(Config::new(level));
    log::info!("🚀 LOOKUP crossings - Rust + MVVM (backend {})", config.backend_url);

    let app = App::new(config);
    app.mount()?;

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    Ok(())
}

fn current_app() -> Result<App, JsValue> {
    APP.with(|cell| cell.borrow().clone())
        .ok_or_else(|| JsValue::from_str("App no inicializada"))
}

/// Ping manual desde la UI. Devuelve el acuse del servidor.
#[wasm_bindgen(js_name = pingNow)]
pub async fn ping_now() -> Result<JsValue, JsValue> {
    let app = current_app()?;
    let ack = app
        .ping_now()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&ack).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Logout desde la UI (equivalente a emitir `lookup:logout`)
#[wasm_bindgen]
pub async fn logout() -> Result<(), JsValue> {
    current_app()?.logout().await;
    Ok(())
}

/// Para routers que no emiten `lookup:route-change`
#[wasm_bindgen(js_name = routeChanged)]
pub fn route_changed() -> Result<(), JsValue> {
    current_app()?.route_changed();
    Ok(())
}

/// Cruces en caché para el feed de inicio (se refresca con `lookup:crossings`)
#[wasm_bindgen]
pub fn crossings() -> Result<JsValue, JsValue> {
    let crossings = current_app()?.crossings();
    serde_wasm_bindgen::to_value(&crossings).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Estilo de iconos actual del overlay (se avisa con `lookup:icons`)
#[wasm_bindgen(js_name = lightIcons)]
pub fn light_icons() -> Result<bool, JsValue> {
    Ok(current_app()?.light_icons())
}

/// Estado del tracking para depuración desde la consola
#[wasm_bindgen(js_name = trackingStatus)]
pub fn tracking_status() -> Result<String, JsValue> {
    let app = current_app()?;
    let state = app.tracking().snapshot();
    Ok(format!(
        "{:?} (permiso denegado: {}, no leídas: {})",
        state.status,
        state.permission_denied,
        app.feed().state().unread_count()
    ))
}
