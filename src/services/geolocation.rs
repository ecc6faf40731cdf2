// ============================================================================
// GEOLOCATION - Muestreo de posición del dispositivo
// ============================================================================
// `PositionSampler` es la costura: el navegador real (`BrowserGeolocation`)
// o un fake en tests. El modo continuo NO se detiene solo ante un error:
// cada fallo se entrega a `on_error` y el watch sigue vivo.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Geolocation, PositionOptions};
use crate::error::{PositionError, TrackingError};
use crate::models::{PositionReading, SamplingOptions};

pub type ReadingCallback = Rc<dyn Fn(PositionReading)>;
pub type ErrorCallback = Rc<dyn Fn(PositionError)>;

/// Handle opaco de un watch continuo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(pub i32);

#[async_trait(?Send)]
pub trait PositionSampler {
    /// ¿Existe capacidad de geolocalización en la plataforma?
    fn is_available(&self) -> bool;

    /// Una sola lectura
    async fn sample_once(&self, options: &SamplingOptions) -> Result<PositionReading, PositionError>;

    /// Lecturas continuas hasta `cancel`
    async fn start_continuous(
        &self,
        options: &SamplingOptions,
        on_reading: ReadingCallback,
        on_error: ErrorCallback,
    ) -> Result<WatchHandle, TrackingError>;

    /// Cancelar un watch (no falla si el handle ya no existe)
    async fn cancel(&self, handle: WatchHandle);
}

type WatchClosures = (Closure<dyn FnMut(JsValue)>, Closure<dyn FnMut(JsValue)>);

/// `navigator.geolocation` del navegador
#[derive(Default)]
pub struct BrowserGeolocation {
    // Los closures viven mientras el watch esté activo y se sueltan en `cancel`
    watches: RefCell<HashMap<WatchHandle, WatchClosures>>,
}

impl BrowserGeolocation {
    pub fn new() -> Self {
        Self::default()
    }

    fn geolocation() -> Option<Geolocation> {
        let navigator = web_sys::window()?.navigator();
        // navigator.geolocation puede no existir (webviews, http sin TLS en algunos navegadores)
        let raw = Reflect::get(&navigator, &JsValue::from_str("geolocation")).ok()?;
        if raw.is_undefined() || raw.is_null() {
            return None;
        }
        Some(raw.unchecked_into::<Geolocation>())
    }

    fn position_options(options: &SamplingOptions) -> PositionOptions {
        let js_options = PositionOptions::new();
        js_options.set_enable_high_accuracy(options.high_accuracy);
        js_options.set_maximum_age(options.maximum_age_ms);
        js_options.set_timeout(options.timeout_ms);
        js_options
    }
}

/// Leer un campo numérico de un objeto JS
fn number_field(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key)).ok()?.as_f64()
}

/// Convertir un `GeolocationPosition` a nuestro modelo
pub fn reading_from_js(position: &JsValue) -> Option<PositionReading> {
    let coords = Reflect::get(position, &JsValue::from_str("coords")).ok()?;
    let captured_at = number_field(position, "timestamp")
        .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
        .unwrap_or_else(Utc::now);

    Some(PositionReading {
        latitude: number_field(&coords, "latitude")?,
        longitude: number_field(&coords, "longitude")?,
        accuracy_meters: number_field(&coords, "accuracy").unwrap_or(0.0),
        captured_at,
    })
}

/// Convertir un `GeolocationPositionError` a nuestro modelo
pub fn error_from_js(error: &JsValue) -> PositionError {
    number_field(error, "code")
        .map(|code| PositionError::from_code(code as u16))
        .unwrap_or(PositionError::Unavailable)
}

#[async_trait(?Send)]
impl PositionSampler for BrowserGeolocation {
    fn is_available(&self) -> bool {
        Self::geolocation().is_some()
    }

    async fn sample_once(&self, options: &SamplingOptions) -> Result<PositionReading, PositionError> {
        let geolocation = Self::geolocation().ok_or(PositionError::Unavailable)?;
        let js_options = Self::position_options(options);

        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            if let Err(e) = geolocation.get_current_position_with_error_callback_and_options(
                &resolve,
                Some(&reject),
                &js_options,
            ) {
                let _ = reject.call1(&JsValue::NULL, &e);
            }
        });

        match JsFuture::from(promise).await {
            Ok(position) => reading_from_js(&position).ok_or(PositionError::Unavailable),
            Err(error) => Err(error_from_js(&error)),
        }
    }

    async fn start_continuous(
        &self,
        options: &SamplingOptions,
        on_reading: ReadingCallback,
        on_error: ErrorCallback,
    ) -> Result<WatchHandle, TrackingError> {
        let geolocation = Self::geolocation().ok_or(TrackingError::CapabilityUnavailable)?;

        let success = Closure::wrap(Box::new(move |position: JsValue| {
            match reading_from_js(&position) {
                Some(reading) => on_reading(reading),
                None => log::warn!("⚠️ [GPS] Posición sin coordenadas, ignorada"),
            }
        }) as Box<dyn FnMut(JsValue)>);

        let failure = Closure::wrap(Box::new(move |error: JsValue| {
            on_error(error_from_js(&error));
        }) as Box<dyn FnMut(JsValue)>);

        let id = geolocation
            .watch_position_with_error_callback_and_options(
                success.as_ref().unchecked_ref(),
                Some(failure.as_ref().unchecked_ref()),
                &Self::position_options(options),
            )
            .map_err(|e| TrackingError::WatchRejected(format!("{:?}", e)))?;

        let handle = WatchHandle(id);
        self.watches.borrow_mut().insert(handle, (success, failure));
        log::info!("📡 [GPS] watchPosition activo (id {})", id);
        Ok(handle)
    }

    async fn cancel(&self, handle: WatchHandle) {
        if let Some(geolocation) = Self::geolocation() {
            geolocation.clear_watch(handle.0);
        }
        // Soltar los closures solo después de clearWatch
        if self.watches.borrow_mut().remove(&handle).is_some() {
            log::info!("🛑 [GPS] watchPosition cancelado (id {})", handle.0);
        }
    }
}
