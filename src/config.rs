// ============================================================================
// CONFIGURACIÓN - Se construye una vez y se pasa a cada viewmodel
// ============================================================================
// Los valores vienen de `option_env!` (build.rs carga el .env si existe).
// Nada de flags globales mutables: quien necesite config la recibe en `new()`.
// ============================================================================

use serde::{Deserialize, Serialize};
use crate::models::SamplingOptions;
use crate::utils::constants::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub enable_logging: bool,
    pub tracking: TrackingConfig,
    pub feed: FeedConfig,
    pub contrast: ContrastConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            enable_logging: true,
            tracking: TrackingConfig::default(),
            feed: FeedConfig::default(),
            contrast: ContrastConfig::default(),
        }
    }
}

/// Opciones del GPS para tracking continuo y pings manuales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    pub high_accuracy: bool,
    pub maximum_age_ms: u32,
    pub watch_timeout_ms: u32,
    pub one_shot_timeout_ms: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age_ms: POSITION_MAX_AGE_MS,
            watch_timeout_ms: WATCH_TIMEOUT_MS,
            one_shot_timeout_ms: ONE_SHOT_TIMEOUT_MS,
        }
    }
}

impl TrackingConfig {
    pub fn watch_options(&self) -> SamplingOptions {
        SamplingOptions {
            high_accuracy: self.high_accuracy,
            maximum_age_ms: self.maximum_age_ms,
            timeout_ms: self.watch_timeout_ms,
        }
    }

    pub fn one_shot_options(&self) -> SamplingOptions {
        SamplingOptions {
            high_accuracy: self.high_accuracy,
            maximum_age_ms: self.maximum_age_ms,
            timeout_ms: self.one_shot_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub poll_interval_ms: u32,
    pub bounce_duration_ms: u32,
    pub badge_element_id: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: FEED_POLL_INTERVAL_MS,
            bounce_duration_ms: BOUNCE_DURATION_MS,
            badge_element_id: BADGE_ELEMENT_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastConfig {
    pub overlay_element_id: String,
    /// Posiciones x (fracción del ancho) sobre el borde superior del overlay
    pub sample_fractions: Vec<f64>,
    pub luminance_threshold: f64,
    pub dark_votes_needed: usize,
    /// Re-muestreos tras un cambio de ruta (imágenes que cargan tarde)
    pub settle_delays_ms: Vec<u32>,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            overlay_element_id: OVERLAY_ELEMENT_ID.to_string(),
            sample_fractions: SAMPLE_FRACTIONS.to_vec(),
            luminance_threshold: LUMINANCE_THRESHOLD,
            dark_votes_needed: DARK_VOTES_NEEDED,
            settle_delays_ms: ROUTE_SETTLE_DELAYS_MS.to_vec(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: option_env!("BACKEND_URL")
                .unwrap_or(DEFAULT_BACKEND_URL)
                .trim_end_matches('/')
                .to_string(),
            enable_logging: parse_or(option_env!("ENABLE_LOGGING"), defaults.enable_logging),
            tracking: TrackingConfig {
                maximum_age_ms: parse_or(option_env!("POSITION_MAX_AGE_MS"), POSITION_MAX_AGE_MS),
                watch_timeout_ms: parse_or(option_env!("WATCH_TIMEOUT_MS"), WATCH_TIMEOUT_MS),
                one_shot_timeout_ms: parse_or(option_env!("ONE_SHOT_TIMEOUT_MS"), ONE_SHOT_TIMEOUT_MS),
                ..defaults.tracking
            },
            feed: FeedConfig {
                poll_interval_ms: parse_or(option_env!("FEED_POLL_INTERVAL_MS"), FEED_POLL_INTERVAL_MS),
                ..defaults.feed
            },
            contrast: defaults.contrast,
        }
    }

    /// URL completa de un endpoint de la API (`/api` + path)
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.backend_url, API_PREFIX, path)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}
