// ============================================================================
// ERRORES - Taxonomía de errores del subsistema de proximidad
// ============================================================================
// Todos estos errores se capturan en su origen y se registran con `log`;
// ninguno aborta el tracking ni el polling.
// ============================================================================

use thiserror::Error;

/// Error del GPS del dispositivo (códigos W3C de GeolocationPositionError)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    #[error("permiso de ubicación denegado")]
    PermissionDenied,

    #[error("tiempo de espera agotado obteniendo la posición")]
    Timeout,

    #[error("posición no disponible")]
    Unavailable,
}

impl PositionError {
    /// Mapear `GeolocationPositionError.code` (1 = denegado, 2 = no disponible, 3 = timeout)
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => PositionError::PermissionDenied,
            3 => PositionError::Timeout,
            _ => PositionError::Unavailable,
        }
    }
}

/// Error de comunicación con el servicio de cruces
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("no hay token de sesión")]
    MissingToken,
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// Error de la sesión de tracking
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    #[error("geolocalización no soportada en este dispositivo")]
    CapabilityUnavailable,

    #[error("error de posición: {0}")]
    Position(#[from] PositionError),

    #[error("el navegador rechazó el watch de posición: {0}")]
    WatchRejected(String),

    #[error("ping fallido: {0}")]
    Ping(#[from] ApiError),
}
