// ============================================================================
// TRACKING STATE - Estado de la sesión de tracking
// ============================================================================

use chrono::{DateTime, Utc};
use crate::error::TrackingError;
use crate::models::PositionReading;
use crate::services::geolocation::WatchHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingStatus {
    #[default]
    Stopped,
    Starting,
    Active,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingState {
    pub status: TrackingStatus,
    /// Como mucho un watch vivo por sesión
    pub watch_handle: Option<WatchHandle>,
    pub last_error: Option<TrackingError>,
    pub last_location: Option<PositionReading>,
    pub last_ping_at: Option<DateTime<Utc>>,
    pub permission_denied: bool,
    /// Cambia en cada start/stop; los callbacks de un watch viejo se ignoran
    pub generation: u64,
}

impl TrackingState {
    /// ¿Pertenece un callback con esta generación al watch actual?
    pub fn accepts(&self, generation: u64) -> bool {
        self.generation == generation
            && matches!(self.status, TrackingStatus::Starting | TrackingStatus::Active)
    }
}
