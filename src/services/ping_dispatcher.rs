// ============================================================================
// PING DISPATCHER - Una lectura → un POST, como mucho una vez
// ============================================================================
// Sin reintentos, sin backoff, sin cola: si el ping falla se registra y se
// olvida. El siguiente fix del GPS vuelve a intentarlo por su cuenta.
// ============================================================================

use std::rc::Rc;
use crate::error::ApiError;
use crate::models::{PingAck, PingRequest, PositionReading};
use crate::services::api_client::CrossingApi;

#[derive(Clone)]
pub struct PingDispatcher {
    api: Rc<dyn CrossingApi>,
}

impl PingDispatcher {
    pub fn new(api: Rc<dyn CrossingApi>) -> Self {
        Self { api }
    }

    /// Enviar la lectura al servicio de cruces
    pub async fn send_ping(&self, reading: &PositionReading) -> Result<PingAck, ApiError> {
        let request = PingRequest::from(reading);
        log::debug!(
            "📤 [PING] ({:.5}, {:.5}) ±{:.0}m",
            request.latitude,
            request.longitude,
            request.accuracy
        );

        match self.api.send_ping(&request).await {
            Ok(ack) => {
                if ack.new_crossings > 0 {
                    log::info!("✨ [PING] {} nuevo(s) cruce(s) en zona {:?}", ack.new_crossings, ack.zone);
                } else {
                    log::debug!("✅ [PING] Guardado (zona {:?})", ack.zone);
                }
                Ok(ack)
            }
            Err(ApiError::MissingToken) => {
                log::debug!("🔒 [PING] Sin token, ping descartado");
                Err(ApiError::MissingToken)
            }
            Err(e) => {
                log::warn!("⚠️ [PING] Ping perdido: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeCrossingApi;
    use chrono::Utc;
    use futures::executor::block_on;

    fn reading() -> PositionReading {
        PositionReading {
            latitude: 45.764,
            longitude: 4.8357,
            accuracy_meters: 8.5,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn sends_reading_fields_once() {
        let api = Rc::new(FakeCrossingApi::default());
        let dispatcher = PingDispatcher::new(api.clone());

        let ack = block_on(dispatcher.send_ping(&reading())).unwrap();

        assert!(ack.ping_saved);
        let pings = api.pings.borrow();
        assert_eq!(pings.len(), 1);
        assert_eq!(pings[0], PingRequest { latitude: 45.764, longitude: 4.8357, accuracy: 8.5 });
    }

    #[test]
    fn failure_is_returned_without_retry() {
        let api = Rc::new(FakeCrossingApi::default());
        api.fail_pings.set(true);
        let dispatcher = PingDispatcher::new(api.clone());

        let result = block_on(dispatcher.send_ping(&reading()));

        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(api.pings.borrow().len(), 1);
    }
}
