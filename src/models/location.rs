use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lectura de posición del dispositivo (efímera, pasa directo al ping)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
    pub captured_at: DateTime<Utc>,
}

impl PositionReading {
    /// Edad de la lectura en milisegundos (0 si el reloj del GPS va adelantado)
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.captured_at)
            .num_milliseconds()
            .max(0)
    }

    /// Una lectura más joven que `maximum_age_ms` se puede reutilizar sin pedir otro fix
    pub fn is_fresh(&self, now: DateTime<Utc>, maximum_age_ms: u32) -> bool {
        self.age_ms(now) < i64::from(maximum_age_ms)
    }
}

/// Opciones pasadas al GPS en cada petición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingOptions {
    pub high_accuracy: bool,
    pub maximum_age_ms: u32,
    pub timeout_ms: u32,
}

/// Body de `POST /crossings/ping`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

impl From<&PositionReading> for PingRequest {
    fn from(reading: &PositionReading) -> Self {
        Self {
            latitude: reading.latitude,
            longitude: reading.longitude,
            accuracy: reading.accuracy_meters,
        }
    }
}

/// Respuesta del backend a un ping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingAck {
    #[serde(default)]
    pub ping_saved: bool,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub new_crossings: u32,
    #[serde(default)]
    pub crossings: Vec<NewCrossing>,
}

/// Cruce detectado por el backend durante este ping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCrossing {
    pub user_id: i64,
    pub zone: String,
}
