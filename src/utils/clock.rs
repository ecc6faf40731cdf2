use chrono::{DateTime, Utc};

/// Fuente de tiempo inyectable (los tests usan un reloj fijo)
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reloj del sistema (`Date.now()` en wasm vía `wasmbind`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
