// Utils compartidos

pub mod constants;
pub mod storage;
pub mod clock;
pub mod spawn;

pub use constants::*;
pub use clock::{Clock, SystemClock};
pub use spawn::{SharedSpawner, BrowserSpawner, browser_spawner};
