// ============================================================================
// DOM MODULE - Helpers para manipulación DOM
// ============================================================================

pub mod element;
pub mod events;
pub mod contrast;
pub mod badge;

pub use element::*;
pub use events::*;
pub use contrast::{BrowserContrastSurface, BrowserPassScheduler};
pub use badge::NotificationBadge;
