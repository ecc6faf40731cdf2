// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod tracking_state;
pub mod feed_state;

pub use reactivity::*;
pub use tracking_state::*;
pub use feed_state::*;
