// ============================================================================
// FEED STATE - Contador de no leídas + lista de cruces en memoria
// ============================================================================
// Sin versionado: si dos refresh se cruzan, gana la última respuesta.
// ============================================================================

use crate::models::{CrossingSummary, UnreadCounter};
use crate::state::ReactiveState;

#[derive(Clone, Default)]
pub struct FeedState {
    pub unread: ReactiveState<UnreadCounter>,
    /// Se reemplaza entera en cada fetch correcto, sin merge
    pub crossings: ReactiveState<Vec<CrossingSummary>>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unread_count(&self) -> u32 {
        self.unread.with(|counter| counter.count)
    }

    pub fn previous_count(&self) -> Option<u32> {
        self.unread.with(|counter| counter.previous_count)
    }

    pub fn crossings(&self) -> Vec<CrossingSummary> {
        self.crossings.get()
    }

    pub fn replace_crossings(&self, crossings: Vec<CrossingSummary>) {
        self.crossings.set(crossings);
    }

    /// Volver al estado inicial (fin de sesión): sin baseline ni cruces
    pub fn reset(&self) {
        self.unread.set(UnreadCounter::default());
        self.crossings.set(Vec::new());
    }
}
