use serde::{Deserialize, Serialize};

/// Respuesta de `GET /notifications/unread-count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: u32,
}

/// Contador de notificaciones no leídas
///
/// `previous_count` es `None` hasta el primer fetch correcto: la primera
/// lectura fija la base y nunca dispara el bounce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadCounter {
    pub count: u32,
    pub previous_count: Option<u32>,
}

impl UnreadCounter {
    /// ¿Debe animarse el badge si el backend devuelve `fetched`?
    pub fn should_bounce(&self, fetched: u32) -> bool {
        matches!(self.previous_count, Some(previous) if fetched > previous)
    }

    /// Registrar un fetch correcto (siempre, haya o no bounce)
    pub fn record(&mut self, fetched: u32) {
        self.count = fetched;
        self.previous_count = Some(fetched);
    }
}
