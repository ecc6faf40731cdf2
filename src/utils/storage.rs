// ============================================================================
// STORAGE - Token de sesión en localStorage
// ============================================================================
// El login (fuera de este módulo) guarda el JWT en crudo, sin JSON,
// así que se lee con `raw()` y no con `LocalStorage::get`.
// ============================================================================

use gloo_storage::{LocalStorage, Storage};
use crate::utils::constants::TOKEN_STORAGE_KEY;

/// Token actual, si hay sesión
pub fn load_token() -> Option<String> {
    LocalStorage::raw()
        .get_item(TOKEN_STORAGE_KEY)
        .ok()
        .flatten()
        .filter(|token| !token.trim().is_empty())
}

/// Borrar el token (último paso del logout)
pub fn clear_token() {
    LocalStorage::delete(TOKEN_STORAGE_KEY);
    log::info!("🗑️ [STORAGE] Token eliminado");
}

/// Cabecera `Authorization` para el token dado
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token.trim())
}
