// ============================================================================
// SPAWN - Ejecutar futures "fire and forget" en el hilo de la UI
// ============================================================================

use std::rc::Rc;
use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};

/// Spawner compartido por los viewmodels
pub type SharedSpawner = Rc<dyn LocalSpawn>;

/// Delegación a `wasm_bindgen_futures::spawn_local` (microtask queue del navegador)
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

pub fn browser_spawner() -> SharedSpawner {
    Rc::new(BrowserSpawner)
}
