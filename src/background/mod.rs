use crate::storage::{PresetStore, StorageErrorKind, StorageResult};
use leptos::logging::{error, log, warn};

/// Write the default preset list if nothing usable is stored.
///
/// Called by the service worker on `runtime.onInstalled` and `runtime.onStartup`.
/// The listeners themselves live in `background.js`; they must be registered in the
/// worker's first turn, before the wasm module has finished loading.
pub(crate) async fn seed_defaults(reason: &str) -> StorageResult<bool> {
    let seeded = PresetStore::new().ensure_defaults().await;
    match &seeded {
        Ok(true) => log!("Quick Add: seeded default menu items ({reason})"),
        Ok(false) => {}
        Err(e) if e.kind == StorageErrorKind::Unavailable => {
            warn!("Quick Add: cannot seed default menu items ({reason}): {e}")
        }
        Err(e) => error!("Quick Add: failed to seed default menu items ({reason}): {e}"),
    }
    seeded
}
