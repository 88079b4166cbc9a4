use leptos::logging::warn;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

pub(crate) const MENU_ITEMS_KEY: &str = "quickAddMenuItems";
const SYNC_AREA: &str = "sync";

pub(crate) const DEFAULT_MENU_ITEMS: [&str; 9] = [
    "【開発】",
    "【レビュー】",
    "【CS】",
    "【MTG】",
    "【業務改善】",
    "【採用】",
    "【Help】",
    "【調査】",
    "【その他】",
];

pub(crate) fn default_menu_items() -> Vec<String> {
    DEFAULT_MENU_ITEMS.iter().map(|s| s.to_string()).collect()
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn sync_get(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn sync_set(items: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    fn on_changed_add_listener(cb: &js_sys::Function) -> Result<(), JsValue>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum StorageErrorKind {
    /// `chrome.storage` is missing (page opened outside the extension, tests).
    Unavailable,
    Js,
    Decode,
}

#[derive(Clone, Debug)]
pub(crate) struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StorageError {
    fn unavailable(e: JsValue) -> Self {
        Self {
            kind: StorageErrorKind::Unavailable,
            message: format!("chrome.storage unavailable: {}", describe_js(&e)),
        }
    }

    fn decode(e: impl std::fmt::Display) -> Self {
        Self {
            kind: StorageErrorKind::Decode,
            message: e.to_string(),
        }
    }
}

impl From<JsValue> for StorageError {
    fn from(e: JsValue) -> Self {
        Self {
            kind: StorageErrorKind::Js,
            message: describe_js(&e),
        }
    }
}

pub(crate) type StorageResult<T> = Result<T, StorageError>;

pub(crate) fn describe_js(v: &JsValue) -> String {
    if let Some(s) = v.as_string() {
        return s;
    }
    if let Some(e) = v.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    format!("{v:?}")
}

/// Decode a stored preset value.
///
/// Anything that is not an array counts as absent. Non-string entries are dropped,
/// strings are kept verbatim.
pub(crate) fn decode_menu_items(value: &serde_json::Value) -> Option<Vec<String>> {
    let arr = value.as_array()?;
    Some(
        arr.iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
    )
}

/// What a read hands to callers.
///
/// The first read of a session falls back to the defaults when nothing usable is
/// stored. Later reads return the stored list as-is, so a list the user emptied
/// stays empty until the store is reset.
pub(crate) fn resolve_menu_items(stored: Option<Vec<String>>, first_read: bool) -> Vec<String> {
    match stored {
        Some(items) if !items.is_empty() => items,
        Some(items) if !first_read => items,
        _ if first_read => default_menu_items(),
        _ => Vec::new(),
    }
}

/// Extract our key from a `chrome.storage.onChanged` payload.
///
/// Returns `None` when the change is for another area or another key. A removed key
/// resolves to the defaults, matching what a fresh read would show.
pub(crate) fn decode_change(changes: &serde_json::Value, area: &str) -> Option<Vec<String>> {
    if area != SYNC_AREA {
        return None;
    }
    let change = changes.get(MENU_ITEMS_KEY)?;
    let change: StorageChange = serde_json::from_value(change.clone()).unwrap_or_default();
    match change.new_value {
        Some(v) => Some(decode_menu_items(&v).unwrap_or_default()),
        None => Some(default_menu_items()),
    }
}

/// One entry of a `chrome.storage.onChanged` payload. `oldValue` is not needed.
#[derive(Deserialize, Default, Debug)]
struct StorageChange {
    #[serde(rename = "newValue")]
    new_value: Option<serde_json::Value>,
}

fn js_to_json(v: &JsValue) -> StorageResult<serde_json::Value> {
    if v.is_undefined() {
        return Ok(serde_json::Value::Null);
    }
    let s = js_sys::JSON::stringify(v)?.as_string().unwrap_or_default();
    serde_json::from_str(&s).map_err(StorageError::decode)
}

fn items_to_js(items: &[String]) -> StorageResult<JsValue> {
    let json = serde_json::json!({ MENU_ITEMS_KEY: items });
    let s = serde_json::to_string(&json).map_err(StorageError::decode)?;
    Ok(js_sys::JSON::parse(&s)?)
}

/// Handle to the synced preset list.
///
/// Cheap to clone; clones share the "first read" flag so a popup session seeds
/// defaults at most once.
#[derive(Clone, Default)]
pub(crate) struct PresetStore {
    first_read_done: Arc<AtomicBool>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read_raw(&self) -> StorageResult<Option<Vec<String>>> {
        let promise =
            sync_get(&JsValue::from_str(MENU_ITEMS_KEY)).map_err(StorageError::unavailable)?;
        let result = JsFuture::from(promise).await?;
        let json = js_to_json(&result)?;
        Ok(json.get(MENU_ITEMS_KEY).and_then(decode_menu_items))
    }

    pub async fn get(&self) -> Vec<String> {
        let first_read = !self.first_read_done.swap(true, Ordering::SeqCst);
        match self.read_raw().await {
            Ok(stored) => resolve_menu_items(stored, first_read),
            Err(e) => {
                warn!("Quick Add: failed to read menu items: {e}");
                resolve_menu_items(None, first_read)
            }
        }
    }

    pub async fn try_set(&self, items: &[String]) -> StorageResult<()> {
        let payload = items_to_js(items)?;
        let promise = sync_set(&payload).map_err(StorageError::unavailable)?;
        JsFuture::from(promise).await?;
        Ok(())
    }

    /// Persist `items` verbatim without awaiting the write.
    pub fn set(&self, items: Vec<String>) {
        let store = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = store.try_set(&items).await {
                warn!("Quick Add: failed to save menu items: {e}");
            }
        });
    }

    /// Seed the defaults when nothing usable is stored.
    pub async fn ensure_defaults(&self) -> StorageResult<bool> {
        let stored = self.read_raw().await?;
        if stored.map(|xs| xs.is_empty()).unwrap_or(true) {
            self.try_set(&default_menu_items()).await?;
            return Ok(true);
        }
        Ok(false)
    }

    pub async fn reset(&self) -> StorageResult<()> {
        self.try_set(&default_menu_items()).await
    }

    /// Call `callback` with the new list whenever it changes in synced storage.
    ///
    /// The listener is registered for the lifetime of the page.
    pub fn on_change(&self, callback: impl Fn(Vec<String>) + 'static) {
        let cb = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |changes: JsValue, area: JsValue| {
            let area = area.as_string().unwrap_or_default();
            let changes = match js_to_json(&changes) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Quick Add: unreadable storage change: {e}");
                    return;
                }
            };
            if let Some(items) = decode_change(&changes, &area) {
                callback(items);
            }
        });

        match on_changed_add_listener(cb.as_ref().unchecked_ref()) {
            Ok(()) => cb.forget(),
            Err(e) => warn!("Quick Add: {}", StorageError::unavailable(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_defaults_have_nine_labels() {
        let d = default_menu_items();
        assert_eq!(d.len(), 9);
        assert_eq!(d[0], "【開発】");
        assert_eq!(d[8], "【その他】");
    }

    #[test]
    fn test_decode_menu_items_drops_non_strings() {
        let v = json!(["a", 1, null, "b", {"x": 1}]);
        assert_eq!(decode_menu_items(&v), Some(s(&["a", "b"])));
    }

    #[test]
    fn test_decode_menu_items_non_array_is_absent() {
        assert_eq!(decode_menu_items(&json!("a")), None);
        assert_eq!(decode_menu_items(&json!(null)), None);
        assert_eq!(decode_menu_items(&json!({"0": "a"})), None);
    }

    #[test]
    fn test_first_read_seeds_defaults_for_missing_or_empty() {
        assert_eq!(resolve_menu_items(None, true), default_menu_items());
        assert_eq!(resolve_menu_items(Some(vec![]), true), default_menu_items());
    }

    #[test]
    fn test_later_reads_keep_empty_list() {
        assert!(resolve_menu_items(Some(vec![]), false).is_empty());
        assert!(resolve_menu_items(None, false).is_empty());
    }

    #[test]
    fn test_stored_list_is_returned_verbatim() {
        let stored = s(&["x", "x", " y "]);
        assert_eq!(resolve_menu_items(Some(stored.clone()), true), stored);
        assert_eq!(resolve_menu_items(Some(stored.clone()), false), stored);
    }

    #[test]
    fn test_decode_change_filters_area_and_key() {
        let changes = json!({ MENU_ITEMS_KEY: { "oldValue": ["a"], "newValue": ["b", "c"] } });
        assert_eq!(decode_change(&changes, "sync"), Some(s(&["b", "c"])));
        assert_eq!(decode_change(&changes, "local"), None);

        let other = json!({ "somethingElse": { "newValue": 1 } });
        assert_eq!(decode_change(&other, "sync"), None);
    }

    #[test]
    fn test_decode_change_removed_key_resolves_to_defaults() {
        let changes = json!({ MENU_ITEMS_KEY: { "oldValue": ["a"] } });
        assert_eq!(decode_change(&changes, "sync"), Some(default_menu_items()));
    }

    #[test]
    fn test_decode_change_non_array_new_value_is_empty() {
        let changes = json!({ MENU_ITEMS_KEY: { "newValue": "oops" } });
        assert_eq!(decode_change(&changes, "sync"), Some(vec![]));
    }
}
