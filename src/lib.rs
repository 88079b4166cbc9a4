mod app;
mod background;
mod bridge;
mod components;
mod config;
mod content;
mod editor;
mod models;
mod pages;
mod state;
mod storage;

use crate::app::App;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// Popup page (`popup.html`).
#[wasm_bindgen]
pub fn start_popup() {
    mount_to_body(App);
}

/// Content script on the calendar page.
#[wasm_bindgen]
pub fn start_content() {
    content::start();
}

/// Service-worker hook for `runtime.onInstalled` / `runtime.onStartup`.
#[wasm_bindgen]
pub async fn seed_defaults(reason: String) {
    // Failures are already logged.
    let _ = background::seed_defaults(&reason).await;
}


// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
}
