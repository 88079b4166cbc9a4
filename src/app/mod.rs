use crate::pages::PresetSettingsPage;
use crate::state::{PopupContext, PopupState};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Root of the extension popup.
#[component]
pub fn App() -> impl IntoView {
    let state = PopupState::new();
    provide_context(PopupContext(state));

    // Another popup, tab or the background worker may rewrite the list.
    state.store.with_value(|store| {
        store.on_change(move |items| state.items.set(items));
    });

    let store = state.store.get_value();
    spawn_local(async move {
        let items = store.get().await;
        state.items.set(items);
        state.loading.set(false);
    });

    view! { <PresetSettingsPage /> }
}
