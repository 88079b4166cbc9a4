use crate::models::DragSession;
use crate::storage::PresetStore;
use leptos::prelude::*;

/// Popup-wide state. Every field is a reactive handle, so the whole struct is `Copy`
/// and can be moved into as many event handlers as needed.
#[derive(Clone, Copy)]
pub(crate) struct PopupState {
    pub store: StoredValue<PresetStore>,

    /// Current preset list, in display order.
    pub items: RwSignal<Vec<String>>,
    pub loading: RwSignal<bool>,

    /// Active drag gesture, if any. Reset on every `dragend`.
    pub drag: RwSignal<Option<DragSession>>,
}

impl PopupState {
    pub fn new() -> Self {
        Self {
            store: StoredValue::new(PresetStore::new()),
            items: RwSignal::new(vec![]),
            loading: RwSignal::new(true),
            drag: RwSignal::new(None),
        }
    }

    /// Adopt `next` locally and persist it. `None` means "unchanged": nothing is written.
    pub fn commit(&self, next: Option<Vec<String>>) {
        let Some(next) = next else {
            return;
        };
        self.items.set(next.clone());
        self.store.with_value(|store| store.set(next));
    }

    pub fn end_drag(&self) {
        if self.drag.get_untracked().is_some() {
            self.drag.set(None);
        }
    }
}

impl Default for PopupState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct PopupContext(pub PopupState);
