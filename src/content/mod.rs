pub(crate) mod menu;
pub(crate) mod position;

use crate::bridge::{self, BridgeResult, ClickContext};
use crate::config::QuickAddConfig;
use crate::content::menu::{current_viewport, item_index_for, FloatingMenu, LoadingOverlay};
use crate::models::DismissReason;
use crate::storage::{describe_js, PresetStore};
use leptos::logging::{log, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Markers of the calendar surface where our menu replaces the native one.
pub(crate) const CALENDAR_AREA_SELECTOR: &str =
    r#"[role="grid"], [data-dragsource-type="time-grid"], [data-view-label], [data-viewtype], .tEhMVd"#;

/// Whether a right-click on `target` should open the preset menu.
pub(crate) fn is_calendar_target(target: &web_sys::Element, menu: &web_sys::Element) -> bool {
    if menu.contains(Some(AsRef::<web_sys::Node>::as_ref(target))) {
        return false;
    }
    target
        .closest(CALENDAR_AREA_SELECTOR)
        .ok()
        .flatten()
        .is_some()
}

/// Content-script state for one calendar page.
///
/// Owns the floating menu, the loading overlay, the current preset list and the
/// pending click context. Event handlers get it through an `Rc`.
pub(crate) struct ContextTrigger {
    config: QuickAddConfig,
    menu: FloatingMenu,
    overlay: RefCell<LoadingOverlay>,
    items: RefCell<Vec<String>>,
    click_context: RefCell<Option<ClickContext>>,
    /// Injections still running; the overlay stays up until this drops to zero.
    pending: Cell<usize>,
}

impl ContextTrigger {
    pub fn new(document: &web_sys::Document, config: QuickAddConfig) -> BridgeResult<Rc<Self>> {
        let menu = FloatingMenu::mount(document)?;
        Ok(Rc::new(Self {
            config,
            menu,
            overlay: RefCell::new(LoadingOverlay::new(document)),
            items: RefCell::new(Vec::new()),
            click_context: RefCell::new(None),
            pending: Cell::new(0),
        }))
    }

    pub fn is_menu_visible(&self) -> bool {
        self.menu.is_visible()
    }

    pub fn set_items(&self, items: Vec<String>) {
        *self.items.borrow_mut() = items;
        self.render();
    }

    fn render(&self) {
        if let Err(e) = self.menu.render(&self.items.borrow()) {
            warn!("Quick Add: failed to render menu: {e}");
        }
    }

    pub fn hide(&self, reason: DismissReason) {
        if !self.menu.is_visible() {
            return;
        }
        self.menu.hide();
        if self.config.debug {
            log!("Quick Add: menu hidden ({})", reason.as_ref());
        }
    }

    /// `contextmenu` handler. Returns whether the native menu was suppressed.
    pub fn handle_context_menu(&self, ev: &web_sys::MouseEvent) -> bool {
        let target = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok());
        let Some(target) = target else {
            self.hide(DismissReason::OutsideContextMenu);
            return false;
        };

        if self.menu.contains(Some(AsRef::<web_sys::Node>::as_ref(&target))) {
            ev.prevent_default();
            return true;
        }
        if !is_calendar_target(&target, self.menu.element()) {
            self.hide(DismissReason::OutsideContextMenu);
            return false;
        }

        ev.prevent_default();
        *self.click_context.borrow_mut() = Some(ClickContext {
            target: Some(target),
            client_x: ev.client_x(),
            client_y: ev.client_y(),
        });

        self.render();
        let Some(win) = web_sys::window() else {
            return true;
        };
        if let Err(e) = self.menu.show_at(
            f64::from(ev.page_x()),
            f64::from(ev.page_y()),
            current_viewport(&win),
            self.config.menu_padding,
        ) {
            warn!("Quick Add: failed to show menu: {e}");
        }
        true
    }

    /// Label at `index` plus the click context, which is handed out only once.
    /// An unknown index consumes nothing.
    pub fn take_selection(&self, index: usize) -> Option<(String, Option<ClickContext>)> {
        let label = self.items.borrow().get(index).cloned()?;
        self.hide(DismissReason::Selection);
        Some((label, self.click_context.borrow_mut().take()))
    }

    pub fn is_loading(&self) -> bool {
        self.overlay.borrow().is_visible()
    }

    pub fn begin_injection(&self) {
        self.pending.set(self.pending.get() + 1);
        if let Err(e) = self.overlay.borrow_mut().show() {
            warn!("Quick Add: failed to show loading overlay: {e}");
        }
    }

    pub fn end_injection(&self) {
        let left = self.pending.get().saturating_sub(1);
        self.pending.set(left);
        if left == 0 {
            self.overlay.borrow().hide();
        }
    }

    /// Run the label at `index` through the DOM bridge.
    pub fn select(self: &Rc<Self>, index: usize) {
        let Some((label, context)) = self.take_selection(index) else {
            return;
        };
        self.begin_injection();

        let this = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            bridge::inject(&label, context, &this.config).await;
            this.end_injection();
        });
    }

    fn handle_menu_click(self: &Rc<Self>, ev: &web_sys::MouseEvent) {
        let index = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| item_index_for(&el));
        if let Some(index) = index {
            self.select(index);
        }
    }

    fn handle_document_click(&self, ev: &web_sys::MouseEvent) {
        let inside = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
            .map(|node| self.menu.contains(Some(&node)))
            .unwrap_or(false);
        if !inside {
            self.hide(DismissReason::OutsideClick);
        }
    }
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    kind: &str,
    capture: bool,
    handler: impl FnMut(E) + 'static,
) {
    let cb = Closure::<dyn FnMut(E)>::new(handler);
    let added =
        target.add_event_listener_with_callback_and_bool(kind, cb.as_ref().unchecked_ref(), capture);
    match added {
        // Page-lifetime listener.
        Ok(()) => cb.forget(),
        Err(e) => warn!("Quick Add: cannot listen for {kind}: {}", describe_js(&e)),
    }
}

/// Wire document/window events to `trigger`.
pub(crate) fn bind_events(
    trigger: &Rc<ContextTrigger>,
    document: &web_sys::Document,
    win: &web_sys::Window,
) {
    let t = trigger.clone();
    listen(document, "contextmenu", true, move |ev: web_sys::MouseEvent| {
        t.handle_context_menu(&ev);
    });

    let t = trigger.clone();
    listen(trigger.menu.element(), "click", false, move |ev: web_sys::MouseEvent| {
        t.handle_menu_click(&ev);
    });

    let t = trigger.clone();
    listen(document, "click", false, move |ev: web_sys::MouseEvent| {
        t.handle_document_click(&ev);
    });

    let t = trigger.clone();
    listen(document, "scroll", true, move |_ev: web_sys::Event| {
        t.hide(DismissReason::Scroll);
    });

    let t = trigger.clone();
    listen(win, "blur", false, move |_ev: web_sys::Event| {
        t.hide(DismissReason::Blur);
    });

    let t = trigger.clone();
    listen(win, "resize", false, move |_ev: web_sys::Event| {
        t.hide(DismissReason::Resize);
    });

    let t = trigger.clone();
    listen(document, "keydown", false, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            t.hide(DismissReason::Escape);
        }
    });
}

/// Content-script entry: menu, listeners, and preset loading.
pub(crate) fn init() -> BridgeResult<()> {
    let Some(win) = web_sys::window() else {
        return Ok(());
    };
    let Some(document) = win.document() else {
        return Ok(());
    };

    let trigger = ContextTrigger::new(&document, QuickAddConfig::new())?;
    trigger.render();
    bind_events(&trigger, &document, &win);

    let store = PresetStore::new();
    let t = trigger.clone();
    store.on_change(move |items| t.set_items(items));

    let t = trigger.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let items = store.get().await;
        t.set_items(items);
    });

    Ok(())
}

/// Run `init` now, or once the DOM is parsed.
pub(crate) fn start() {
    let run = || {
        if let Err(e) = init() {
            warn!("Quick Add: content script failed to start: {e}");
        }
    };

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.ready_state() != "loading" {
        run();
        return;
    }

    let cb = Closure::once_into_js(run);
    let _ = document.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref());
}
