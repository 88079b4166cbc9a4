use crate::config::QuickAddConfig;
use crate::storage::describe_js;
use leptos::logging::{error, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Title field of the quick-create bubble / full editor, per UI language.
pub(crate) const TITLE_INPUT_SELECTORS: &[&str] = &[
    r#"input[aria-label="Title"]"#,
    r#"input[aria-label="Add title"]"#,
    r#"input[aria-label="タイトル"]"#,
    r#"input[aria-label="タイトルを追加"]"#,
];

pub(crate) const CREATE_BUTTON_SELECTORS: &[&str] = &[
    r#"div[role="button"][aria-label^="Create"]"#,
    r#"div[role="button"][aria-label^="作成"]"#,
    r#"button[aria-label^="Create"]"#,
    r#"button[aria-label^="作成"]"#,
];

/// Grid cells that open the inline editor when clicked.
pub(crate) const INLINE_EDITOR_TARGET_SELECTOR: &str =
    r#"[role="gridcell"], [data-dragsource-type="time-grid"], .tEhMVd, .lFe10d"#;

/// The right-click that opened the menu, consumed once by `inject`.
#[derive(Clone, Debug)]
pub(crate) struct ClickContext {
    pub target: Option<web_sys::Element>,
    pub client_x: i32,
    pub client_y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BridgeErrorKind {
    NoDocument,
    Dom,
}

#[derive(Clone, Debug)]
pub(crate) struct BridgeError {
    pub kind: BridgeErrorKind,
    pub message: String,
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl BridgeError {
    fn no_document() -> Self {
        Self {
            kind: BridgeErrorKind::NoDocument,
            message: "no window/document available".to_string(),
        }
    }
}

impl From<JsValue> for BridgeError {
    fn from(e: JsValue) -> Self {
        Self {
            kind: BridgeErrorKind::Dom,
            message: describe_js(&e),
        }
    }
}

pub(crate) type BridgeResult<T> = Result<T, BridgeError>;

/// First element matching any selector, in selector order.
pub(crate) fn find_first(document: &web_sys::Document, selectors: &[&str]) -> Option<web_sys::Element> {
    selectors
        .iter()
        .find_map(|sel| document.query_selector(sel).ok().flatten())
}

fn find_title_input(document: &web_sys::Document) -> Option<web_sys::HtmlInputElement> {
    find_first(document, TITLE_INPUT_SELECTORS).and_then(|el| el.dyn_into().ok())
}

#[derive(Default)]
struct PendingWait {
    resolve: Option<js_sys::Function>,
    observer: Option<web_sys::MutationObserver>,
    timer_id: Option<i32>,
    on_mutation: Option<Closure<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>>,
    on_timeout: Option<Closure<dyn FnMut()>>,
}

impl PendingWait {
    /// Resolve once; later calls are ignored.
    fn settle(&mut self, value: &JsValue) {
        let Some(resolve) = self.resolve.take() else {
            return;
        };
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        if let (Some(id), Some(win)) = (self.timer_id.take(), web_sys::window()) {
            win.clear_timeout_with_handle(id);
        }
        let _ = resolve.call1(&JsValue::NULL, value);
    }
}

/// Wait until one of `selectors` matches, or `timeout_ms` elapses.
///
/// Observes DOM mutations under `<body>` instead of polling. The timer and the
/// observer race; whichever fires first settles the wait and tears the other down.
/// Never fails: a timeout (or a broken environment) yields `None`.
pub(crate) async fn wait_for_element(
    document: &web_sys::Document,
    selectors: &'static [&'static str],
    timeout_ms: u32,
) -> Option<web_sys::Element> {
    if let Some(found) = find_first(document, selectors) {
        return Some(found);
    }
    let win = web_sys::window()?;

    let state = Rc::new(RefCell::new(PendingWait::default()));
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        state.borrow_mut().resolve = Some(resolve);
    });

    if let Some(body) = document.body() {
        let doc = document.clone();
        let st = state.clone();
        let on_mutation = Closure::<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: web_sys::MutationObserver| {
                if let Some(found) = find_first(&doc, selectors) {
                    st.borrow_mut().settle(&found.into());
                }
            },
        );
        match web_sys::MutationObserver::new(on_mutation.as_ref().unchecked_ref()) {
            Ok(observer) => {
                let init = web_sys::MutationObserverInit::new();
                init.set_child_list(true);
                init.set_subtree(true);
                if let Err(e) = observer.observe_with_options(&body, &init) {
                    warn!("Quick Add: cannot observe document: {}", describe_js(&e));
                }
                state.borrow_mut().observer = Some(observer);
            }
            Err(e) => warn!("Quick Add: MutationObserver unavailable: {}", describe_js(&e)),
        }
        state.borrow_mut().on_mutation = Some(on_mutation);
    }

    let st = state.clone();
    let on_timeout = Closure::<dyn FnMut()>::new(move || {
        st.borrow_mut().settle(&JsValue::NULL);
    });
    let timer_id = win
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.as_ref().unchecked_ref(),
            i32::try_from(timeout_ms).unwrap_or(i32::MAX),
        )
        .ok();
    {
        let mut s = state.borrow_mut();
        s.on_timeout = Some(on_timeout);
        s.timer_id = timer_id;
        if timer_id.is_none() {
            s.settle(&JsValue::NULL);
        }
    }

    let result = JsFuture::from(promise).await.ok();

    // Both callbacks are idle now; dropping them breaks the Rc cycle.
    {
        let mut s = state.borrow_mut();
        s.on_mutation.take();
        s.on_timeout.take();
    }

    result.and_then(|v| v.dyn_into::<web_sys::Element>().ok())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActivationStep {
    Pointer(&'static str),
    Mouse(&'static str),
}

/// Events a real primary-button click produces, in dispatch order.
pub(crate) const PRIMARY_ACTIVATION: [ActivationStep; 5] = [
    ActivationStep::Pointer("pointerdown"),
    ActivationStep::Pointer("pointerup"),
    ActivationStep::Mouse("mousedown"),
    ActivationStep::Mouse("mouseup"),
    ActivationStep::Mouse("click"),
];

/// Synthesize primary activation: dispatch [`PRIMARY_ACTIVATION`] on `target` at the
/// given client coordinates. Pointer steps are skipped where `PointerEvent` is missing.
pub(crate) fn synthesize_primary_activation(
    target: &web_sys::Element,
    client_x: i32,
    client_y: i32,
) -> BridgeResult<()> {
    let win = web_sys::window().ok_or_else(BridgeError::no_document)?;
    let has_pointer_events =
        js_sys::Reflect::has(&win, &JsValue::from_str("PointerEvent")).unwrap_or(false);

    for step in PRIMARY_ACTIVATION {
        match step {
            ActivationStep::Pointer(kind) => {
                if !has_pointer_events {
                    continue;
                }
                let init = web_sys::PointerEventInit::new();
                init.set_bubbles(true);
                init.set_cancelable(true);
                init.set_view(Some(&win));
                init.set_client_x(client_x);
                init.set_client_y(client_y);
                init.set_button(0);
                init.set_buttons(1);
                init.set_pointer_id(1);
                init.set_pointer_type("mouse");
                init.set_is_primary(true);
                let ev = web_sys::PointerEvent::new_with_event_init_dict(kind, &init)?;
                target.dispatch_event(&ev)?;
            }
            ActivationStep::Mouse(kind) => {
                let init = web_sys::MouseEventInit::new();
                init.set_bubbles(true);
                init.set_cancelable(true);
                init.set_view(Some(&win));
                init.set_client_x(client_x);
                init.set_client_y(client_y);
                init.set_button(0);
                init.set_buttons(1);
                let ev = web_sys::MouseEvent::new_with_mouse_event_init_dict(kind, &init)?;
                target.dispatch_event(&ev)?;
            }
        }
    }
    Ok(())
}

/// `el.focus({ preventScroll: true })`; failures are ignored.
fn focus_without_scroll(el: &web_sys::Element) {
    let Ok(focus) = js_sys::Reflect::get(el, &JsValue::from_str("focus")) else {
        return;
    };
    let Some(focus) = focus.dyn_ref::<js_sys::Function>() else {
        return;
    };
    let opts = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&opts, &JsValue::from_str("preventScroll"), &JsValue::TRUE);
    let _ = focus.call1(el, &opts);
}

fn trigger_inline_editor(document: &web_sys::Document, context: &ClickContext) -> BridgeResult<()> {
    let candidate = context
        .target
        .as_ref()
        .and_then(|t| t.closest(INLINE_EDITOR_TARGET_SELECTOR).ok().flatten())
        .or_else(|| document.element_from_point(context.client_x as f32, context.client_y as f32));

    let Some(candidate) = candidate else {
        return Ok(());
    };

    focus_without_scroll(&candidate);
    synthesize_primary_activation(&candidate, context.client_x, context.client_y)
}

fn click_element(el: &web_sys::Element) -> BridgeResult<()> {
    if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
        html.click();
        return Ok(());
    }
    let init = web_sys::MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let ev = web_sys::MouseEvent::new_with_mouse_event_init_dict("click", &init)?;
    el.dispatch_event(&ev)?;
    Ok(())
}

async fn wait_for_title_input(
    document: &web_sys::Document,
    timeout_ms: u32,
) -> Option<web_sys::HtmlInputElement> {
    wait_for_element(document, TITLE_INPUT_SELECTORS, timeout_ms)
        .await
        .and_then(|el| el.dyn_into().ok())
}

async fn prepare_title_input(
    document: &web_sys::Document,
    context: Option<&ClickContext>,
    config: &QuickAddConfig,
) -> BridgeResult<Option<web_sys::HtmlInputElement>> {
    if let Some(input) = find_title_input(document) {
        return Ok(Some(input));
    }

    if let Some(ctx) = context {
        trigger_inline_editor(document, ctx)?;
    }
    if let Some(input) = wait_for_title_input(document, config.inline_timeout_ms).await {
        return Ok(Some(input));
    }

    if let Some(button) = find_first(document, CREATE_BUTTON_SELECTORS) {
        click_element(&button)?;
        if let Some(input) = wait_for_title_input(document, config.create_timeout_ms).await {
            return Ok(Some(input));
        }
    }

    Ok(find_title_input(document))
}

/// Put `label` into the field the way typing would: value, `input` + `change`,
/// focus, caret at the end.
pub(crate) fn fill_title_input(input: &web_sys::HtmlInputElement, label: &str) -> BridgeResult<()> {
    input.set_value(label);

    for kind in ["input", "change"] {
        let init = web_sys::EventInit::new();
        init.set_bubbles(true);
        let ev = web_sys::Event::new_with_event_init_dict(kind, &init)?;
        input.dispatch_event(&ev)?;
    }

    input.focus()?;
    // selectionStart/End are in UTF-16 code units; some input types reject this.
    let len = label.encode_utf16().count() as u32;
    let _ = input.set_selection_range(len, len);
    Ok(())
}

/// Event editor URL with the label pre-filled as the title.
pub(crate) fn fallback_url(base: &str, label: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}text={}", urlencoding::encode(label))
}

async fn try_inject(
    label: &str,
    context: Option<ClickContext>,
    config: &QuickAddConfig,
) -> BridgeResult<()> {
    let win = web_sys::window().ok_or_else(BridgeError::no_document)?;
    let document = win.document().ok_or_else(BridgeError::no_document)?;

    match prepare_title_input(&document, context.as_ref(), config).await? {
        Some(input) => fill_title_input(&input, label),
        None => {
            warn!("Quick Add: failed to locate the calendar title input");
            if config.fallback_new_tab {
                let url = fallback_url(&config.event_edit_url, label);
                win.open_with_url_and_target(&url, "_blank")?;
            }
            Ok(())
        }
    }
}

/// Insert `label` as the title of a new event. Best effort: every failure is
/// logged here and never reaches the caller.
pub(crate) async fn inject(label: &str, context: Option<ClickContext>, config: &QuickAddConfig) {
    match try_inject(label, context, config).await {
        Ok(()) => {}
        Err(e) if e.kind == BridgeErrorKind::NoDocument => {
            warn!("Quick Add: no calendar document to inject into: {e}")
        }
        Err(e) => error!("Quick Add: failed to prepare the event dialog: {e}"),
    }
}
