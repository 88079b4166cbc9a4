pub(crate) const DEFAULT_MENU_PADDING: f64 = 12.0;
pub(crate) const DEFAULT_INLINE_TIMEOUT_MS: u32 = 2500;
pub(crate) const DEFAULT_CREATE_TIMEOUT_MS: u32 = 3000;
pub(crate) const DEFAULT_EVENT_EDIT_URL: &str = "https://calendar.google.com/calendar/r/eventedit";

/// Runtime settings for the content script.
///
/// Defaults cover the normal case. A loader may set `window.QUICK_ADD_ENV` in the
/// extension context to override individual fields (mostly useful while debugging
/// against a slow calendar page).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QuickAddConfig {
    pub menu_padding: f64,
    pub inline_timeout_ms: u32,
    pub create_timeout_ms: u32,
    pub fallback_new_tab: bool,
    pub event_edit_url: String,
    /// Log menu dismissals to the console.
    pub debug: bool,
}

impl Default for QuickAddConfig {
    fn default() -> Self {
        Self {
            menu_padding: DEFAULT_MENU_PADDING,
            inline_timeout_ms: DEFAULT_INLINE_TIMEOUT_MS,
            create_timeout_ms: DEFAULT_CREATE_TIMEOUT_MS,
            fallback_new_tab: false,
            event_edit_url: DEFAULT_EVENT_EDIT_URL.to_string(),
            debug: false,
        }
    }
}

impl QuickAddConfig {
    pub fn new() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let Some(env) = window.get("QUICK_ADD_ENV") else {
            return Self::default();
        };
        if env.is_undefined() || !env.is_object() {
            return Self::default();
        }

        match js_sys::JSON::stringify(&env)
            .ok()
            .and_then(|s| s.as_string())
            .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok())
        {
            Some(v) => Self::from_env_value(&v),
            None => Self::default(),
        }
    }

    /// Apply overrides from a plain JSON object.
    ///
    /// Both `MENU_PADDING` and `menu_padding` spellings are accepted, upper case first.
    pub fn from_env_value(env: &serde_json::Value) -> Self {
        let mut cfg = Self::default();

        if let Some(p) = lookup(env, "MENU_PADDING").and_then(|v| v.as_f64()) {
            if p.is_finite() && p >= 0.0 {
                cfg.menu_padding = p;
            }
        }
        if let Some(ms) = lookup(env, "INLINE_TIMEOUT_MS").and_then(as_timeout) {
            cfg.inline_timeout_ms = ms;
        }
        if let Some(ms) = lookup(env, "CREATE_TIMEOUT_MS").and_then(as_timeout) {
            cfg.create_timeout_ms = ms;
        }
        if let Some(b) = lookup(env, "FALLBACK_NEW_TAB").and_then(|v| v.as_bool()) {
            cfg.fallback_new_tab = b;
        }
        if let Some(b) = lookup(env, "DEBUG").and_then(|v| v.as_bool()) {
            cfg.debug = b;
        }
        if let Some(url) = lookup(env, "EVENT_EDIT_URL").and_then(|v| v.as_str()) {
            if !url.trim().is_empty() {
                cfg.event_edit_url = url.trim().to_string();
            }
        }

        cfg
    }
}

fn lookup<'a>(env: &'a serde_json::Value, upper: &str) -> Option<&'a serde_json::Value> {
    env.get(upper)
        .or_else(|| env.get(upper.to_ascii_lowercase().as_str()))
}

fn as_timeout(v: &serde_json::Value) -> Option<u32> {
    v.as_u64().and_then(|n| u32::try_from(n).ok())
}
