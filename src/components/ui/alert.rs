use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-md border border-dashed px-3 py-4 text-center text-sm text-muted-foreground"}
    clx! {AlertDescription, p, "text-xs [&_p]:leading-relaxed"}
}

pub use components::*;
