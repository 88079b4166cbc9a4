use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardFooter, CardHeader, CardTitle, Input, Spinner,
};
use crate::editor::{
    add_item, background_target, complete_drop, delete_item, drop_position_for, edit_item,
    hover_target, move_down, move_up,
};
use crate::models::{DragSession, DropPosition};
use crate::state::{PopupContext, PopupState};
use crate::storage::default_menu_items;
use icons::{ChevronDown, ChevronUp};
use leptos::ev;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const MAX_LABEL_LEN: u32 = 100;

fn finish_drop(state: PopupState) {
    let Some(session) = state.drag.get_untracked() else {
        return;
    };
    state.drag.set(None);
    state.commit(complete_drop(&state.items.get_untracked(), &session));
}

fn row_class(drag: Option<DragSession>, index: usize) -> String {
    let base = "menu-list__item group flex items-center gap-2 rounded-md border border-transparent bg-background px-2 py-1.5 text-sm hover:bg-accent/50";
    let extra = match drag {
        Some(s) if s.source == index => "opacity-40",
        Some(DragSession {
            hover: Some(t), ..
        }) if t.index == index => match t.position {
            DropPosition::Before => "border-t-primary rounded-t-none",
            DropPosition::After => "border-b-primary rounded-b-none",
        },
        _ => "",
    };
    tw_merge!(base, extra)
}

#[component]
fn PresetRow(index: usize, label: String) -> impl IntoView {
    let state = expect_context::<PopupContext>().0;
    let label_for_edit = label.clone();

    let on_edit = move |_| {
        let Some(win) = web_sys::window() else {
            return;
        };
        // `None` when the prompt was cancelled.
        let prompt = win.prompt_with_message_and_default("メニュー名を編集", &label_for_edit);
        let Ok(Some(updated)) = prompt else {
            return;
        };
        state.commit(edit_item(&state.items.get_untracked(), index, &updated));
    };

    view! {
        <li
            class=move || row_class(state.drag.get(), index)
            data-index=index.to_string()
            draggable="true"
            on:dragstart=move |ev: web_sys::DragEvent| {
                if let Some(dt) = ev.data_transfer() {
                    let _ = dt.set_data("text/plain", &index.to_string());
                    dt.set_effect_allowed("move");
                }
                state.drag.set(Some(DragSession::start(index)));
            }
            on:dragover=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                // Rows decide their own target; keep the list from treating this as background.
                ev.stop_propagation();
                if let Some(dt) = ev.data_transfer() {
                    dt.set_drop_effect("move");
                }

                let Some(session) = state.drag.get_untracked() else {
                    return;
                };
                let position = ev
                    .current_target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                    .map(|el| el.get_bounding_client_rect())
                    .map(|rect| drop_position_for(f64::from(ev.client_y()), rect.top(), rect.height()))
                    .unwrap_or(DropPosition::After);
                let hover = hover_target(&session, index, position);
                if session.hover != hover {
                    state.drag.set(Some(DragSession { hover, ..session }));
                }
            }
            on:drop=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                ev.stop_propagation();
                finish_drop(state);
            }
            on:dragend=move |_ev: web_sys::DragEvent| state.end_drag()
        >
            <span
                class="menu-list__drag-handle cursor-grab select-none px-1 text-muted-foreground"
                aria-hidden="true"
            >
                "⋮⋮"
            </span>
            <p class="menu-list__label min-w-0 flex-1 truncate">{label}</p>

            <div class="menu-list__actions flex items-center gap-0.5">
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:title="上へ"
                    attr:disabled=move || index == 0
                    on:click=move |_| state.commit(move_up(&state.items.get_untracked(), index))
                >
                    <ChevronUp />
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:title="下へ"
                    attr:disabled=move || index + 1 >= state.items.get().len()
                    on:click=move |_| state.commit(move_down(&state.items.get_untracked(), index))
                >
                    <ChevronDown />
                </Button>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_edit>
                    "編集"
                </Button>
                <Button
                    variant=ButtonVariant::Destructive
                    size=ButtonSize::Sm
                    on:click=move |_| state.commit(delete_item(&state.items.get_untracked(), index))
                >
                    "削除"
                </Button>
            </div>
        </li>
    }
}

#[component]
pub fn PresetSettingsPage() -> impl IntoView {
    let state = expect_context::<PopupContext>().0;
    let draft: RwSignal<String> = RwSignal::new(String::new());

    // Escape abandons a drag without writing anything.
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            state.end_drag();
        }
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let next = add_item(&state.items.get_untracked(), &draft.get_untracked());
        if next.is_some() {
            draft.set(String::new());
        }
        state.commit(next);
    };

    let on_reset = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("メニューを初期設定に戻しますか?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let store = state.store.get_value();
        spawn_local(async move {
            match store.reset().await {
                Ok(()) => state.items.set(default_menu_items()),
                Err(e) => warn!("Quick Add: failed to reset menu items: {e}"),
            }
        });
    };

    view! {
        <div class="w-[360px] bg-background p-3">
            <Card>
                <CardHeader>
                    <CardTitle>"Quick Add メニュー"</CardTitle>
                    <CardDescription>
                        "カレンダーの右クリックメニューに表示するタイトルを管理します。"
                    </CardDescription>
                </CardHeader>

                <CardContent class="flex flex-col gap-3">
                    <form id="add-form" class="flex gap-2" on:submit=on_submit>
                        <Input
                            id="menu-input"
                            placeholder="例: 【開発】"
                            maxlength=MAX_LABEL_LEN
                            bind_value=draft
                            autofocus=true
                        />
                        <Button attr:disabled=move || draft.get().trim().is_empty()>
                            "追加"
                        </Button>
                    </form>

                    <Show
                        when=move || !state.loading.get()
                        fallback=|| view! {
                            <div class="flex items-center gap-2 text-xs text-muted-foreground">
                                <Spinner />
                                "読み込み中…"
                            </div>
                        }
                    >
                        <Show
                            when=move || !state.items.get().is_empty()
                            fallback=|| view! {
                                <Alert>
                                    <AlertDescription>"メニューがありません。追加してください。"</AlertDescription>
                                </Alert>
                            }
                        >
                            <ul
                                id="menu-list"
                                class="menu-list flex flex-col pb-6"
                                on:dragenter=move |ev: web_sys::DragEvent| ev.prevent_default()
                                on:dragover=move |ev: web_sys::DragEvent| {
                                    // Over the list but not over a row.
                                    ev.prevent_default();
                                    let Some(session) = state.drag.get_untracked() else {
                                        return;
                                    };
                                    let last_row_bottom = ev
                                        .current_target()
                                        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                                        .and_then(|list| list.last_element_child())
                                        .map(|row| row.get_bounding_client_rect().bottom());
                                    let hover = background_target(
                                        &session,
                                        state.items.get_untracked().len(),
                                        f64::from(ev.client_y()),
                                        last_row_bottom,
                                    );
                                    if session.hover != hover {
                                        state.drag.set(Some(DragSession { hover, ..session }));
                                    }
                                }
                                on:drop=move |ev: web_sys::DragEvent| {
                                    ev.prevent_default();
                                    finish_drop(state);
                                }
                            >
                                {move || {
                                    state
                                        .items
                                        .get()
                                        .into_iter()
                                        .enumerate()
                                        .map(|(index, label)| view! { <PresetRow index=index label=label /> })
                                        .collect_view()
                                }}
                            </ul>
                        </Show>
                    </Show>
                </CardContent>

                <CardFooter>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_reset>
                        "初期設定に戻す"
                    </Button>
                </CardFooter>
            </Card>
        </div>
    }
}
