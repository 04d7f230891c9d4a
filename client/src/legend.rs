use std::cell::RefCell;

use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use cartoview_shared::{LegendEntry, TOGGLE_VISIBILITY_EVENT, VisibilityChange};

struct ToggleListenerBinding {
    target: web_sys::EventTarget,
    handler: Closure<dyn Fn(web_sys::CustomEvent)>,
}

impl ToggleListenerBinding {
    fn detach(self) {
        self.target
            .remove_event_listener_with_callback(
                TOGGLE_VISIBILITY_EVENT,
                self.handler.as_ref().unchecked_ref(),
            )
            .ok();
    }
}

thread_local! {
    static TOGGLE_LISTENER: RefCell<Option<ToggleListenerBinding>> = const { RefCell::new(None) };
}

/// Inline styles for the collapsible panel: (opacity, pointer-events, transform).
fn panel_style(open: bool) -> (&'static str, &'static str, &'static str) {
    if open {
        ("1", "auto", "translateY(0)")
    } else {
        ("0", "none", "translateY(20px)")
    }
}

fn dispatch_toggle(target: &web_sys::EventTarget, change: &VisibilityChange) {
    let detail = match change.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(detail) => detail,
        Err(e) => {
            web_sys::console::warn_1(&format!("Could not encode toggle detail: {e}").into());
            return;
        }
    };
    let init = web_sys::CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&detail);
    let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict(TOGGLE_VISIBILITY_EVENT, &init)
    else {
        return;
    };
    target.dispatch_event(&event).ok();
}

fn detach_toggle_listener() {
    TOGGLE_LISTENER.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            old.detach();
        }
    });
}

fn attach_toggle_listener(target: web_sys::EventTarget, on_toggle: Callback<VisibilityChange>) {
    detach_toggle_listener();

    let handler = Closure::<dyn Fn(web_sys::CustomEvent)>::new(move |event: web_sys::CustomEvent| {
        match serde_wasm_bindgen::from_value::<VisibilityChange>(event.detail()) {
            Ok(change) => on_toggle.run(change),
            Err(e) => {
                web_sys::console::warn_1(
                    &format!("Ignoring malformed {TOGGLE_VISIBILITY_EVENT} event: {e}").into(),
                );
            }
        }
    });

    if target
        .add_event_listener_with_callback(TOGGLE_VISIBILITY_EVENT, handler.as_ref().unchecked_ref())
        .is_ok()
    {
        TOGGLE_LISTENER.with(|slot| {
            *slot.borrow_mut() = Some(ToggleListenerBinding { target, handler });
        });
    }
}

/// Collapsible layer list. Checkboxes only announce changes through a
/// `togglelayervisibility` DOM event on the wrapper; `on_toggle` receives them.
#[component]
pub fn Legend(
    #[prop(into)] entries: Signal<Vec<LegendEntry>>,
    on_toggle: Callback<VisibilityChange>,
) -> impl IntoView {
    let wrapper_ref = NodeRef::<leptos::html::Div>::new();
    let panel_open = RwSignal::new(false);

    Effect::new(move || {
        let Some(wrapper) = wrapper_ref.get() else {
            return;
        };
        let target: &web_sys::EventTarget = wrapper.as_ref();
        attach_toggle_listener(target.clone(), on_toggle);
    });
    on_cleanup(detach_toggle_listener);

    view! {
        <div class="legend-wrapper" node_ref=wrapper_ref>
            <div
                class="legend-container"
                style:opacity=move || panel_style(panel_open.get()).0
                style:pointer-events=move || panel_style(panel_open.get()).1
                style:transform=move || panel_style(panel_open.get()).2
            >
                {move || {
                    entries
                        .get()
                        .into_iter()
                        .map(|entry| view! { <LegendRow entry=entry wrapper_ref=wrapper_ref /> })
                        .collect_view()
                }}
            </div>
            <button
                class="legend-toggle-btn"
                class:open=move || panel_open.get()
                id="legend-toggle"
                aria-label="Toggle legend"
                on:click=move |_| panel_open.update(|open| *open = !*open)
            >
                <svg viewBox="0 0 24 24"><path d="M7 10l5 5 5-5z" /></svg>
                <span>"Layers"</span>
            </button>
        </div>
    }
}

#[component]
fn LegendRow(entry: LegendEntry, wrapper_ref: NodeRef<leptos::html::Div>) -> impl IntoView {
    let checkbox_id = entry.checkbox_id();
    let layer_id = entry.layer_id.clone();
    let on_change = move |ev: leptos::ev::Event| {
        let visible = event_target_checked(&ev);
        let Some(wrapper) = wrapper_ref.get_untracked() else {
            return;
        };
        dispatch_toggle(
            wrapper.as_ref(),
            &VisibilityChange {
                layer_id: layer_id.clone(),
                visible,
            },
        );
    };

    view! {
        <div class="legend-layer">
            <div class="legend-title-container">
                <input
                    type="checkbox"
                    class="layer-visibility-toggle"
                    id=checkbox_id.clone()
                    prop:checked=entry.visible
                    on:change=on_change
                />
                <label class="legend-title" for=checkbox_id style:color=entry.swatch_color>
                    {entry.label}
                </label>
            </div>
        </div>
    }
}
