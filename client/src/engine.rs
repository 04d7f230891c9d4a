//! Binding to the deck.gl + basemap shim in `js/engine.js`.
//!
//! The shim owns every WebGL object and the CARTO maps client. Rust hands it
//! plain descriptors and view states and receives map records, view-state and
//! hover callbacks back.

use std::cell::RefCell;
use std::sync::Arc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use cartoview_shared::{LayerDescriptor, ViewState};

pub const DECK_CANVAS_ID: &str = "deck-canvas";
pub const BASEMAP_CONTAINER_ID: &str = "map";

#[wasm_bindgen(module = "/js/engine.js")]
extern "C" {
    #[wasm_bindgen(js_name = fetchMapConfig, catch)]
    async fn js_fetch_map_config(
        api_base_url: &str,
        map_id: &str,
        access_token: Option<String>,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = createEngine, catch)]
    fn js_create_engine(
        canvas_id: &str,
        basemap_id: &str,
        view_state: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = setLayers)]
    fn js_set_layers(engine: &JsValue, layers: JsValue);

    #[wasm_bindgen(js_name = setInitialViewState)]
    fn js_set_initial_view_state(engine: &JsValue, view_state: JsValue);

    #[wasm_bindgen(js_name = jumpBasemap)]
    fn js_jump_basemap(engine: &JsValue, view_state: JsValue);

    #[wasm_bindgen(js_name = onViewStateChange)]
    fn js_on_view_state_change(engine: &JsValue, callback: &js_sys::Function);

    #[wasm_bindgen(js_name = setTooltip)]
    fn js_set_tooltip(engine: &JsValue, callback: &js_sys::Function);
}

struct EngineBinding {
    engine: JsValue,
    _on_view_state_change: Closure<dyn Fn(JsValue)>,
    _tooltip: Closure<dyn Fn(String, JsValue) -> JsValue>,
}

thread_local! {
    static ENGINE: RefCell<Option<EngineBinding>> = const { RefCell::new(None) };
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("serialize error: {e}"))
}

fn with_engine(f: impl FnOnce(&JsValue)) {
    ENGINE.with(|slot| {
        if let Some(binding) = slot.borrow().as_ref() {
            f(&binding.engine);
        }
    });
}

/// Fetch a map record through the CARTO maps client as JSON text. An empty
/// string means the service returned no map.
pub async fn fetch_map(
    api_base_url: &str,
    map_id: &str,
    access_token: Option<&str>,
) -> Result<String, String> {
    let value = js_fetch_map_config(api_base_url, map_id, access_token.map(str::to_owned))
        .await
        .map_err(|e| {
            e.as_string()
                .or_else(|| {
                    e.dyn_ref::<js_sys::Error>()
                        .map(|err| String::from(err.message()))
                })
                .unwrap_or_else(|| format!("{e:?}"))
        })?;
    Ok(value.as_string().unwrap_or_default())
}

/// Create the engine once. A second call replaces the callbacks but keeps
/// using the shim's existing deck instance.
pub fn init(
    initial_view: &ViewState,
    on_view_state_change: impl Fn(ViewState) + 'static,
    tooltip: impl Fn(&str, &serde_json::Value) -> Option<String> + 'static,
) -> Result<(), String> {
    let view = to_js(initial_view)?;
    let engine = js_create_engine(DECK_CANVAS_ID, BASEMAP_CONTAINER_ID, view)
        .map_err(|e| format!("engine init failed: {e:?}"))?;

    let view_cb = Closure::<dyn Fn(JsValue)>::new(move |raw: JsValue| {
        match serde_wasm_bindgen::from_value::<ViewState>(raw) {
            Ok(view) => on_view_state_change(view),
            Err(e) => {
                web_sys::console::warn_1(&format!("Ignoring malformed view state: {e}").into());
            }
        }
    });
    let tooltip_cb =
        Closure::<dyn Fn(String, JsValue) -> JsValue>::new(move |layer_id: String, object: JsValue| {
            let Ok(object) = serde_wasm_bindgen::from_value::<serde_json::Value>(object) else {
                return JsValue::NULL;
            };
            tooltip(&layer_id, &object)
                .map(|html| JsValue::from_str(&html))
                .unwrap_or(JsValue::NULL)
        });

    js_on_view_state_change(&engine, view_cb.as_ref().unchecked_ref());
    js_set_tooltip(&engine, tooltip_cb.as_ref().unchecked_ref());

    ENGINE.with(|slot| {
        *slot.borrow_mut() = Some(EngineBinding {
            engine,
            _on_view_state_change: view_cb,
            _tooltip: tooltip_cb,
        });
    });
    Ok(())
}

/// Install `layers` as the engine's complete layer set.
pub fn set_layers(layers: &[Arc<LayerDescriptor>]) {
    let plain: Vec<&LayerDescriptor> = layers.iter().map(Arc::as_ref).collect();
    let payload = match to_js(&plain) {
        Ok(payload) => payload,
        Err(e) => {
            web_sys::console::warn_1(&format!("Skipping layer update: {e}").into());
            return;
        }
    };
    with_engine(|engine| js_set_layers(engine, payload));
}

pub fn clear_layers() {
    set_layers(&[]);
}

pub fn set_initial_view_state(view: &ViewState) {
    let Ok(payload) = to_js(view) else {
        return;
    };
    with_engine(|engine| js_set_initial_view_state(engine, payload));
}

pub fn jump_basemap(view: &ViewState) {
    let Ok(payload) = to_js(view) else {
        return;
    };
    with_engine(|engine| js_jump_basemap(engine, payload));
}
