use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use cartoview_shared::tooltip::build_tooltip;
use cartoview_shared::view_state::{address_param, apply_geocode, resolve};
use cartoview_shared::{
    ClientConfig, LegendEntry, LoadOutcome, MapSession, ResolvedView, ViewState, VisibilityChange,
};

use crate::legend::Legend;
use crate::{auth, config, engine, geocode, loader, params};

fn set_loading_shell_step(step: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(step_el) = document.get_element_by_id("app-loading-step") {
        step_el.set_text_content(Some(step));
    }
}

fn remove_loading_shell() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

/// Inputs fixed at startup and reused by every reload.
#[derive(Clone, Debug)]
pub(crate) struct BootState {
    pub config: ClientConfig,
    pub token: Option<String>,
    pub base: ResolvedView,
}

fn log_view(stage: &str, view: &ViewState) {
    web_sys::console::log_1(
        &format!(
            "Map view params {stage}: lat={} long={} zoom={} pitch={}",
            view.latitude, view.longitude, view.zoom, view.pitch
        )
        .into(),
    );
}

fn format_view(view: &ViewState) -> String {
    format!(
        "{:.4}, {:.4} · z{:.1}",
        view.latitude, view.longitude, view.zoom
    )
}

/// Run one load cycle. The previous world is cleared first; the result is
/// dropped if another load started in the meantime.
pub(crate) fn load_map(session: RwSignal<MapSession>, boot: BootState) {
    let Some(epoch) = session.try_update(MapSession::begin_load) else {
        return;
    };
    engine::clear_layers();

    spawn_local(async move {
        let result = loader::load(&boot.config, boot.token.as_deref(), &boot.base).await;
        if let Err(e) = &result {
            web_sys::console::error_1(&format!("Error initializing map: {e}").into());
        }

        match session.try_update(|s| s.finish_load(epoch, result)) {
            Some(LoadOutcome::Loaded) => {
                session.with_untracked(|s| {
                    if let Some(view) = s.view_state() {
                        engine::set_initial_view_state(&view);
                        engine::jump_basemap(&view);
                        log_view("after load", &view);
                    }
                    engine::set_layers(&s.layers);
                    web_sys::console::info_1(&format!("Loaded {} layers", s.layers.len()).into());
                });
            }
            Some(LoadOutcome::Failed) => engine::clear_layers(),
            Some(LoadOutcome::Stale) | None => {
                web_sys::console::info_1(&format!("Discarding superseded map load #{epoch}").into());
            }
        }
    });
}

async fn boot(
    session: RwSignal<MapSession>,
    login_required: RwSignal<bool>,
    live_view: RwSignal<Option<ViewState>>,
    boot_store: StoredValue<Option<BootState>>,
) {
    set_loading_shell_step("Loading configuration");
    let config = config::load_client_config().await;

    set_loading_shell_step("Signing in");
    let token = auth::obtain_token();
    login_required.set(token.is_none());

    let query = params::read_query();
    let mut base = resolve(&query, &ViewState::default());
    log_view("before geocoding", &base.view);

    if let Some(address) = address_param(&query) {
        if config.geocoding.is_enabled() {
            set_loading_shell_step("Locating address");
            let coords = geocode::geocode(&config.geocoding, address).await;
            match coords {
                Some(c) => web_sys::console::log_1(
                    &format!(
                        "Geocoded address \"{address}\" to {}, {}",
                        c.latitude, c.longitude
                    )
                    .into(),
                ),
                None => web_sys::console::warn_1(
                    &format!(
                        "Could not geocode address: \"{address}\". Using default or URL params."
                    )
                    .into(),
                ),
            }
            base = apply_geocode(base, coords);
            log_view("after geocoding", &base.view);
        } else {
            web_sys::console::warn_1(
                &format!("Ignoring address \"{address}\": geocoding is not configured").into(),
            );
        }
    }

    set_loading_shell_step("Starting renderer");
    let on_view_change = move |view: ViewState| {
        engine::jump_basemap(&view);
        live_view.set(Some(view));
    };
    let tooltip = move |layer_id: &str, object: &serde_json::Value| {
        session
            .try_with_untracked(|s| {
                s.map_data
                    .as_ref()
                    .and_then(|data| build_tooltip(data, layer_id, object))
            })
            .flatten()
    };
    if let Err(e) = engine::init(&base.view, on_view_change, tooltip) {
        web_sys::console::error_1(&e.into());
    }

    let state = BootState {
        config,
        token,
        base,
    };
    boot_store.set_value(Some(state.clone()));
    remove_loading_shell();
    load_map(session, state);
}

/// Root application component. Owns the map session and hands it to each handler.
#[component]
pub fn App() -> impl IntoView {
    let session: RwSignal<MapSession> = RwSignal::new(MapSession::default());
    let login_required: RwSignal<bool> = RwSignal::new(false);
    let live_view: RwSignal<Option<ViewState>> = RwSignal::new(None);
    let boot_store: StoredValue<Option<BootState>> = StoredValue::new(None);
    let booted: RwSignal<bool> = RwSignal::new(false);

    // Boot after mount so the canvas and basemap containers exist.
    Effect::new(move || {
        if booted.get_untracked() {
            return;
        }
        booted.set(true);
        spawn_local(boot(session, login_required, live_view, boot_store));
    });

    let has_legend = Memo::new(move |_| session.with(|s| s.legend.is_some()));
    let legend_entries: Memo<Vec<LegendEntry>> =
        Memo::new(move |_| session.with(|s| s.legend.clone().unwrap_or_default()));

    let on_toggle = Callback::new(move |change: VisibilityChange| {
        let changed = session
            .try_update(|s| s.toggle_visibility(&change))
            .unwrap_or(false);
        if changed {
            session.with_untracked(|s| engine::set_layers(&s.layers));
        }
    });

    let on_reload = move |_| {
        let Some(state) = boot_store.get_value() else {
            return;
        };
        load_map(session, state);
    };

    view! {
        <div class="app-shell">
            <header class="map-header">
                <h1 class="map-title">
                    {move || session.with(|s| s.title().unwrap_or("Cartoview").to_owned())}
                </h1>
                <span class="layer-count-label">"Layers: "</span>
                <span id="layerCount">{move || session.with(|s| s.layer_count.to_string())}</span>
                <span class="view-readout">
                    {move || live_view.get().map(|view| format_view(&view)).unwrap_or_default()}
                </span>
                <button class="reload-btn" on:click=on_reload>"Reload"</button>
            </header>
            <div
                id="login-box"
                style:display=move || if login_required.get() { "block" } else { "none" }
            >
                "Sign in to load private maps."
            </div>
            <div id={engine::BASEMAP_CONTAINER_ID} class="basemap"></div>
            <canvas id={engine::DECK_CANVAS_ID} class="deck-canvas"></canvas>
            {move || {
                has_legend
                    .get()
                    .then(|| view! { <Legend entries=legend_entries on_toggle=on_toggle /> })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::format_view;
    use cartoview_shared::ViewState;

    #[test]
    fn view_readout_rounds_coordinates() {
        let view = ViewState {
            latitude: 40.712_776,
            longitude: -74.005_974,
            zoom: 12.34,
            ..ViewState::default()
        };
        assert_eq!(format_view(&view), "40.7128, -74.0060 · z12.3");
    }
}
