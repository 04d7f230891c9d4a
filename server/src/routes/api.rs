use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "map_id": state.client_config.map_id,
        "geocoding_enabled": state.client_config.geocoding.is_enabled(),
    }))
}

/// Runtime config for the browser client. Never cached so env changes apply on reload.
pub async fn client_config(State(state): State<AppState>) -> Response {
    let mut response = Json(state.client_config.as_ref().clone()).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
