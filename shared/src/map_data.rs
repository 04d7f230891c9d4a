use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::layer::LayerDescriptor;
use crate::tooltip::PopupSettings;
use crate::view_state::{RemoteViewState, ResolvedView, ViewState, fill_from_remote};

pub const UNTITLED_MAP: &str = "Untitled Map";

/// Map record as normalized by the CARTO maps client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfigResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub layers: Option<Vec<LayerDescriptor>>,
    #[serde(default)]
    pub popup_settings: Option<Value>,
    #[serde(default)]
    pub initial_view_state: Option<RemoteViewState>,
}

/// Normalized result of one load cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    pub title: String,
    pub layers: Vec<Arc<LayerDescriptor>>,
    pub popup_settings: Option<PopupSettings>,
    pub initial_view_state: ViewState,
}

impl MapData {
    /// Fill defaults and reconcile the remote view state against `base`.
    pub fn from_response(response: MapConfigResponse, base: &ResolvedView) -> Self {
        let title = response
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED_MAP.to_owned());
        let layers = response
            .layers
            .unwrap_or_default()
            .into_iter()
            .map(Arc::new)
            .collect();
        let popup_settings = response
            .popup_settings
            .as_ref()
            .and_then(PopupSettings::from_value);
        let initial_view_state = fill_from_remote(base, response.initial_view_state.as_ref());

        Self {
            title,
            layers,
            popup_settings,
            initial_view_state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Network failure or non-success HTTP status.
    Transport(String),
    /// The service answered without a map record.
    Empty,
    /// The body was not a map record.
    Parse(String),
}

impl LoadError {
    /// Text shown in place of the layer count.
    pub fn indicator_text(&self) -> &'static str {
        match self {
            Self::Empty => "Error loading map",
            Self::Transport(_) | Self::Parse(_) => "Error",
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Empty => f.write_str("map service returned no map"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Decode a map-config response body.
pub fn parse_map_response(body: &str) -> Result<MapConfigResponse, LoadError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(LoadError::Empty);
    }
    serde_json::from_str(trimmed).map_err(|e| LoadError::Parse(e.to_string()))
}
