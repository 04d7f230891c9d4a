use serde::{Deserialize, Serialize};

use crate::layer::LayerDescriptor;

/// DOM event the legend dispatches when a layer checkbox changes.
pub const TOGGLE_VISIBILITY_EVENT: &str = "togglelayervisibility";

/// Detail payload of [`TOGGLE_VISIBILITY_EVENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityChange {
    pub layer_id: String,
    pub visible: bool,
}

/// One legend row, derived from a layer descriptor at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub layer_id: String,
    pub label: String,
    pub visible: bool,
    pub swatch_color: String,
}

impl LegendEntry {
    pub fn from_layer(index: usize, layer: &LayerDescriptor) -> Self {
        Self {
            layer_id: layer.layer_id(index),
            label: layer.label(index),
            visible: layer.is_visible(),
            swatch_color: layer.swatch_color(),
        }
    }

    /// Element id of this row's checkbox.
    pub fn checkbox_id(&self) -> String {
        format!("layer-toggle-{}", self.layer_id)
    }
}

pub fn build_entries<L: AsRef<LayerDescriptor>>(layers: &[L]) -> Vec<LegendEntry> {
    layers
        .iter()
        .enumerate()
        .map(|(index, layer)| LegendEntry::from_layer(index, layer.as_ref()))
        .collect()
}
