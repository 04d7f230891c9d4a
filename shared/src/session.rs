use std::sync::Arc;

use crate::layer::LayerDescriptor;
use crate::legend::{LegendEntry, VisibilityChange, build_entries};
use crate::map_data::{LoadError, MapData};
use crate::reconcile::apply_visibility;
use crate::view_state::ViewState;

/// What the layer-count indicator shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LayerCount {
    #[default]
    Loading,
    Count(usize),
    Error(String),
}

impl std::fmt::Display for LayerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Error(message) => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A newer load started after this one; the result was dropped.
    Stale,
    Loaded,
    Failed,
}

/// Everything one load cycle produces, replaced wholesale on every load.
#[derive(Debug, Clone, Default)]
pub struct MapSession {
    epoch: u64,
    pub map_data: Option<MapData>,
    /// The engine's layer list. Entries are shared with `map_data` until toggled.
    pub layers: Vec<Arc<LayerDescriptor>>,
    pub legend: Option<Vec<LegendEntry>>,
    pub layer_count: LayerCount,
}

impl MapSession {
    /// Clear the previous world and return the epoch for the new load.
    pub fn begin_load(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.map_data = None;
        self.layers.clear();
        self.legend = None;
        self.layer_count = LayerCount::Loading;
        self.epoch
    }

    pub fn current_epoch(&self) -> u64 {
        self.epoch
    }

    /// Install a load result if `epoch` is still the latest load.
    pub fn finish_load(&mut self, epoch: u64, result: Result<MapData, LoadError>) -> LoadOutcome {
        if epoch != self.epoch {
            return LoadOutcome::Stale;
        }

        match result {
            Ok(data) => {
                self.layer_count = LayerCount::Count(data.layers.len());
                self.legend = (!data.layers.is_empty()).then(|| build_entries(&data.layers));
                self.layers = data.layers.clone();
                self.map_data = Some(data);
                LoadOutcome::Loaded
            }
            Err(e) => {
                self.layer_count = LayerCount::Error(e.indicator_text().to_owned());
                self.map_data = None;
                self.layers.clear();
                self.legend = None;
                LoadOutcome::Failed
            }
        }
    }

    /// Apply a legend toggle. Returns `true` when the engine list changed.
    pub fn toggle_visibility(&mut self, change: &VisibilityChange) -> bool {
        let Some(next) = apply_visibility(&self.layers, change) else {
            return false;
        };
        self.layers = next;
        if let Some(entries) = self.legend.as_mut() {
            for entry in entries.iter_mut().filter(|e| e.layer_id == change.layer_id) {
                entry.visible = change.visible;
            }
        }
        true
    }

    pub fn view_state(&self) -> Option<ViewState> {
        self.map_data.as_ref().map(|data| data.initial_view_state)
    }

    pub fn title(&self) -> Option<&str> {
        self.map_data.as_ref().map(|data| data.title.as_str())
    }
}
