use std::sync::Arc;

use crate::layer::LayerDescriptor;
use crate::legend::VisibilityChange;

/// Rebuild the engine's layer list for a visibility change.
///
/// Matching layers are replaced by a copy with only `visible` changed; every
/// other entry keeps its allocation. Returns `None` when no layer matches, so
/// callers can skip reinstalling an identical list.
pub fn apply_visibility(
    layers: &[Arc<LayerDescriptor>],
    change: &VisibilityChange,
) -> Option<Vec<Arc<LayerDescriptor>>> {
    let mut matched = false;
    let next = layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            if layer.layer_id(index) == change.layer_id {
                matched = true;
                Arc::new(layer.with_visibility(change.visible))
            } else {
                Arc::clone(layer)
            }
        })
        .collect();
    matched.then_some(next)
}
