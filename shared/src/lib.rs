pub mod config;
pub mod geocode;
pub mod layer;
pub mod legend;
pub mod map_data;
pub mod reconcile;
pub mod session;
pub mod tooltip;
pub mod view_state;

pub use config::{ClientConfig, GeocodingMode};
pub use layer::LayerDescriptor;
pub use legend::{LegendEntry, TOGGLE_VISIBILITY_EVENT, VisibilityChange};
pub use map_data::{LoadError, MapData};
pub use session::{LayerCount, LoadOutcome, MapSession};
pub use view_state::{LatLng, QueryParams, ResolvedView, ViewState};
