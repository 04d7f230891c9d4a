use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Swatch used when a layer carries no usable fill information.
pub const NEUTRAL_SWATCH: &str = "#333";

/// One renderable layer as described by the map-config service.
///
/// Only the fields the app reads are typed; everything else round-trips
/// through `extra` so the engine receives the descriptor unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: LayerProps,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scales: Scales,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carto_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_fill_color: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Scale>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    #[serde(default, deserialize_with = "null_as_default")]
    pub range: Vec<ColorValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Map service payloads use `null` and absence interchangeably.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A colour as it appears in a scale range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Css(String),
    Channels(Vec<f64>),
    Other(Value),
}

/// Where a layer's representative fill colour can come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillSource<'a> {
    /// First entry of the fill-colour scale's output range.
    ScaleRange(&'a ColorValue),
    /// Static `getFillColor` channels (r, g, b and maybe a).
    Static(&'a [Value]),
}

impl FillSource<'_> {
    /// CSS colour for this source, if its shape is usable.
    pub fn css(&self) -> Option<String> {
        match self {
            Self::ScaleRange(ColorValue::Css(css)) => Some(css.clone()),
            Self::ScaleRange(ColorValue::Channels(channels)) => match channels.as_slice() {
                [r, g, b] => Some(rgba_css(*r, *g, *b, 255.0)),
                [r, g, b, a] => Some(rgba_css(*r, *g, *b, *a)),
                _ => None,
            },
            Self::ScaleRange(ColorValue::Other(_)) => None,
            Self::Static(channels) => {
                let rgb: Vec<f64> = channels.iter().take(3).filter_map(Value::as_f64).collect();
                match rgb.as_slice() {
                    [r, g, b] => Some(format!("rgb({r}, {g}, {b})")),
                    _ => None,
                }
            }
        }
    }
}

/// `rgba(...)` with the alpha channel mapped from 0–255 to 0–1.
pub fn rgba_css(r: f64, g: f64, b: f64, a: f64) -> String {
    format!("rgba({r}, {g}, {b}, {})", a / 255.0)
}

impl LayerDescriptor {
    /// Identifier the engine uses for this layer; `layer-<index>` when unset.
    pub fn layer_id(&self, index: usize) -> String {
        self.props
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("layer-{index}"))
    }

    /// Display label; `Layer N` (1-based) when unset.
    pub fn label(&self, index: usize) -> String {
        self.props
            .carto_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Layer {}", index + 1))
    }

    pub fn is_visible(&self) -> bool {
        self.props.visible != Some(false)
    }

    /// Fill sources in priority order.
    pub fn fill_sources(&self) -> impl Iterator<Item = FillSource<'_>> {
        let scale = self
            .scales
            .fill_color
            .as_ref()
            .and_then(|scale| scale.range.first())
            .map(FillSource::ScaleRange);
        let fill = self
            .props
            .get_fill_color
            .as_ref()
            .and_then(Value::as_array)
            .map(|channels| FillSource::Static(channels.as_slice()));
        scale.into_iter().chain(fill)
    }

    /// Representative colour shown next to the layer name.
    pub fn swatch_color(&self) -> String {
        self.fill_sources()
            .find_map(|source| source.css())
            .unwrap_or_else(|| NEUTRAL_SWATCH.to_owned())
    }

    /// Copy of this descriptor with only the visibility flag replaced.
    pub fn with_visibility(&self, visible: bool) -> Self {
        let mut next = self.clone();
        next.props.visible = Some(visible);
        next
    }
}

impl AsRef<LayerDescriptor> for LayerDescriptor {
    fn as_ref(&self) -> &LayerDescriptor {
        self
    }
}
