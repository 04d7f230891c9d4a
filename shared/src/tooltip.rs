use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::map_data::MapData;

/// Per-layer popup configuration, keyed by layer id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopupSettings {
    pub layers: BTreeMap<String, LayerPopup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerPopup {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub fields: Vec<PopupField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupField {
    pub name: String,
    #[serde(default)]
    pub custom_name: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl PopupSettings {
    /// Read the entries that look like layer popups; anything else is dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let layers: BTreeMap<String, LayerPopup> = object
            .iter()
            .filter_map(|(layer_id, popup)| {
                serde_json::from_value::<LayerPopup>(popup.clone())
                    .ok()
                    .map(|popup| (layer_id.clone(), popup))
            })
            .collect();
        if layers.is_empty() {
            return None;
        }
        Some(Self { layers })
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Tooltip HTML for a hovered feature, or `None` when the layer has no popup.
pub fn build_tooltip(map: &MapData, layer_id: &str, object: &Value) -> Option<String> {
    let popup = map.popup_settings.as_ref()?.layers.get(layer_id)?;
    if !popup.enabled {
        return None;
    }
    let properties = object.get("properties").unwrap_or(object);

    let mut html = String::new();
    for field in &popup.fields {
        let Some(value) = properties.get(&field.name).and_then(display_value) else {
            continue;
        };
        let label = field.custom_name.as_deref().unwrap_or(&field.name);
        let _ = write!(
            html,
            r#"<div class="tooltip-row"><span class="tooltip-key">{}</span> {}</div>"#,
            escape_html(label),
            escape_html(&value)
        );
    }

    (!html.is_empty()).then_some(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_data::{MapConfigResponse, MapData};
    use crate::view_state::ResolvedView;
    use serde_json::json;

    fn map_with_popups(popups: Value) -> MapData {
        MapData::from_response(
            MapConfigResponse {
                popup_settings: Some(popups),
                ..MapConfigResponse::default()
            },
            &ResolvedView::default(),
        )
    }

    #[test]
    fn renders_configured_fields_in_order() {
        let map = map_with_popups(json!({
            "stores": {"fields": [
                {"name": "name", "customName": "Store"},
                {"name": "revenue"}
            ]}
        }));
        let object = json!({"properties": {"revenue": 1200, "name": "Main <St>"}});
        let html = build_tooltip(&map, "stores", &object).expect("tooltip");
        assert_eq!(
            html,
            concat!(
                r#"<div class="tooltip-row"><span class="tooltip-key">Store</span> Main &lt;St&gt;</div>"#,
                r#"<div class="tooltip-row"><span class="tooltip-key">revenue</span> 1200</div>"#
            )
        );
    }

    #[test]
    fn disabled_or_unknown_layers_have_no_tooltip() {
        let map = map_with_popups(json!({
            "stores": {"enabled": false, "fields": [{"name": "name"}]}
        }));
        let object = json!({"name": "x"});
        assert!(build_tooltip(&map, "stores", &object).is_none());
        assert!(build_tooltip(&map, "other", &object).is_none());
    }

    #[test]
    fn missing_values_are_skipped() {
        let map = map_with_popups(json!({"a": {"fields": [{"name": "gone"}]}}));
        assert!(build_tooltip(&map, "a", &json!({"other": 1})).is_none());
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let settings = PopupSettings::from_value(&json!({
            "a": {"fields": [{"name": "x"}]},
            "b": 7
        }))
        .expect("one valid entry");
        assert_eq!(settings.layers.len(), 1);
        assert!(settings.layers.contains_key("a"));
    }
}
