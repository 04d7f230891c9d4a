use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Zoom applied when the camera is centred on a geocoded address.
pub const ADDRESS_MIN_ZOOM: f64 = 12.0;

pub const PARAM_LATITUDE: &str = "lat";
pub const PARAM_LONGITUDE: &str = "long";
pub const PARAM_ZOOM: &str = "zoom";
pub const PARAM_PITCH: &str = "pitch";
pub const PARAM_ADDRESS: &str = "address";

/// Query-string parameters, already percent-decoded.
pub type QueryParams = HashMap<String, String>;

/// Camera parameters describing what the map currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            zoom: 1.0,
            bearing: 0.0,
            pitch: 0.0,
        }
    }
}

/// Partial view state as returned by the map-config service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteViewState {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zoom: Option<f64>,
    pub bearing: Option<f64>,
    pub pitch: Option<f64>,
}

/// Which fields the user pinned, either through the URL or a geocoded address.
/// Pinned fields are never replaced by the remote view state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplicitFields {
    pub latitude: bool,
    pub longitude: bool,
    pub zoom: bool,
    pub pitch: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedView {
    pub view: ViewState,
    pub explicit: ExplicitFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

fn number_param(params: &QueryParams, key: &str) -> Option<f64> {
    let raw = params.get(key)?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Build the starting view state from URL parameters.
///
/// Missing, empty or non-numeric values fall back to `defaults` and are left
/// unpinned. Bearing is never read from the URL.
pub fn resolve(params: &QueryParams, defaults: &ViewState) -> ResolvedView {
    let latitude = number_param(params, PARAM_LATITUDE);
    let longitude = number_param(params, PARAM_LONGITUDE);
    let zoom = number_param(params, PARAM_ZOOM).filter(|zoom| *zoom >= 0.0);
    let pitch = number_param(params, PARAM_PITCH);

    ResolvedView {
        view: ViewState {
            latitude: latitude.unwrap_or(defaults.latitude),
            longitude: longitude.unwrap_or(defaults.longitude),
            zoom: zoom.unwrap_or(defaults.zoom),
            bearing: defaults.bearing,
            pitch: pitch.unwrap_or(defaults.pitch),
        },
        explicit: ExplicitFields {
            latitude: latitude.is_some(),
            longitude: longitude.is_some(),
            zoom: zoom.is_some(),
            pitch: pitch.is_some(),
        },
    }
}

/// Non-blank `address` parameter, trimmed.
pub fn address_param(params: &QueryParams) -> Option<&str> {
    params
        .get(PARAM_ADDRESS)
        .map(|address| address.trim())
        .filter(|address| !address.is_empty())
}

/// Centre on a geocoded address. Latitude, longitude and zoom become pinned;
/// bearing and pitch are left alone.
pub fn apply_geocode(resolved: ResolvedView, geocoded: Option<LatLng>) -> ResolvedView {
    let Some(coords) = geocoded else {
        return resolved;
    };
    let mut out = resolved;
    out.view.latitude = coords.latitude;
    out.view.longitude = coords.longitude;
    out.view.zoom = resolved.view.zoom.max(ADDRESS_MIN_ZOOM);
    out.explicit.latitude = true;
    out.explicit.longitude = true;
    out.explicit.zoom = true;
    out
}

/// Fill unpinned fields from the remote view state. Bearing always comes from
/// the remote side when it has one, otherwise it resets to 0.
pub fn fill_from_remote(resolved: &ResolvedView, remote: Option<&RemoteViewState>) -> ViewState {
    let remote = remote.copied().unwrap_or_default();
    let pick = |pinned: bool, local: f64, remote: Option<f64>| -> f64 {
        if pinned {
            return local;
        }
        remote.filter(|value| value.is_finite()).unwrap_or(local)
    };

    let view = &resolved.view;
    let explicit = &resolved.explicit;
    ViewState {
        latitude: pick(explicit.latitude, view.latitude, remote.latitude),
        longitude: pick(explicit.longitude, view.longitude, remote.longitude),
        zoom: pick(explicit.zoom, view.zoom, remote.zoom.filter(|z| *z >= 0.0)),
        bearing: remote.bearing.filter(|b| b.is_finite()).unwrap_or(0.0),
        pitch: pick(explicit.pitch, view.pitch, remote.pitch),
    }
}

/// Full precedence chain: URL/defaults, then geocoded address, then remote gaps.
pub fn merge(
    base: ResolvedView,
    geocoded: Option<LatLng>,
    remote: Option<&RemoteViewState>,
) -> ViewState {
    fill_from_remote(&apply_geocode(base, geocoded), remote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_params_resolve_to_defaults() {
        let resolved = resolve(&QueryParams::new(), &ViewState::default());
        assert_eq!(resolved.view, ViewState::default());
        assert_eq!(resolved.explicit, ExplicitFields::default());
    }

    #[test]
    fn non_numeric_params_resolve_to_defaults() {
        let resolved = resolve(
            &params(&[
                ("lat", "north"),
                ("long", ""),
                ("zoom", "NaN"),
                ("pitch", "inf"),
            ]),
            &ViewState::default(),
        );
        assert_eq!(resolved.view, ViewState::default());
        assert_eq!(resolved.explicit, ExplicitFields::default());
    }

    #[test]
    fn negative_zoom_is_rejected() {
        let resolved = resolve(&params(&[("zoom", "-3")]), &ViewState::default());
        assert_eq!(resolved.view.zoom, 1.0);
        assert!(!resolved.explicit.zoom);
    }

    #[test]
    fn bearing_is_never_read_from_params() {
        let resolved = resolve(&params(&[("bearing", "90")]), &ViewState::default());
        assert_eq!(resolved.view.bearing, 0.0);
    }

    #[test]
    fn numeric_params_are_pinned() {
        let resolved = resolve(
            &params(&[("lat", "10"), ("long", " 20.5 "), ("pitch", "30")]),
            &ViewState::default(),
        );
        assert_eq!(resolved.view.latitude, 10.0);
        assert_eq!(resolved.view.longitude, 20.5);
        assert_eq!(resolved.view.pitch, 30.0);
        assert!(resolved.explicit.latitude);
        assert!(resolved.explicit.longitude);
        assert!(!resolved.explicit.zoom);
        assert!(resolved.explicit.pitch);
    }

    #[test]
    fn address_param_ignores_blank_values() {
        assert_eq!(address_param(&params(&[("address", "   ")])), None);
        assert_eq!(
            address_param(&params(&[("address", " 1 Main St ")])),
            Some("1 Main St")
        );
    }

    #[test]
    fn geocode_overrides_coordinates_and_raises_zoom() {
        let base = resolve(
            &params(&[("lat", "1"), ("long", "2"), ("zoom", "5"), ("pitch", "40")]),
            &ViewState::default(),
        );
        let coords = LatLng {
            latitude: 48.85,
            longitude: 2.35,
        };
        let out = apply_geocode(base, Some(coords));
        assert_eq!(out.view.latitude, 48.85);
        assert_eq!(out.view.longitude, 2.35);
        assert_eq!(out.view.zoom, 12.0);
        assert_eq!(out.view.pitch, 40.0);
        assert_eq!(out.view.bearing, 0.0);
    }

    #[test]
    fn geocode_keeps_higher_zoom() {
        let base = resolve(&params(&[("zoom", "15")]), &ViewState::default());
        let out = apply_geocode(
            base,
            Some(LatLng {
                latitude: 0.0,
                longitude: 0.0,
            }),
        );
        assert_eq!(out.view.zoom, 15.0);
    }

    #[test]
    fn missing_geocode_leaves_view_untouched() {
        let base = resolve(&params(&[("lat", "3")]), &ViewState::default());
        assert_eq!(apply_geocode(base, None), base);
    }

    #[test]
    fn remote_never_overwrites_pinned_fields() {
        let base = resolve(&params(&[("lat", "10"), ("zoom", "4")]), &ViewState::default());
        let remote = RemoteViewState {
            latitude: Some(-33.0),
            longitude: Some(151.0),
            zoom: Some(9.0),
            bearing: None,
            pitch: Some(45.0),
        };
        let view = fill_from_remote(&base, Some(&remote));
        assert_eq!(view.latitude, 10.0);
        assert_eq!(view.zoom, 4.0);
        assert_eq!(view.longitude, 151.0);
        assert_eq!(view.pitch, 45.0);
        assert_eq!(view.bearing, 0.0);
    }

    #[test]
    fn remote_gaps_keep_resolved_values() {
        let base = resolve(&QueryParams::new(), &ViewState::default());
        let remote = RemoteViewState {
            zoom: Some(3.0),
            ..RemoteViewState::default()
        };
        let view = fill_from_remote(&base, Some(&remote));
        assert_eq!(view.latitude, 0.0);
        assert_eq!(view.zoom, 3.0);
    }

    #[test]
    fn geocoded_coordinates_survive_remote_fill() {
        let base = resolve(&QueryParams::new(), &ViewState::default());
        let remote = RemoteViewState {
            latitude: Some(1.0),
            longitude: Some(1.0),
            zoom: Some(2.0),
            bearing: Some(10.0),
            pitch: Some(20.0),
        };
        let view = merge(
            base,
            Some(LatLng {
                latitude: 40.0,
                longitude: -74.0,
            }),
            Some(&remote),
        );
        assert_eq!(
            view,
            ViewState {
                latitude: 40.0,
                longitude: -74.0,
                zoom: 12.0,
                bearing: 10.0,
                pitch: 20.0,
            }
        );
    }

    #[test]
    fn url_view_with_remote_bearing() {
        let base = resolve(
            &params(&[("lat", "10"), ("long", "20"), ("zoom", "5")]),
            &ViewState::default(),
        );
        let remote = RemoteViewState {
            bearing: Some(45.0),
            ..RemoteViewState::default()
        };
        let view = merge(base, None, Some(&remote));
        assert_eq!(
            view,
            ViewState {
                latitude: 10.0,
                longitude: 20.0,
                zoom: 5.0,
                bearing: 45.0,
                pitch: 0.0,
            }
        );
    }

    #[test]
    fn remote_view_state_deserializes_partial_payloads() {
        let remote: RemoteViewState =
            serde_json::from_str(r#"{"bearing": 45, "zoom": 3.5}"#).expect("partial view state");
        assert_eq!(remote.bearing, Some(45.0));
        assert_eq!(remote.zoom, Some(3.5));
        assert_eq!(remote.latitude, None);
    }
}
