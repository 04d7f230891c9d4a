use serde::Deserialize;

use crate::view_state::LatLng;

pub const GOOGLE_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Subset of the Google Geocoding API response we read.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub geometry: GeocodeGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeGeometry {
    pub location: GeocodeLocation,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeocodeLocation {
    pub lat: f64,
    pub lng: f64,
}

/// Why a geocoding call produced no coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeMiss {
    Status(String),
    NoResults,
    Parse(String),
}

impl std::fmt::Display for GeocodeMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "geocoder returned status {status}"),
            Self::NoResults => f.write_str("geocoder returned no results"),
            Self::Parse(e) => write!(f, "geocoder payload parse error: {e}"),
        }
    }
}

/// First result's coordinates, or why there are none.
pub fn first_location(response: &GeocodeResponse) -> Result<LatLng, GeocodeMiss> {
    if response.status != "OK" {
        return Err(GeocodeMiss::Status(response.status.clone()));
    }
    let first = response.results.first().ok_or(GeocodeMiss::NoResults)?;
    let location = first.geometry.location;
    if !location.lat.is_finite() || !location.lng.is_finite() {
        return Err(GeocodeMiss::NoResults);
    }
    Ok(LatLng {
        latitude: location.lat,
        longitude: location.lng,
    })
}

/// Parse a raw payload and extract the first location.
pub fn parse_payload(body: &str) -> Result<LatLng, GeocodeMiss> {
    let response: GeocodeResponse =
        serde_json::from_str(body).map_err(|e| GeocodeMiss::Parse(e.to_string()))?;
    first_location(&response)
}
