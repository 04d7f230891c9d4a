use serde::{Deserialize, Serialize};

use crate::geocode::GOOGLE_GEOCODE_ENDPOINT;

pub const DEFAULT_API_BASE_URL: &str = "https://gcp-us-east1.api.carto.com";
pub const DEFAULT_MAP_ID: &str = "838ff113-1b19-4b86-8712-106550b2fb06";

/// Runtime configuration handed to the browser client by `/api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub map_id: String,
    #[serde(default)]
    pub geocoding: GeocodingMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            map_id: DEFAULT_MAP_ID.to_owned(),
            geocoding: GeocodingMode::Disabled,
        }
    }
}

/// Whether the `address` URL parameter is geocoded, and through which service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum GeocodingMode {
    #[default]
    Disabled,
    Google {
        api_key: String,
        #[serde(default = "default_google_endpoint")]
        endpoint: String,
    },
}

fn default_google_endpoint() -> String {
    GOOGLE_GEOCODE_ENDPOINT.to_owned()
}

impl GeocodingMode {
    /// Google geocoding when a non-blank key is configured.
    pub fn google(api_key: Option<String>, endpoint: Option<String>) -> Self {
        match api_key.map(|key| key.trim().to_owned()) {
            Some(api_key) if !api_key.is_empty() => Self::Google {
                api_key,
                endpoint: endpoint
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(default_google_endpoint),
            },
            _ => Self::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}
