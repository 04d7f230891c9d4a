use cartoview_shared::config::{DEFAULT_API_BASE_URL, DEFAULT_MAP_ID};
use cartoview_shared::{ClientConfig, GeocodingMode};

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DIST_DIR: &str = "client/dist";

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub fn server_port() -> u16 {
    non_blank_env("CARTOVIEW_PORT")
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn dist_dir() -> String {
    non_blank_env("CARTOVIEW_DIST_DIR").unwrap_or_else(|| DEFAULT_DIST_DIR.to_owned())
}

pub fn api_base_url() -> String {
    non_blank_env("CARTOVIEW_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
}

pub fn map_id() -> String {
    non_blank_env("CARTOVIEW_MAP_ID").unwrap_or_else(|| DEFAULT_MAP_ID.to_owned())
}

pub fn geocoding_mode() -> GeocodingMode {
    GeocodingMode::google(
        non_blank_env("CARTOVIEW_GEOCODING_API_KEY"),
        non_blank_env("CARTOVIEW_GEOCODING_ENDPOINT"),
    )
}

/// Assemble the config served to the browser from the environment.
pub fn client_config() -> ClientConfig {
    ClientConfig {
        api_base_url: api_base_url(),
        map_id: map_id(),
        geocoding: geocoding_mode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartoview_shared::geocode::GOOGLE_GEOCODE_ENDPOINT;

    const VARS: [&str; 6] = [
        "CARTOVIEW_PORT",
        "CARTOVIEW_DIST_DIR",
        "CARTOVIEW_API_BASE_URL",
        "CARTOVIEW_MAP_ID",
        "CARTOVIEW_GEOCODING_API_KEY",
        "CARTOVIEW_GEOCODING_ENDPOINT",
    ];

    #[test]
    fn defaults_apply_when_env_is_unset() {
        temp_env::with_vars_unset(VARS, || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
            assert_eq!(dist_dir(), DEFAULT_DIST_DIR);
            assert_eq!(client_config(), ClientConfig::default());
        });
    }

    #[test]
    fn env_overrides_are_trimmed() {
        temp_env::with_vars(
            [
                ("CARTOVIEW_PORT", Some("8080")),
                ("CARTOVIEW_API_BASE_URL", Some(" https://api.example.com ")),
                ("CARTOVIEW_MAP_ID", Some("map-1")),
                ("CARTOVIEW_GEOCODING_API_KEY", Some("secret")),
                ("CARTOVIEW_GEOCODING_ENDPOINT", None),
            ],
            || {
                assert_eq!(server_port(), 8080);
                let config = client_config();
                assert_eq!(config.api_base_url, "https://api.example.com");
                assert_eq!(config.map_id, "map-1");
                assert_eq!(
                    config.geocoding,
                    GeocodingMode::Google {
                        api_key: "secret".into(),
                        endpoint: GOOGLE_GEOCODE_ENDPOINT.into(),
                    }
                );
            },
        );
    }

    #[test]
    fn invalid_port_falls_back() {
        temp_env::with_vars([("CARTOVIEW_PORT", Some("0"))], || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_vars([("CARTOVIEW_PORT", Some("http"))], || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
    }

    #[test]
    fn blank_geocoding_key_disables_geocoding() {
        temp_env::with_vars([("CARTOVIEW_GEOCODING_API_KEY", Some("   "))], || {
            assert_eq!(geocoding_mode(), GeocodingMode::Disabled);
        });
    }
}
