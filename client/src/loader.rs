use cartoview_shared::map_data::parse_map_response;
use cartoview_shared::{ClientConfig, LoadError, MapData, ResolvedView};

use crate::engine;

/// Fetch and normalize the configured map.
pub async fn load(
    config: &ClientConfig,
    token: Option<&str>,
    base: &ResolvedView,
) -> Result<MapData, LoadError> {
    let body = engine::fetch_map(&config.api_base_url, &config.map_id, token)
        .await
        .map_err(|e| LoadError::Transport(format!("fetch error: {e}")))?;

    let response = parse_map_response(&body)?;
    Ok(MapData::from_response(response, base))
}
