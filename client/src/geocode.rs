use cartoview_shared::geocode::parse_payload;
use cartoview_shared::{GeocodingMode, LatLng};

/// Geocode `address`. Every failure is logged and reported as `None`.
pub async fn geocode(mode: &GeocodingMode, address: &str) -> Option<LatLng> {
    let GeocodingMode::Google { api_key, endpoint } = mode else {
        return None;
    };

    let resp = match gloo_net::http::Request::get(endpoint)
        .query([("address", address), ("key", api_key.as_str())])
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            web_sys::console::warn_1(&format!("Geocoding request failed: {e}").into());
            return None;
        }
    };

    if !resp.ok() {
        web_sys::console::warn_1(
            &format!("Geocoding API returned error status: {}", resp.status()).into(),
        );
        return None;
    }

    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            web_sys::console::warn_1(&format!("Geocoding response unreadable: {e}").into());
            return None;
        }
    };

    match parse_payload(&body) {
        Ok(coords) => Some(coords),
        Err(miss) => {
            web_sys::console::warn_1(&format!("Could not geocode \"{address}\": {miss}").into());
            None
        }
    }
}
