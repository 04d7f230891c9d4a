use cartoview_shared::ClientConfig;

const CONFIG_URL: &str = "/api/config";

async fn fetch_client_config() -> Result<ClientConfig, String> {
    let resp = gloo_net::http::Request::get(CONFIG_URL)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<ClientConfig>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// Runtime config from the host, or the built-in defaults when it is unavailable.
pub async fn load_client_config() -> ClientConfig {
    match fetch_client_config().await {
        Ok(config) => config,
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Runtime config unavailable ({e}); using built-in defaults").into(),
            );
            ClientConfig::default()
        }
    }
}
