use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let static_assets = Router::new()
        .fallback_service(
            ServeDir::new(state.dist_dir.as_ref())
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(middleware::from_fn(set_static_cache_control));

    let app = Router::new()
        .route("/api/config", axum::routing::get(routes::api::client_config))
        .route("/api/health", axum::routing::get(routes::api::health));

    app.layer(CompressionLayer::new())
        .fallback_service(static_assets)
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Trunk stamps every build output except the HTML entry point with a content
/// hash, so only the entry point needs revalidation after a deploy.
fn cache_control_for_path(path: &str) -> Option<&'static str> {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.ends_with(".html") {
        return Some("no-cache");
    }

    let hashed = match path.split_once('/') {
        Some(("snippets", rest)) => rest.split('/').next().is_some_and(has_trunk_hash),
        Some(_) => false,
        None => has_trunk_hash(path),
    };
    hashed.then_some(IMMUTABLE)
}

/// `name-<hash>.js`, `name-<hash>_bg.wasm` and snippet dirs `name-<hash>`,
/// where the hash is 16 hex digits.
fn has_trunk_hash(name: &str) -> bool {
    name.split(['-', '_', '.'])
        .any(|segment| segment.len() == 16 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use cartoview_shared::{ClientConfig, GeocodingMode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(
            ClientConfig {
                api_base_url: "https://api.example.com".into(),
                map_id: "map-1".into(),
                geocoding: GeocodingMode::google(Some("key".into()), None),
            },
            "does-not-exist",
        )
    }

    async fn get(path: &str) -> Response {
        build_app(test_state())
            .oneshot(
                HttpRequest::builder()
                    .uri(path)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response")
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn immutable_cache_for_hashed_bundle_assets() {
        assert_eq!(
            cache_control_for_path("/cartoview-client-71578f6b278221f3_bg.wasm"),
            Some(IMMUTABLE)
        );
        assert_eq!(
            cache_control_for_path("/cartoview-client-71578f6b278221f3.js"),
            Some(IMMUTABLE)
        );
        assert_eq!(
            cache_control_for_path("/index-a93762ff3bf6d63a.css"),
            Some(IMMUTABLE)
        );
    }

    #[test]
    fn snippets_under_hashed_dir_are_immutable() {
        assert_eq!(
            cache_control_for_path("/snippets/cartoview-client-4a8f0c2d9e1b7f36/js/engine.js"),
            Some(IMMUTABLE)
        );
        assert_eq!(
            cache_control_for_path("/snippets/cartoview-client/js/engine.js"),
            None
        );
    }

    #[test]
    fn entry_point_is_revalidated() {
        assert_eq!(cache_control_for_path("/"), Some("no-cache"));
        assert_eq!(cache_control_for_path("/index.html"), Some("no-cache"));
    }

    #[test]
    fn unhashed_files_get_no_override() {
        assert_eq!(cache_control_for_path("/favicon.ico"), None);
        assert_eq!(cache_control_for_path("/engine.js"), None);
        assert_eq!(cache_control_for_path("/img/71578f6b278221f3.png"), None);
    }

    #[tokio::test]
    async fn config_endpoint_serves_client_config() {
        let response = get("/api/config").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );

        let config: ClientConfig =
            serde_json::from_value(json_body(response).await).expect("client config");
        assert_eq!(config, test_state().client_config.as_ref().clone());
    }

    #[tokio::test]
    async fn health_reports_map_and_geocoding() {
        let response = get("/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["map_id"], "map-1");
        assert_eq!(body["geocoding_enabled"], true);
    }

    #[tokio::test]
    async fn unknown_static_path_is_not_found() {
        let response = get("/missing.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
