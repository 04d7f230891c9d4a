use std::sync::Arc;

use cartoview_shared::ClientConfig;

#[derive(Clone)]
pub struct AppState {
    pub client_config: Arc<ClientConfig>,
    pub dist_dir: Arc<str>,
}

impl AppState {
    pub fn new(client_config: ClientConfig, dist_dir: impl Into<Arc<str>>) -> Self {
        Self {
            client_config: Arc::new(client_config),
            dist_dir: dist_dir.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(crate::config::client_config(), crate::config::dist_dir())
    }
}
