//! Host configuration: constant defaults, overridable from the environment.

use std::path::PathBuf;

use gallery_shared::ViewConfig;
use tracing::warn;

/// Address to bind the HTTP / WebSocket server.
pub const BIND_ADDR: &str = "0.0.0.0:9001";

/// Catalog file read once at startup.
pub const CATALOG_PATH: &str = "all-traits.json";

pub const BIND_ADDR_VAR: &str = "GALLERY_BIND_ADDR";
pub const CATALOG_PATH_VAR: &str = "GALLERY_CATALOG_PATH";
/// Optional ViewConfig overrides as JSON, e.g. `{"page_size": 60}`.
pub const VIEW_CONFIG_VAR: &str = "GALLERY_VIEW_CONFIG";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub catalog_path: PathBuf,
    /// Starting configuration of every client session.
    pub view: ViewConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: BIND_ADDR.to_string(),
            catalog_path: PathBuf::from(CATALOG_PATH),
            view: ViewConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ServerConfig::default();

        if let Some(addr) = get(BIND_ADDR_VAR) {
            config.bind_addr = addr;
        }
        if let Some(path) = get(CATALOG_PATH_VAR) {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(json) = get(VIEW_CONFIG_VAR) {
            match serde_json::from_str(&json) {
                Ok(view) => config.view = view,
                Err(e) => warn!("{VIEW_CONFIG_VAR} ignored: {e}"),
            }
        }
        config
    }
}
