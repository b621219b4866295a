//! # Gallery Server
//!
//! Loads the catalog file once, then serves:
//!
//! - `GET /all-traits.json`: the catalog in its input shape
//! - `GET /traits`: per-category trait statistics
//! - `GET /ws`: one collection view session per client, driven by JSON
//!   commands (see `command.rs`)
//!
//! ```text
//! all-traits.json ──→ load_catalog()  (once, at startup)
//!                          │
//!                     Arc<Catalog>  ─── shared read-only by every route
//!                          │
//!          ┌───────────────┼────────────────┐
//!          ▼               ▼                ▼
//!   /all-traits.json    /traits      /ws (ViewSession per client)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use gallery_shared::{trait_stats, Catalog, TraitCategory, TraitStat, ViewConfig};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod engine;
mod loader;
mod session;

use config::ServerConfig;
use loader::load_catalog;
use session::ws_handler;

type TraitStats = BTreeMap<TraitCategory, Vec<TraitStat>>;

/// Shared, read-only state cloned into every route.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub stats: Arc<TraitStats>,
    pub view_config: ViewConfig,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, view_config: ViewConfig) -> Self {
        let stats = Arc::new(trait_stats(&catalog));
        AppState {
            catalog,
            stats,
            view_config,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/all-traits.json", get(catalog_json))
        .route("/traits", get(traits_json))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn catalog_json(State(state): State<AppState>) -> Json<Arc<Catalog>> {
    Json(state.catalog)
}

async fn traits_json(State(state): State<AppState>) -> Json<Arc<TraitStats>> {
    Json(state.stats)
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let catalog = Arc::new(load_catalog(&config.catalog_path).await);
    let app = router(AppState::new(catalog, config.view.clone()));

    let listener = match TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {e}", config.bind_addr);
            return;
        }
    };
    info!("Server listening on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
    }
}
