pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod query;
pub mod routes;
pub mod scorebat;
pub mod types;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use cache::MatchCache;
use config::AppConfig;
use error::AppResult;
use routes::{build_router, ApiState};
use scorebat::{MatchSource, ScorebatClient};

pub struct AppState {
    pub config: AppConfig,
    pub api_state: ApiState,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let source = Arc::new(ScorebatClient::new(
            config.upstream_url.clone(),
            config.upstream_timeout,
        )?);
        Ok(Self::with_source(config, source))
    }

    /// Build the state around any match source (used by tests with stubs).
    pub fn with_source(config: AppConfig, source: Arc<dyn MatchSource>) -> Self {
        let cache = Arc::new(MatchCache::new(source, config.cache_ttl));
        let api_state = ApiState {
            cache,
            page_size: config.page_size,
            home_limit: config.home_limit,
        };

        Self { config, api_state }
    }
}

pub async fn start_server(state: Arc<AppState>) {
    let router = build_router(
        state.api_state.clone(),
        Some(state.config.static_dir.clone()),
    );

    let Some(addr) = state.config.bind_addr() else {
        error!(
            host = %state.config.host,
            port = state.config.port,
            "invalid listen address"
        );
        return;
    };

    match TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("HTTP server listening on http://{addr}");
            if let Err(e) = axum::serve(listener, router).await {
                error!("server error: {e}");
            }
        }
        Err(e) => {
            error!("failed to bind {addr}: {e}");
        }
    }
}
