pub mod server;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use server::{config::AppConfig, AppState};

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scorebat_highlights_lib=info,tower_http=info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run() {
    init_tracing();
    let config = AppConfig::from_env();

    let state = match AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("failed to initialise: {e}");
            return;
        }
    };

    server::start_server(state).await;
}
