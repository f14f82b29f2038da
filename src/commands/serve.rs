//! HTTP server command

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::server::{self, AppState};

pub fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    init_tracing();

    let root = config::get_app_root();
    let cfg = Config::load(&root);

    let loaded = super::build_pipeline(&root, &cfg)?;
    match &loaded.degraded {
        Some(reason) => warn!(reason = %reason, "serving in degraded mode"),
        None => info!(
            entries = loaded.entries,
            embedder = loaded.pipeline.matcher().embedder().name(),
            "pipeline ready"
        ),
    }

    let state = Arc::new(AppState {
        pipeline: loaded.pipeline,
        degraded: loaded.degraded.is_some(),
    });

    let host = host.unwrap_or_else(|| cfg.server.host.clone());
    let port = port.unwrap_or(cfg.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", host, port))?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(addr, state, &cfg.server.allowed_origins))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("moneta=info,tower_http=info")),
        )
        .init();
}
