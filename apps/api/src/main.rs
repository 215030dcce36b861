mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod flash;
mod jobs;
mod models;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use axum_extra::extract::cookie::Key;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FsResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL — the only fatal startup condition
    let db = create_pool(&config.database_url).await?;
    db::init_schema(&db).await?;

    // Initialize the resume store
    let store = FsResumeStore::new(&config.upload_dir);
    store.ensure_root().await?;
    info!("Resume store rooted at {}", config.upload_dir);

    // Session cookie signing key
    let key = Key::derive_from(config.secret_key.as_bytes());

    // Build app state
    let state = AppState {
        db,
        store: Arc::new(store),
        config: config.clone(),
        key,
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
