mod analysis;
mod chameleon;
mod committee;
mod config;
mod errors;
mod jobs;
mod llm_client;
mod nexus;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::committee::Committee;
use crate::config::Config;
use crate::jobs::store::{FileJobStore, JobStore, MemoryJobStore};
use crate::jobs::JobBoard;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Hiring committee: one gateway per reviewer role
    let committee = Committee::from_config(&config).context("Failed to build hiring committee")?;

    // Job board persistence
    let job_store: Arc<dyn JobStore> = match &config.jobs_file {
        Some(path) => {
            let store = FileJobStore::new(path);
            info!("Job board persisted to {}", store.path().display());
            Arc::new(store)
        }
        None => {
            info!("JOBS_FILE not set; job board is in-memory only");
            Arc::new(MemoryJobStore::default())
        }
    };
    let jobs = job_store
        .load()
        .await
        .context("Failed to load job board")?;
    info!("Loaded {} tracked jobs", jobs.len());

    let state = AppState::new(committee, JobBoard::new(jobs), job_store);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
