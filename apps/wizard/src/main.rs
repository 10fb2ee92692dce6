mod assembly;
mod clients;
mod config;
mod errors;
mod models;
mod preview;
mod routes;
mod state;
mod templates;
mod upload;
mod wizard;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clients::extraction::ExtractionClient;
use crate::clients::generation::GenerationClient;
use crate::clients::storage::StorageClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::wizard::registry::SessionRegistry;

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

    info!("Starting ResumeATS wizard service v{}", env!("CARGO_PKG_VERSION"));

    // Collaborator clients: extraction + generation share the builder API,
    // persistence goes to the managed storage service
    let extractor = Arc::new(ExtractionClient::new(config.builder_api_url.clone()));
    let generator = Arc::new(GenerationClient::new(config.builder_api_url.clone()));
    let store = Arc::new(StorageClient::new(
        config.supabase_url.clone(),
        config.supabase_service_key.clone(),
    ));
    info!("Collaborator clients initialized (builder API: {})", config.builder_api_url);

    // Build app state
    let state = AppState {
        sessions: SessionRegistry::new(),
        extractor,
        generator,
        store,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
