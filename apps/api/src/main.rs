mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod workflow;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::auth::ServiceAccountAuth;
use crate::store::sheets::GoogleSheetsStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (halts on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting staffing agent v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the spreadsheet store
    let auth = ServiceAccountAuth::from_json(&config.gcp_json_key)
        .context("GCP_JSON_KEY is not a usable service-account key")?;
    info!("Service account: {}", auth.client_email());
    let store = GoogleSheetsStore::new(auth)?;
    info!(
        "Record store initialized (store: {}, sheets: {} / {})",
        config.workflow.store_name, config.workflow.jobs_sheet, config.workflow.candidates_sheet
    );

    // Initialize the generation client
    let generator = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())?;
    info!("Generation client initialized (model: {})", config.gemini_model);
    info!(
        "Output shape: {:?}, matching mode: {:?}",
        config.workflow.output_shape, config.workflow.matching_mode
    );

    let state = AppState {
        store: Arc::new(store),
        generator: Arc::new(generator),
        workflow: config.workflow.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the agent UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
