// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use taskdeck::api::http::http_router;
use taskdeck::config::CONFIG;
use taskdeck::llm::{GeminiClient, GenerativeModel};
use taskdeck::state::create_app_state;
use taskdeck::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting taskdeck");
    info!(
        "Primary model: {} (fallback: {})",
        CONFIG.primary_model, CONFIG.fallback_model
    );

    let pool = store::connect(&CONFIG.database_url).await?;

    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::from_config()?);
    let app_state = Arc::new(create_app_state(pool, model));

    let app = Router::new().nest("/api", http_router(app_state));

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("HTTP server listening on http://{}/api", bind_address);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
