//! Credit-risk prediction server
//!
//! Small REST surface over one loaded model artifact: a health endpoint, the
//! form schema the demo front-end renders, and single-record prediction.

mod error;
mod handlers;

pub use error::ServerError;

use crate::artifact::ModelArtifact;
use crate::model::RandomForest;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }
}

/// State shared across handlers: the loaded artifact
pub struct AppState {
    pub artifact: ModelArtifact<RandomForest>,
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/schema", get(handlers::schema))
        .route("/predict", post(handlers::predict))
        .with_state(state)
}

/// Serve the given artifact until ctrl+c
pub async fn run_server(config: ServerConfig, artifact: ModelArtifact<RandomForest>) -> anyhow::Result<()> {
    info!(
        version = %artifact.version,
        created_at = %artifact.created_at.to_rfc3339(),
        "Loaded model artifact"
    );

    let state = Arc::new(AppState { artifact });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Credit-risk server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
