use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{store::DocumentStore, Result, ServiceError};

pub mod healthcheck;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/v1/healthcheck", healthcheck::healthcheck_router())
        .route("/metrics", get(healthcheck::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        ServiceError::Internal(format!("Failed to bind to address {}: {}", addr, e))
    })?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| ServiceError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
