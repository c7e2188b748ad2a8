use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, warn};

use super::AppState;
use crate::{
    convert::aggregate,
    metrics::{self, RequestTimer},
    models::{ApplicationHealthAnalyzeRequest, DocumentResponse, HealthDocument, JobResponse},
    Result, ServiceError,
};

pub fn healthcheck_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_job))
        .route("/id/:id", get(find_job))
}

async fn create_job(State(state): State<AppState>, body: Bytes) -> Result<Json<JobResponse>> {
    let _timer = RequestTimer::new("create");

    let request: ApplicationHealthAnalyzeRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("failed to decode create request: {}", e);
        ServiceError::BadRequest("Bad request".to_string())
    })?;

    if request.app_name.trim().is_empty() {
        error!("appName is empty");
        return Err(ServiceError::BadRequest("appName is empty".to_string()));
    }

    let outcome = aggregate(&request.metrics);
    metrics::record_verdict(outcome.verdict);
    if !outcome.succeeded() {
        warn!("rejecting job for {}: {}", request.app_name, outcome.reason);
        return Err(ServiceError::BadRequest(outcome.reason));
    }
    if !outcome.reason.is_empty() {
        warn!(
            "accepting job for {} ({}) with group errors: {}",
            request.app_name, outcome.verdict, outcome.reason
        );
    }

    let document = HealthDocument::from_request(&request, outcome.configs);
    let response = match state.store.create(&document).await {
        Ok(id) => {
            info!("Created job {} for {}", id, request.app_name);
            JobResponse::created(id)
        }
        Err(e) => {
            error!("failed to store job for {}: {}", request.app_name, e);
            JobResponse::create_failed(e.to_string())
        }
    };

    Ok(Json(response))
}

async fn find_job(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let _timer = RequestTimer::new("find_by_id");
    info!("Search by id: {}", id);

    match state.store.find_by_id(&id).await {
        Ok(Some(document)) => Json(DocumentResponse {
            job_id: id,
            document,
        })
        .into_response(),
        Ok(None) => Json(JobResponse::not_found(&id)).into_response(),
        Err(e) => {
            error!("lookup of {} failed: {}", id, e);
            Json(JobResponse::lookup_failed(&id, e.to_string())).into_response()
        }
    }
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}
