use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::ScoreRequest;
use super::providers::{FacilityHistoryProvider, FacilityMetadataProvider};
use super::service::{AdmissionScoreError, AdmissionScoreService};

/// Router builder exposing the admission scoring endpoint.
pub fn admission_router<M, H>(service: Arc<AdmissionScoreService<M, H>>) -> Router
where
    M: FacilityMetadataProvider + 'static,
    H: FacilityHistoryProvider + 'static,
{
    Router::new()
        .route("/api/v1/admission/score", post(score_handler::<M, H>))
        .with_state(service)
}

pub(crate) async fn score_handler<M, H>(
    State(service): State<Arc<AdmissionScoreService<M, H>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    M: FacilityMetadataProvider + 'static,
    H: FacilityHistoryProvider + 'static,
{
    match service.score(&request) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(AdmissionScoreError::InvalidRequest(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AdmissionScoreError::DataUnavailable(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "retriable": true,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
