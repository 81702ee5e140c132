use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::domain::JobId;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::handlers::responses::{JobResponse, ListQuery};
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn list_jobs_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match state
        .account_service
        .jobs(query.limit(), query.offset())
        .await
    {
        Ok(jobs) => {
            let body: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return ApiError::bad_request(format!("Invalid job ID: {}", job_id)).into_response();
        }
    };

    match state.account_service.job(JobId::from_uuid(uuid)).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
