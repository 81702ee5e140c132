use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::application::services::AccountServiceError;
use crate::domain::JobId;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// Error carried to the HTTP boundary, already mapped to a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub job_id: Option<JobId>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            job_id: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

fn repository_status(e: &RepositoryError) -> StatusCode {
    match e {
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) | RepositoryError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        RepositoryError::ConnectionFailed(_) | RepositoryError::QueryFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        Self::new(repository_status(&e), e.to_string())
    }
}

impl From<AccountServiceError> for ApiError {
    fn from(e: AccountServiceError) -> Self {
        let (status, job_id) = match &e {
            AccountServiceError::Repository(source) => (repository_status(source), None),
            AccountServiceError::Provisioning { job_id, .. } => {
                (StatusCode::BAD_GATEWAY, Some(*job_id))
            }
            AccountServiceError::Storage { job_id, source } => {
                (repository_status(source), Some(*job_id))
            }
            AccountServiceError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, None),
            AccountServiceError::QueueUnavailable { job_id } => {
                (StatusCode::SERVICE_UNAVAILABLE, Some(*job_id))
            }
            AccountServiceError::TaskAborted(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        Self {
            status,
            message: e.to_string(),
            job_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.message, "Request rejected");
        }

        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                job_id: self.job_id.map(|id| id.to_string()),
            }),
        )
            .into_response()
    }
}
