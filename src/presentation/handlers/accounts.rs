use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::services::AccountCreation;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::handlers::responses::{AccountResponse, JobResponse, ListQuery};
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAccountQuery {
    pub sync: Option<String>,
}

impl CreateAccountQuery {
    /// Any non-empty `sync` value selects the blocking path.
    pub fn is_sync(&self) -> bool {
        self.sync.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_accounts_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match state
        .account_service
        .list(query.limit(), query.offset())
        .await
    {
        Ok(accounts) => {
            tracing::debug!(count = accounts.len(), "Listed accounts");
            let body: Vec<AccountResponse> =
                accounts.into_iter().map(AccountResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn create_account_handler(
    State(state): State<AppState>,
    Query(query): Query<CreateAccountQuery>,
) -> impl IntoResponse {
    match state.account_service.create(query.is_sync()).await {
        Ok(AccountCreation::Completed { job, account }) => {
            tracing::info!(
                job_id = %job.id,
                address = %account.address,
                "Account created synchronously"
            );
            (StatusCode::CREATED, Json(AccountResponse::from(account))).into_response()
        }
        Ok(AccountCreation::Accepted { job }) => {
            (StatusCode::CREATED, Json(JobResponse::from(job))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn account_details_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    match state.account_service.details(&address).await {
        Ok(account) => (StatusCode::OK, Json(AccountResponse::from(account))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
