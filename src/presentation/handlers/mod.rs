mod accounts;
mod error;
mod health;
mod jobs;
mod responses;

pub use accounts::{
    CreateAccountQuery, account_details_handler, create_account_handler, list_accounts_handler,
};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use jobs::{job_status_handler, list_jobs_handler};
pub use responses::{AccountResponse, JobResponse, ListQuery};
