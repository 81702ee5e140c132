use serde::{Deserialize, Serialize};

use crate::domain::{Account, Job};

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub address: String,
    pub created_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            address: account.address.to_string(),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub state: String,
    pub result: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id.to_string(),
            job_type: job.job_type,
            state: job.state.as_str().to_string(),
            result: job.result,
            error: job.error_message,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

/// `limit`/`offset` query parameters. Kept as raw strings so that anything
/// non-numeric falls back to zero instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        parse_or_zero(self.limit.as_deref())
    }

    pub fn offset(&self) -> i64 {
        parse_or_zero(self.offset.as_deref())
    }
}

fn parse_or_zero(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
