use super::{JobId, JobState};
use chrono::{DateTime, Utc};

pub const ACCOUNT_CREATION_JOB_TYPE: &str = "account_creation";

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub job_type: String,
    pub state: JobState,
    /// Set only once the job is `Complete`.
    pub result: Option<String>,
    /// Set only once the job is `Failed`.
    pub error_message: Option<String>,
    /// Instance that moved the job to `InProgress`.
    pub claimed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(job_type: String) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            job_type,
            state: JobState::Pending,
            result: None,
            error_message: None,
            claimed_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}
