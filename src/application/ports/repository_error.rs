use crate::domain::{JobId, JobState};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid transition for job {job_id}: {from} -> {to}")]
    InvalidTransition {
        job_id: JobId,
        from: JobState,
        to: JobState,
    },
}
