use crate::domain::{Job, JobId, JobState};
use async_trait::async_trait;

use super::{JobTransition, ListOptions, RepositoryError};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Atomically applies `transition` and returns the updated job.
    ///
    /// Fails with `NotFound` for an unknown id, with `InvalidTransition`
    /// when the stored state is not `transition.expected`, and with
    /// `Conflict` when `transition.owner` does not hold the claim.
    async fn transition(
        &self,
        id: JobId,
        transition: JobTransition,
    ) -> Result<Job, RepositoryError>;

    async fn list(&self, options: ListOptions) -> Result<Vec<Job>, RepositoryError>;

    async fn list_by_state(&self, state: JobState) -> Result<Vec<Job>, RepositoryError>;
}
