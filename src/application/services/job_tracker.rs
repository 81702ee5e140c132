use std::sync::Arc;

use tracing::instrument;

use crate::application::ports::{JobRepository, JobTransition, ListOptions, RepositoryError};
use crate::domain::{Job, JobId, JobState};

/// Owns every job state change. Transitions are delegated to the repository
/// as compare-and-set updates, so a job observed by pollers only ever moves
/// along `Pending -> InProgress -> Complete | Failed`.
///
/// Jobs started here are claimed under `instance_id`, which must stay stable
/// across restarts of the same instance and differ between instances sharing
/// a store.
pub struct JobTracker {
    job_repository: Arc<dyn JobRepository>,
    instance_id: String,
}

impl JobTracker {
    pub fn new(job_repository: Arc<dyn JobRepository>, instance_id: impl Into<String>) -> Self {
        Self {
            job_repository,
            instance_id: instance_id.into(),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    #[instrument(skip(self))]
    pub async fn create_job(&self, job_type: &str) -> Result<Job, RepositoryError> {
        let job = Job::new(job_type.to_string());
        self.job_repository.create(&job).await?;
        tracing::debug!(job_id = %job.id, "Job created");
        Ok(job)
    }

    pub async fn mark_in_progress(&self, id: JobId) -> Result<Job, RepositoryError> {
        self.apply(id, JobTransition::start(self.instance_id.as_str())).await
    }

    pub async fn complete(&self, id: JobId, result: &str) -> Result<Job, RepositoryError> {
        self.apply(id, JobTransition::complete(result)).await
    }

    pub async fn fail(&self, id: JobId, error_message: &str) -> Result<Job, RepositoryError> {
        self.apply(id, JobTransition::fail(error_message)).await
    }

    pub async fn get(&self, id: JobId) -> Result<Job, RepositoryError> {
        self.job_repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", id)))
    }

    pub async fn list(&self, options: ListOptions) -> Result<Vec<Job>, RepositoryError> {
        self.job_repository.list(options).await
    }

    /// Fails the jobs this instance left `InProgress` before a restart.
    /// Jobs claimed by other instances are left alone, and none are re-run
    /// since the provisioner may already have acted on them.
    #[instrument(skip(self), fields(instance_id = %self.instance_id))]
    pub async fn fail_interrupted_jobs(&self, reason: &str) -> Result<usize, RepositoryError> {
        let interrupted = self
            .job_repository
            .list_by_state(JobState::InProgress)
            .await?
            .into_iter()
            .filter(|job| job.claimed_by.as_deref() == Some(self.instance_id.as_str()));
        let mut failed = 0;

        for job in interrupted {
            let transition = JobTransition::fail(reason).owned_by(self.instance_id.as_str());
            match self.apply(job.id, transition).await {
                Ok(_) => failed += 1,
                Err(RepositoryError::InvalidTransition { .. } | RepositoryError::Conflict(_)) => {
                    tracing::debug!(job_id = %job.id, "Job finished before it could be failed");
                }
                Err(e) => return Err(e),
            }
        }

        if failed > 0 {
            tracing::warn!(count = failed, "Failed jobs interrupted by a previous shutdown");
        }

        Ok(failed)
    }

    async fn apply(&self, id: JobId, transition: JobTransition) -> Result<Job, RepositoryError> {
        tracing::debug!(
            job_id = %id,
            from = %transition.expected,
            to = %transition.next,
            "Job state transition"
        );
        if !transition.expected.can_transition_to(transition.next) {
            return Err(RepositoryError::InvalidTransition {
                job_id: id,
                from: transition.expected,
                to: transition.next,
            });
        }
        self.job_repository.transition(id, transition).await
    }
}
