use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::application::ports::{JobRepository, JobTransition, ListOptions, RepositoryError};
use crate::domain::{Job, JobId, JobState};

#[derive(Default)]
struct JobTable {
    jobs: HashMap<JobId, Job>,
    insertion_order: Vec<JobId>,
}

impl JobTable {
    fn newest_first(&self) -> Vec<&Job> {
        let mut ordered: Vec<&Job> = self
            .insertion_order
            .iter()
            .rev()
            .filter_map(|id| self.jobs.get(id))
            .collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ordered
    }
}

/// Process-local job store. Each transition is checked and applied under a
/// single lock acquisition.
#[derive(Default)]
pub struct InMemoryJobRepository {
    table: Mutex<JobTable>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;

        if table.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict(format!(
                "job {} already exists",
                job.id
            )));
        }

        table.jobs.insert(job.id, job.clone());
        table.insertion_order.push(job.id);
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.table.lock().await.jobs.get(&id).cloned())
    }

    async fn transition(
        &self,
        id: JobId,
        transition: JobTransition,
    ) -> Result<Job, RepositoryError> {
        let mut table = self.table.lock().await;

        let job = table
            .jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", id)))?;

        if job.state != transition.expected {
            return Err(RepositoryError::InvalidTransition {
                job_id: id,
                from: job.state,
                to: transition.next,
            });
        }

        if let Some(owner) = &transition.owner {
            if job.claimed_by.as_ref() != Some(owner) {
                return Err(RepositoryError::Conflict(format!(
                    "job {} is not claimed by {}",
                    id, owner
                )));
            }
        }

        job.state = transition.next;
        if transition.claim.is_some() {
            job.claimed_by = transition.claim;
        }
        if transition.result.is_some() {
            job.result = transition.result;
        }
        if transition.error_message.is_some() {
            job.error_message = transition.error_message;
        }
        job.updated_at = Utc::now();

        Ok(job.clone())
    }

    async fn list(&self, options: ListOptions) -> Result<Vec<Job>, RepositoryError> {
        let table = self.table.lock().await;

        Ok(table
            .newest_first()
            .into_iter()
            .skip(options.offset as usize)
            .take(options.limit as usize)
            .cloned()
            .collect())
    }

    async fn list_by_state(&self, state: JobState) -> Result<Vec<Job>, RepositoryError> {
        let table = self.table.lock().await;

        Ok(table
            .newest_first()
            .into_iter()
            .filter(|job| job.state == state)
            .cloned()
            .collect())
    }
}
