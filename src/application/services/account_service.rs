use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::instrument;

use crate::application::ports::{
    AccountRepository, ListOptions, PageLimits, ProvisioningError, RepositoryError,
};
use crate::application::services::{AccountCreationExecutor, JobTracker, ProvisioningMessage};
use crate::domain::{ACCOUNT_CREATION_JOB_TYPE, Account, AccountAddress, AddressError, Job, JobId};

/// Outcome of [`AccountService::create`].
#[derive(Debug, Clone)]
pub enum AccountCreation {
    /// Synchronous creation finished; the job is `Complete`.
    Completed { job: Job, account: Account },
    /// Asynchronous creation was queued; poll the job for the outcome.
    Accepted { job: Job },
}

impl AccountCreation {
    pub fn job(&self) -> &Job {
        match self {
            AccountCreation::Completed { job, .. } | AccountCreation::Accepted { job } => job,
        }
    }
}

pub struct AccountService {
    account_repository: Arc<dyn AccountRepository>,
    job_tracker: Arc<JobTracker>,
    executor: Arc<AccountCreationExecutor>,
    provisioning_sender: mpsc::Sender<ProvisioningMessage>,
    page_limits: PageLimits,
}

impl AccountService {
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        job_tracker: Arc<JobTracker>,
        executor: Arc<AccountCreationExecutor>,
        provisioning_sender: mpsc::Sender<ProvisioningMessage>,
        page_limits: PageLimits,
    ) -> Self {
        Self {
            account_repository,
            job_tracker,
            executor,
            provisioning_sender,
            page_limits,
        }
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Account>, AccountServiceError> {
        let options = ListOptions::normalize(limit, offset, self.page_limits);
        Ok(self.account_repository.list(options).await?)
    }

    pub async fn details(&self, address: &str) -> Result<Account, AccountServiceError> {
        let address = AccountAddress::parse(address)?;
        Ok(self.account_repository.get(&address).await?)
    }

    /// Creates an account job and either runs it to completion (`sync`) or
    /// queues it for the provisioning worker.
    #[instrument(skip(self))]
    pub async fn create(&self, sync: bool) -> Result<AccountCreation, AccountServiceError> {
        let job = self.job_tracker.create_job(ACCOUNT_CREATION_JOB_TYPE).await?;
        let job = self.job_tracker.mark_in_progress(job.id).await?;

        if sync {
            // Runs detached so a dropped request cannot strand the job mid-way.
            let executor = Arc::clone(&self.executor);
            let job_id = job.id;
            let (job, account) =
                tokio::spawn(async move { executor.execute(job_id).await }).await??;
            return Ok(AccountCreation::Completed { job, account });
        }

        match self
            .provisioning_sender
            .try_send(ProvisioningMessage { job_id: job.id })
        {
            Ok(()) => {
                tracing::info!(job_id = %job.id, "Account creation job enqueued");
                Ok(AccountCreation::Accepted { job })
            }
            Err(e) => {
                let reason = match e {
                    TrySendError::Full(_) => "provisioning queue full",
                    TrySendError::Closed(_) => "provisioning worker unavailable",
                };
                tracing::warn!(job_id = %job.id, reason, "Failed to enqueue account creation job");
                self.job_tracker.fail(job.id, reason).await?;
                Err(AccountServiceError::QueueUnavailable { job_id: job.id })
            }
        }
    }

    pub async fn job(&self, id: JobId) -> Result<Job, AccountServiceError> {
        Ok(self.job_tracker.get(id).await?)
    }

    pub async fn jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>, AccountServiceError> {
        let options = ListOptions::normalize(limit, offset, self.page_limits);
        Ok(self.job_tracker.list(options).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("provisioning failed for job {job_id}: {source}")]
    Provisioning {
        job_id: JobId,
        #[source]
        source: ProvisioningError,
    },
    #[error("storing account for job {job_id} failed: {source}")]
    Storage {
        job_id: JobId,
        #[source]
        source: RepositoryError,
    },
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("provisioning queue unavailable for job {job_id}")]
    QueueUnavailable { job_id: JobId },
    #[error("account creation task aborted: {0}")]
    TaskAborted(#[from] tokio::task::JoinError),
}
