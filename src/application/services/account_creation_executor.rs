use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AccountProvisioner, AccountRepository, ProvisioningError};
use crate::application::services::{AccountServiceError, JobTracker};
use crate::domain::{Account, Job, JobId};

/// Drives an in-progress account creation job to a terminal state. Both the
/// synchronous request path and the background worker go through here.
pub struct AccountCreationExecutor {
    provisioner: Arc<dyn AccountProvisioner>,
    account_repository: Arc<dyn AccountRepository>,
    job_tracker: Arc<JobTracker>,
    timeout: Duration,
}

impl AccountCreationExecutor {
    pub fn new(
        provisioner: Arc<dyn AccountProvisioner>,
        account_repository: Arc<dyn AccountRepository>,
        job_tracker: Arc<JobTracker>,
        timeout: Duration,
    ) -> Self {
        Self {
            provisioner,
            account_repository,
            job_tracker,
            timeout,
        }
    }

    pub async fn execute(&self, job_id: JobId) -> Result<(Job, Account), AccountServiceError> {
        let provisioning = tokio::time::timeout(self.timeout, self.provisioner.provision());
        let provisioned = match provisioning.await {
            Ok(result) => result,
            Err(_) => Err(ProvisioningError::TimedOut(self.timeout)),
        };

        let account = match provisioned {
            Ok(account) => account,
            Err(source) => {
                tracing::warn!(job_id = %job_id, error = %source, "Provisioning failed");
                self.job_tracker.fail(job_id, &source.to_string()).await?;
                return Err(AccountServiceError::Provisioning { job_id, source });
            }
        };

        let account = match self.account_repository.insert(&account).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(
                    job_id = %job_id,
                    address = %account.address,
                    error = %e,
                    "Failed to store provisioned account"
                );
                self.job_tracker.fail(job_id, &e.to_string()).await?;
                return Err(AccountServiceError::Storage { job_id, source: e });
            }
        };

        let job = match self
            .job_tracker
            .complete(job_id, account.address.as_str())
            .await
        {
            Ok(job) => job,
            Err(e) => {
                // The account row exists but the job will never point at it.
                tracing::error!(
                    job_id = %job_id,
                    address = %account.address,
                    error = %e,
                    "Account stored but its job could not be completed"
                );
                return Err(AccountServiceError::Storage { job_id, source: e });
            }
        };

        tracing::info!(job_id = %job_id, address = %account.address, "Account created");

        Ok((job, account))
    }
}
