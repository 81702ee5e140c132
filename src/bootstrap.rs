use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{AccountProvisioner, AccountRepository, JobRepository, PageLimits};
use crate::application::services::{
    AccountCreationExecutor, AccountService, JobTracker, ProvisioningWorker,
};
use crate::presentation::config::ProvisioningSettings;

/// The wired account subsystem. `worker` must be spawned for queued
/// creations to make progress.
pub struct AccountStack {
    pub account_service: Arc<AccountService>,
    pub job_tracker: Arc<JobTracker>,
    pub worker: ProvisioningWorker,
}

pub fn build_account_stack(
    account_repository: Arc<dyn AccountRepository>,
    job_repository: Arc<dyn JobRepository>,
    provisioner: Arc<dyn AccountProvisioner>,
    provisioning: &ProvisioningSettings,
    page_limits: PageLimits,
) -> AccountStack {
    let job_tracker = Arc::new(JobTracker::new(
        job_repository,
        provisioning.instance_id.as_str(),
    ));
    let executor = Arc::new(AccountCreationExecutor::new(
        provisioner,
        Arc::clone(&account_repository),
        Arc::clone(&job_tracker),
        provisioning.timeout(),
    ));

    let (sender, receiver) = mpsc::channel(provisioning.queue_capacity.max(1));
    let worker = ProvisioningWorker::new(receiver, Arc::clone(&executor), provisioning.workers);

    let account_service = Arc::new(AccountService::new(
        account_repository,
        Arc::clone(&job_tracker),
        executor,
        sender,
        page_limits,
    ));

    AccountStack {
        account_service,
        job_tracker,
        worker,
    }
}
