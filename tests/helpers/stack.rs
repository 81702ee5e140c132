use std::sync::Arc;
use std::time::Duration;

use custodian::application::ports::PageLimits;
use custodian::application::services::{AccountService, JobTracker};
use custodian::bootstrap::build_account_stack;
use custodian::domain::{Job, JobId};
use custodian::infrastructure::persistence::{InMemoryAccountRepository, InMemoryJobRepository};
use custodian::infrastructure::provisioning::MockAccountProvisioner;
use custodian::presentation::config::ProvisioningSettings;

pub struct TestStack {
    pub service: Arc<AccountService>,
    pub tracker: Arc<JobTracker>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub jobs: Arc<InMemoryJobRepository>,
    pub provisioner: Arc<MockAccountProvisioner>,
}

pub fn provisioning_settings() -> ProvisioningSettings {
    ProvisioningSettings {
        instance_id: "instance-a".to_string(),
        workers: 4,
        queue_capacity: 16,
        timeout_ms: 2_000,
        simulated_latency_ms: 0,
        recover_interrupted_jobs: false,
    }
}

pub fn spawn_stack(provisioner: MockAccountProvisioner) -> TestStack {
    spawn_stack_with(provisioner, provisioning_settings())
}

/// Wires the account subsystem over fresh in-memory stores and starts its
/// worker.
pub fn spawn_stack_with(
    provisioner: MockAccountProvisioner,
    settings: ProvisioningSettings,
) -> TestStack {
    spawn_stack_sharing(
        provisioner,
        settings,
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(InMemoryJobRepository::new()),
    )
}

/// Like [`spawn_stack_with`], over stores another stack may also use.
pub fn spawn_stack_sharing(
    provisioner: MockAccountProvisioner,
    settings: ProvisioningSettings,
    accounts: Arc<InMemoryAccountRepository>,
    jobs: Arc<InMemoryJobRepository>,
) -> TestStack {
    let provisioner = Arc::new(provisioner);

    let stack = build_account_stack(
        accounts.clone(),
        jobs.clone(),
        provisioner.clone(),
        &settings,
        PageLimits::default(),
    );
    tokio::spawn(stack.worker.run());

    TestStack {
        service: stack.account_service,
        tracker: stack.job_tracker,
        accounts,
        jobs,
        provisioner,
    }
}

pub async fn wait_for_terminal(tracker: &JobTracker, id: JobId) -> Job {
    for _ in 0..200 {
        let job = tracker.get(id).await.expect("job should exist");
        if job.state.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} did not reach a terminal state");
}
