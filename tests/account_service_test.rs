mod helpers;

use std::sync::Arc;
use std::time::Duration;

use custodian::application::ports::{
    AccountProvisioner, AccountRepository, PageLimits, ProvisioningError, RepositoryError,
};
use custodian::application::services::{AccountCreation, AccountServiceError};
use custodian::bootstrap::build_account_stack;
use custodian::domain::{AccountAddress, JobState};
use custodian::infrastructure::persistence::{InMemoryAccountRepository, InMemoryJobRepository};
use custodian::infrastructure::provisioning::{LocalAccountProvisioner, MockAccountProvisioner};
use tokio::task::JoinSet;

use helpers::{
    provisioning_settings, spawn_stack, spawn_stack_sharing, spawn_stack_with, wait_for_terminal,
};

#[tokio::test]
async fn given_succeeding_provisioner_when_creating_sync_then_job_complete_and_account_stored() {
    let stack = spawn_stack(MockAccountProvisioner::succeeding());

    let creation = stack.service.create(true).await.unwrap();

    let AccountCreation::Completed { job, account } = creation else {
        panic!("sync creation should complete");
    };
    assert_eq!(job.state, JobState::Complete);
    assert_eq!(job.result.as_deref(), Some(account.address.as_str()));

    let stored = stack.accounts.get(&account.address).await.unwrap();
    assert_eq!(stored, account);
    assert_eq!(stack.provisioner.calls(), 1);
}

#[tokio::test]
async fn given_failing_provisioner_when_creating_sync_then_error_and_job_failed() {
    let stack = spawn_stack(MockAccountProvisioner::failing(ProvisioningError::Rejected(
        "ledger refused".to_string(),
    )));

    let result = stack.service.create(true).await;

    let Err(AccountServiceError::Provisioning { job_id, source }) = result else {
        panic!("expected provisioning error, got {result:?}");
    };
    assert!(matches!(source, ProvisioningError::Rejected(_)));

    let job = stack.tracker.get(job_id).await.unwrap();
    assert_eq!(job.state, JobState::Failed);
    assert!(job.error_message.unwrap().contains("ledger refused"));
    assert!(job.result.is_none());
    assert!(stack.accounts.is_empty().await);
}

#[tokio::test]
async fn given_gated_provisioner_when_creating_async_then_returns_before_provisioning_finishes() {
    let stack = spawn_stack(MockAccountProvisioner::succeeding().gated());

    let creation = stack.service.create(false).await.unwrap();

    let AccountCreation::Accepted { job } = creation else {
        panic!("async creation should be accepted");
    };
    assert!(matches!(job.state, JobState::Pending | JobState::InProgress));
    assert!(stack.accounts.is_empty().await);
    assert_eq!(
        stack.tracker.get(job.id).await.unwrap().state,
        JobState::InProgress
    );

    stack.provisioner.release(1);
    let finished = wait_for_terminal(&stack.tracker, job.id).await;

    assert_eq!(finished.state, JobState::Complete);
    let address = finished.result.expect("completed job carries the address");
    let account = stack.service.details(&address).await.unwrap();
    assert_eq!(account.address.as_str(), address);
    assert_eq!(stack.provisioner.calls(), 1);
}

#[tokio::test]
async fn given_failing_provisioner_when_creating_async_then_request_succeeds_and_job_fails() {
    let stack = spawn_stack(MockAccountProvisioner::failing(
        ProvisioningError::Unavailable("node offline".to_string()),
    ));

    let creation = stack.service.create(false).await.unwrap();
    let finished = wait_for_terminal(&stack.tracker, creation.job().id).await;

    assert_eq!(finished.state, JobState::Failed);
    assert!(finished.error_message.unwrap().contains("node offline"));
    assert!(finished.result.is_none());
    assert!(stack.accounts.is_empty().await);
}

#[tokio::test]
async fn given_unknown_address_when_requesting_details_then_not_found() {
    let stack = spawn_stack(MockAccountProvisioner::succeeding());

    let result = stack.service.details("0x00000000000000aa").await;

    assert!(matches!(
        result,
        Err(AccountServiceError::Repository(RepositoryError::NotFound(_)))
    ));
}

#[tokio::test]
async fn given_malformed_address_when_requesting_details_then_invalid_address() {
    let stack = spawn_stack(MockAccountProvisioner::succeeding());

    let result = stack.service.details("not-an-address").await;

    assert!(matches!(result, Err(AccountServiceError::InvalidAddress(_))));
}

#[tokio::test]
async fn given_reused_address_when_creating_twice_then_second_job_fails_with_conflict() {
    let address = AccountAddress::parse("0x0000000000000042").unwrap();
    let stack = spawn_stack(MockAccountProvisioner::with_address(address.clone()));

    stack.service.create(true).await.unwrap();
    let second = stack.service.create(true).await;

    let Err(AccountServiceError::Storage { job_id, source }) = second else {
        panic!("expected storage conflict, got {second:?}");
    };
    assert!(matches!(source, RepositoryError::Conflict(_)));
    assert_eq!(
        stack.tracker.get(job_id).await.unwrap().state,
        JobState::Failed
    );
    assert_eq!(stack.accounts.len().await, 1);

    let jobs = stack.service.jobs(0, 0).await.unwrap();
    let states: Vec<JobState> = jobs.iter().map(|j| j.state).collect();
    assert_eq!(states, vec![JobState::Failed, JobState::Complete]);
}

#[tokio::test]
async fn given_slow_provisioner_when_timeout_elapses_then_job_fails_with_timeout() {
    let mut settings = provisioning_settings();
    settings.timeout_ms = 20;
    let stack = spawn_stack_with(
        MockAccountProvisioner::succeeding().with_delay(Duration::from_secs(5)),
        settings,
    );

    let result = stack.service.create(true).await;

    let Err(AccountServiceError::Provisioning { job_id, source }) = result else {
        panic!("expected provisioning timeout, got {result:?}");
    };
    assert!(matches!(source, ProvisioningError::TimedOut(_)));
    assert_eq!(
        stack.tracker.get(job_id).await.unwrap().state,
        JobState::Failed
    );
}

#[tokio::test]
async fn given_stopped_worker_when_creating_async_then_queue_unavailable_and_job_failed() {
    let provisioner = Arc::new(MockAccountProvisioner::succeeding());
    let stack = build_account_stack(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(InMemoryJobRepository::new()),
        provisioner.clone(),
        &provisioning_settings(),
        PageLimits::default(),
    );
    drop(stack.worker);

    let result = stack.account_service.create(false).await;

    let Err(AccountServiceError::QueueUnavailable { job_id }) = result else {
        panic!("expected queue unavailable, got {result:?}");
    };
    let jobs = stack.account_service.jobs(0, 0).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, job_id);
    assert_eq!(jobs[0].state, JobState::Failed);
    assert_eq!(provisioner.calls(), 0);
}

#[tokio::test]
async fn given_concurrent_sync_creations_when_all_finish_then_each_job_has_its_own_account() {
    let stack = spawn_stack(MockAccountProvisioner::succeeding());

    let mut tasks = JoinSet::new();
    for _ in 0..12 {
        let service = Arc::clone(&stack.service);
        tasks.spawn(async move { service.create(true).await });
    }

    let mut addresses = Vec::new();
    while let Some(outcome) = tasks.join_next().await {
        match outcome.unwrap().unwrap() {
            AccountCreation::Completed { job, account } => {
                assert_eq!(job.result.as_deref(), Some(account.address.as_str()));
                addresses.push(account.address);
            }
            AccountCreation::Accepted { .. } => panic!("sync creation should complete"),
        }
    }

    addresses.sort();
    addresses.dedup();
    assert_eq!(addresses.len(), 12);
    assert_eq!(stack.accounts.len().await, 12);
    assert_eq!(stack.provisioner.calls(), 12);
}

#[tokio::test]
async fn given_created_accounts_when_listing_through_service_then_window_is_applied() {
    let stack = spawn_stack(MockAccountProvisioner::succeeding());
    for _ in 0..3 {
        stack.service.create(true).await.unwrap();
    }

    let all = stack.service.list(0, 0).await.unwrap();
    let first = stack.service.list(1, 0).await.unwrap();
    let past_end = stack.service.list(5, 10).await.unwrap();
    let negative_offset = stack.service.list(2, -4).await.unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(first, all[..1].to_vec());
    assert!(past_end.is_empty());
    assert_eq!(negative_offset, all[..2].to_vec());
}

#[tokio::test]
async fn given_two_instances_on_one_store_when_one_recovers_then_the_others_job_still_completes() {
    let running = spawn_stack(MockAccountProvisioner::succeeding().gated());
    let mut settings = provisioning_settings();
    settings.instance_id = "instance-b".to_string();
    let restarted = spawn_stack_sharing(
        MockAccountProvisioner::succeeding(),
        settings,
        Arc::clone(&running.accounts),
        Arc::clone(&running.jobs),
    );
    let job = running.service.create(false).await.unwrap().job().clone();

    let recovered = restarted
        .tracker
        .fail_interrupted_jobs("interrupted by service restart")
        .await
        .unwrap();
    running.provisioner.release(1);
    let finished = wait_for_terminal(&running.tracker, job.id).await;

    assert_eq!(recovered, 0);
    assert_eq!(finished.state, JobState::Complete);
    let address = finished.result.expect("completed job carries the address");
    assert!(restarted.service.details(&address).await.is_ok());
    assert_eq!(running.accounts.len().await, 1);
}

#[tokio::test]
async fn given_restarted_instance_when_recovering_then_its_own_stale_job_fails() {
    let previous_run = spawn_stack(MockAccountProvisioner::succeeding().gated());
    let job = previous_run.service.create(false).await.unwrap().job().clone();
    let restarted = spawn_stack_sharing(
        MockAccountProvisioner::succeeding(),
        provisioning_settings(),
        Arc::clone(&previous_run.accounts),
        Arc::clone(&previous_run.jobs),
    );

    let recovered = restarted
        .tracker
        .fail_interrupted_jobs("interrupted by service restart")
        .await
        .unwrap();

    assert_eq!(recovered, 1);
    let job = restarted.tracker.get(job.id).await.unwrap();
    assert_eq!(job.state, JobState::Failed);
    assert_eq!(job.claimed_by.as_deref(), Some("instance-a"));
    assert!(job.result.is_none());
    assert!(previous_run.accounts.is_empty().await);
}

#[tokio::test]
async fn given_local_provisioner_when_minting_many_addresses_then_leading_digit_varies() {
    let provisioner = LocalAccountProvisioner::new(Duration::ZERO);

    let mut leading_digits = Vec::new();
    for _ in 0..64 {
        let account = provisioner.provision().await.unwrap();
        leading_digits.push(account.address.as_str().as_bytes()[2]);
    }

    leading_digits.sort();
    leading_digits.dedup();
    assert!(leading_digits.len() > 4, "leading digits: {leading_digits:?}");
}
