mod account_creation_executor;
mod account_service;
mod job_tracker;
mod provisioning_worker;

pub use account_creation_executor::AccountCreationExecutor;
pub use account_service::{AccountCreation, AccountService, AccountServiceError};
pub use job_tracker::JobTracker;
pub use provisioning_worker::{ProvisioningMessage, ProvisioningWorker};
