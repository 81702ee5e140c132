mod account_provisioner;
mod account_repository;
mod job_repository;
mod job_transition;
mod list_options;
mod repository_error;

pub use account_provisioner::{AccountProvisioner, ProvisioningError};
pub use account_repository::AccountRepository;
pub use job_repository::JobRepository;
pub use job_transition::JobTransition;
pub use list_options::{ListOptions, PageLimits};
pub use repository_error::RepositoryError;
