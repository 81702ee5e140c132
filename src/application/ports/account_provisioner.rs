use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Account;

#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    async fn provision(&self) -> Result<Account, ProvisioningError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProvisioningError {
    #[error("provisioner unavailable: {0}")]
    Unavailable(String),
    #[error("provisioning rejected: {0}")]
    Rejected(String),
    #[error("provisioning timed out after {0:?}")]
    TimedOut(Duration),
}
