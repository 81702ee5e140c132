use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{AccountProvisioner, ProvisioningError};
use crate::domain::{Account, AccountAddress};

/// Mints addresses locally from random bytes, after an optional artificial
/// latency standing in for the round trip to a ledger.
pub struct LocalAccountProvisioner {
    latency: Duration,
}

impl LocalAccountProvisioner {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl AccountProvisioner for LocalAccountProvisioner {
    async fn provision(&self) -> Result<Account, ProvisioningError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let bytes = rand::random::<[u8; 8]>();
        let account = Account::new(AccountAddress::from_bytes(bytes));
        tracing::debug!(address = %account.address, "Provisioned account");
        Ok(account)
    }
}
