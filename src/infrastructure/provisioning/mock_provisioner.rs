use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::application::ports::{AccountProvisioner, ProvisioningError};
use crate::domain::{Account, AccountAddress};

enum MockOutcome {
    RandomAddress,
    FixedAddress(AccountAddress),
    Error(ProvisioningError),
}

/// Scriptable provisioner for tests. A gated mock blocks every call until
/// [`MockAccountProvisioner::release`] hands out a permit.
pub struct MockAccountProvisioner {
    outcome: MockOutcome,
    gate: Option<Arc<Semaphore>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockAccountProvisioner {
    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            gate: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_outcome(MockOutcome::RandomAddress)
    }

    pub fn with_address(address: AccountAddress) -> Self {
        Self::with_outcome(MockOutcome::FixedAddress(address))
    }

    pub fn failing(error: ProvisioningError) -> Self {
        Self::with_outcome(MockOutcome::Error(error))
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Lets `count` blocked or future calls proceed.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountProvisioner for MockAccountProvisioner {
    async fn provision(&self) -> Result<Account, ProvisioningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ProvisioningError::Unavailable(e.to_string()))?
                .forget();
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.outcome {
            MockOutcome::RandomAddress => {
                let bytes = rand::random::<[u8; 8]>();
                Ok(Account::new(AccountAddress::from_bytes(bytes)))
            }
            MockOutcome::FixedAddress(address) => Ok(Account::new(address.clone())),
            MockOutcome::Error(e) => Err(e.clone()),
        }
    }
}
