use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::application::ports::{AccountRepository, ListOptions, RepositoryError};
use crate::domain::{Account, AccountAddress};

/// Process-local account store. Accounts are kept in insertion order.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.lock().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn list(&self, options: ListOptions) -> Result<Vec<Account>, RepositoryError> {
        let accounts = self.accounts.lock().await;

        // Newest insertion first, so equal timestamps keep that order after
        // the stable sort.
        let mut ordered: Vec<&Account> = accounts.iter().rev().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(ordered
            .into_iter()
            .skip(options.offset as usize)
            .take(options.limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, address: &AccountAddress) -> Result<Account, RepositoryError> {
        self.accounts
            .lock()
            .await
            .iter()
            .find(|a| &a.address == address)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("account {}", address)))
    }

    async fn insert(&self, account: &Account) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.lock().await;

        if accounts.iter().any(|a| a.address == account.address) {
            return Err(RepositoryError::Conflict(format!(
                "account {} already exists",
                account.address
            )));
        }

        let stored = Account {
            address: account.address.clone(),
            created_at: Utc::now(),
        };
        accounts.push(stored.clone());

        Ok(stored)
    }
}
