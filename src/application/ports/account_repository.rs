use crate::domain::{Account, AccountAddress};
use async_trait::async_trait;

use super::{ListOptions, RepositoryError};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Accounts ordered newest first.
    async fn list(&self, options: ListOptions) -> Result<Vec<Account>, RepositoryError>;

    async fn get(&self, address: &AccountAddress) -> Result<Account, RepositoryError>;

    /// Persists the account, stamping its creation time. Fails with
    /// `Conflict` if the address is already taken.
    async fn insert(&self, account: &Account) -> Result<Account, RepositoryError>;
}
