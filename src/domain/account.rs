use super::AccountAddress;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub address: AccountAddress,
    /// Overwritten by the repository when the account is inserted.
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(address: AccountAddress) -> Self {
        Self {
            address,
            created_at: Utc::now(),
        }
    }
}
