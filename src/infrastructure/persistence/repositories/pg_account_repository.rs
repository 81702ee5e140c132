use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{AccountRepository, ListOptions, RepositoryError};
use crate::domain::{Account, AccountAddress};

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    address: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        let address = AccountAddress::parse(&r.address).map_err(|e| {
            RepositoryError::QueryFailed(format!("stored address {}: {}", r.address, e))
        })?;

        Ok(Account {
            address,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self), fields(limit = options.limit, offset = options.offset))]
    async fn list(&self, options: ListOptions) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT address, created_at
            FROM accounts
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(options.limit))
        .bind(i64::from(options.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(Account::try_from).collect()
    }

    #[instrument(skip(self), fields(address = %address))]
    async fn get(&self, address: &AccountAddress) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT address, created_at
            FROM accounts
            WHERE address = $1
            "#,
        )
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(r) => Account::try_from(r),
            None => Err(RepositoryError::NotFound(format!("account {}", address))),
        }
    }

    #[instrument(skip(self, account), fields(address = %account.address))]
    async fn insert(&self, account: &Account) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (address, created_at)
            VALUES ($1, $2)
            RETURNING address, created_at
            "#,
        )
        .bind(account.address.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("account {} already exists", account.address))
            }
            _ => RepositoryError::QueryFailed(e.to_string()),
        })?;

        Account::try_from(row)
    }
}
