mod pg_pool;
mod repositories;

pub use repositories::InMemoryAccountRepository;
pub use repositories::InMemoryJobRepository;
pub use repositories::PgAccountRepository;
pub use repositories::PgJobRepository;

pub use pg_pool::{create_pool, run_migrations};
