mod in_memory_account_repository;
mod in_memory_job_repository;
mod pg_account_repository;
mod pg_job_repository;

pub use in_memory_account_repository::InMemoryAccountRepository;
pub use in_memory_job_repository::InMemoryJobRepository;
pub use pg_account_repository::PgAccountRepository;
pub use pg_job_repository::PgJobRepository;
