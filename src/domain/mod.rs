mod account;
mod account_address;
mod job;
mod job_id;
mod job_state;

pub use account::Account;
pub use account_address::{AccountAddress, AddressError};
pub use job::{ACCOUNT_CREATION_JOB_TYPE, Job};
pub use job_id::JobId;
pub use job_state::JobState;
