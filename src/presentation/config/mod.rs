mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LoggingSettings, PaginationSettings, ProvisioningSettings, ServerSettings,
    Settings, StorageBackend,
};
