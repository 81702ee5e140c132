use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;
use crate::application::ports::PageLimits;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub pagination: PaginationSettings,
    pub provisioning: ProvisioningSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl PaginationSettings {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisioningSettings {
    /// Stable per-instance id recorded on the jobs this instance runs.
    pub instance_id: String,
    /// Background account creations allowed to run at once.
    pub workers: usize,
    pub queue_capacity: usize,
    pub timeout_ms: u64,
    pub simulated_latency_ms: u64,
    pub recover_interrupted_jobs: bool,
}

impl ProvisioningSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Settings {
    /// Loads `config/{environment}.toml` over built-in defaults, then applies
    /// `APP_`-prefixed environment variables (`APP_DATABASE__URL`, ...).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_from("config", environment)
    }

    pub fn load_from(config_dir: &str, environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.backend", "postgres")?
            .set_default("database.url", "postgres://localhost:5432/custodian")?
            .set_default("database.max_connections", 10)?
            .set_default("database.run_migrations", true)?
            .set_default("logging.level", "info,custodian=debug,tower_http=debug")?
            .set_default("logging.enable_json", false)?
            .set_default("pagination.default_limit", 100)?
            .set_default("pagination.max_limit", 1000)?
            .set_default("provisioning.instance_id", "custodian-0")?
            .set_default("provisioning.workers", 4)?
            .set_default("provisioning.queue_capacity", 256)?
            .set_default("provisioning.timeout_ms", 30_000)?
            .set_default("provisioning.simulated_latency_ms", 0)?
            .set_default("provisioning.recover_interrupted_jobs", false)?
            .add_source(
                File::with_name(&format!("{}/{}", config_dir, environment.as_str()))
                    .required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
