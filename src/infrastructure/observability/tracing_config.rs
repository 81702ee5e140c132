/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    pub json_format: bool,
}
