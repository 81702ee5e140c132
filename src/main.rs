use std::sync::Arc;

use tokio::net::TcpListener;

use custodian::application::ports::{AccountRepository, JobRepository};
use custodian::bootstrap::build_account_stack;
use custodian::infrastructure::observability::{TracingConfig, init_tracing};
use custodian::infrastructure::persistence::{
    InMemoryAccountRepository, InMemoryJobRepository, PgAccountRepository, PgJobRepository,
    create_pool, run_migrations,
};
use custodian::infrastructure::provisioning::LocalAccountProvisioner;
use custodian::presentation::config::DatabaseSettings;
use custodian::presentation::{AppState, Environment, Settings, StorageBackend, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig {
        environment: environment.to_string(),
        filter: settings.logging.level.clone(),
        json_format: settings.logging.enable_json,
    });

    let (account_repository, job_repository) = build_repositories(&settings.database).await?;

    let provisioner = Arc::new(LocalAccountProvisioner::new(
        settings.provisioning.simulated_latency(),
    ));

    let stack = build_account_stack(
        account_repository,
        job_repository,
        provisioner,
        &settings.provisioning,
        settings.pagination.page_limits(),
    );

    if settings.provisioning.recover_interrupted_jobs {
        tracing::info!(
            instance_id = stack.job_tracker.instance_id(),
            "Failing jobs interrupted by the previous run of this instance"
        );
        stack
            .job_tracker
            .fail_interrupted_jobs("interrupted by service restart")
            .await?;
    }

    let worker = tokio::spawn(stack.worker.run());

    let router = create_router(AppState {
        account_service: stack.account_service,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(environment = %environment, "Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, draining provisioning queue");
    worker.await?;

    Ok(())
}

type Repositories = (Arc<dyn AccountRepository>, Arc<dyn JobRepository>);

async fn build_repositories(database: &DatabaseSettings) -> anyhow::Result<Repositories> {
    match database.backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&database.url, database.max_connections).await?;
            if database.run_migrations {
                run_migrations(&pool).await?;
            }
            let accounts: Arc<dyn AccountRepository> =
                Arc::new(PgAccountRepository::new(pool.clone()));
            let jobs: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool));
            Ok((accounts, jobs))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            let accounts: Arc<dyn AccountRepository> = Arc::new(InMemoryAccountRepository::new());
            let jobs: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
            Ok((accounts, jobs))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
