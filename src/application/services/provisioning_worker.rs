use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::application::services::AccountCreationExecutor;
use crate::domain::JobId;

pub struct ProvisioningMessage {
    pub job_id: JobId,
}

/// Consumes queued account creation jobs and runs them in the background,
/// at most `max_concurrent` at a time.
pub struct ProvisioningWorker {
    receiver: mpsc::Receiver<ProvisioningMessage>,
    executor: Arc<AccountCreationExecutor>,
    permits: Arc<Semaphore>,
}

impl ProvisioningWorker {
    pub fn new(
        receiver: mpsc::Receiver<ProvisioningMessage>,
        executor: Arc<AccountCreationExecutor>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            receiver,
            executor,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Provisioning worker started");
        let mut in_flight = JoinSet::new();

        while let Some(msg) = self.receiver.recv().await {
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                break;
            };

            let executor = Arc::clone(&self.executor);
            let span = tracing::info_span!("account_creation_job", job_id = %msg.job_id);

            in_flight.spawn(
                async move {
                    let _permit = permit;
                    if let Err(e) = executor.execute(msg.job_id).await {
                        tracing::error!(error = %e, "Account creation job failed");
                    }
                }
                .instrument(span),
            );

            while let Some(finished) = in_flight.try_join_next() {
                log_aborted(finished);
            }
        }

        tracing::info!(
            in_flight = in_flight.len(),
            "Provisioning queue closed, waiting for running jobs"
        );
        while let Some(finished) = in_flight.join_next().await {
            log_aborted(finished);
        }
        tracing::info!("Provisioning worker stopped");
    }
}

fn log_aborted(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        tracing::error!(error = %e, "Account creation task aborted");
    }
}
