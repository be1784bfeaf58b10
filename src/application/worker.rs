use crate::application::runner::StageRunner;
use crate::error::BoxError;
use crate::ports::queue::MessageQueuePort;
use tracing::{debug, error, info};

/// Pulls pods off the inbound queue and hands them to the stage runner.
pub struct WorkerService<Q> {
    queue: Q,
    runner: StageRunner<Q>,
}

impl<Q> WorkerService<Q>
where
    Q: MessageQueuePort,
{
    pub fn new(queue: Q, runner: StageRunner<Q>) -> Self {
        Self { queue, runner }
    }

    pub async fn run_worker_loop(&self, worker_id: usize) {
        info!(worker = worker_id, stage = %self.runner.stage(), "Worker started");
        loop {
            match self.process_next(0.0).await {
                Ok(true) => {}
                Ok(false) => debug!(worker = worker_id, "No message"),
                Err(e) => {
                    error!(worker = worker_id, error = %e, "Queue error");
                    tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
                }
            }
        }
    }

    /// Handle at most one inbound message. Returns whether one was received.
    ///
    /// A pod whose outcome could not be published is logged and dropped;
    /// only receive errors are returned.
    pub async fn process_next(&self, timeout_secs: f64) -> Result<bool, BoxError> {
        let Some(message) = self.queue.receive(timeout_secs).await? else {
            return Ok(false);
        };
        debug!(pod = %message.media_pod.uuid, message_type = %message.message_type, "Message received");

        if let Err(e) = self.runner.handle(message.media_pod).await {
            error!(pod = %e.pod, message_type = %e.message_type, error = %e, "Publish failed");
        }
        Ok(true)
    }
}
