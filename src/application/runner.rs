//! Wraps a stage's work with the pod lifecycle: run, advance, publish.

use crate::domain::lifecycle::{advance, Outcome, Stage};
use crate::domain::pod::MediaPod;
use crate::error::{PublishError, StageError};
use crate::ports::queue::MessageQueuePort;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// The work of one pipeline stage.
///
/// Implementations mutate the pod with whatever they produced (new chunk
/// lists, new file references) and never touch `status`.
#[async_trait]
pub trait PodStage: Send + Sync {
    fn stage(&self) -> Stage;

    async fn execute(&self, pod: &mut MediaPod) -> Result<(), StageError>;
}

pub struct StageRunner<Q> {
    stage: Arc<dyn PodStage>,
    publisher: Q,
}

impl<Q> StageRunner<Q>
where
    Q: MessageQueuePort,
{
    pub fn new(stage: Arc<dyn PodStage>, publisher: Q) -> Self {
        Self { stage, publisher }
    }

    pub fn stage(&self) -> Stage {
        self.stage.stage()
    }

    /// Process one inbound pod whatever its current status, then publish it
    /// on the success or error message type.
    ///
    /// Only a failed publish is returned as an error; the pod keeps the
    /// status it was published with.
    pub async fn handle(&self, mut pod: MediaPod) -> Result<MediaPod, PublishError> {
        let stage = self.stage.stage();
        info!(pod = %pod.uuid, %stage, incoming = %pod.status, "Stage started");

        let result = self.stage.execute(&mut pod).await;
        if let Err(e) = &result {
            error!(pod = %pod.uuid, %stage, error = %e, "Stage failed");
        }

        let outcome = Outcome::from(&result);
        let pod = advance(pod, stage, outcome);
        let message_type = stage.message_type(outcome);

        self.publisher
            .publish(&pod, &message_type)
            .await
            .map_err(|source| PublishError {
                pod: pod.uuid.clone(),
                message_type: message_type.clone(),
                source,
            })?;

        info!(pod = %pod.uuid, status = %pod.status, %message_type, "Stage published");
        Ok(pod)
    }
}
