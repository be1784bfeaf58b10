use crate::domain::messages::PodMessage;
use crate::domain::pod::MediaPod;
use crate::error::BoxError;
use async_trait::async_trait;

#[async_trait]
pub trait MessageQueuePort: Send + Sync {
    /// Send a pod downstream under the given message type.
    async fn publish(&self, pod: &MediaPod, message_type: &str) -> Result<(), BoxError>;

    /// Receive the next inbound pod message (blocking with timeout)
    /// timeout_secs: 0.0 for infinite (or long poll), >0.0 for specific timeout
    async fn receive(&self, timeout_secs: f64) -> Result<Option<PodMessage>, BoxError>;
}
