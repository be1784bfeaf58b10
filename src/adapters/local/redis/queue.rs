//! Redis MessageQueuePort implementation.

use super::error::QueueError;
use super::pool::RedisPool;
use crate::domain::messages::PodMessage;
use crate::domain::pod::MediaPod;
use crate::error::BoxError;
use crate::ports::queue::MessageQueuePort;
use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;

#[async_trait]
impl MessageQueuePort for RedisPool {
    async fn publish(&self, pod: &MediaPod, message_type: &str) -> Result<(), BoxError> {
        let mut conn = self.pool.get().await.map_err(QueueError::from)?;
        let json = PodMessage::new(pod.clone(), message_type)
            .to_json()
            .map_err(QueueError::from)?;

        conn.lpush::<_, _, ()>(&self.write_key, json)
            .await
            .map_err(QueueError::from)?;
        Ok(())
    }

    async fn receive(&self, timeout_secs: f64) -> Result<Option<PodMessage>, BoxError> {
        let mut conn = self.pool.get().await.map_err(QueueError::from)?;

        let result: Option<(String, String)> = conn
            .brpop(&self.read_key, timeout_secs)
            .await
            .map_err(QueueError::from)?;
        match result {
            Some((_, json)) => Ok(Some(PodMessage::from_json(&json).map_err(QueueError::from)?)),
            None => Ok(None),
        }
    }
}
