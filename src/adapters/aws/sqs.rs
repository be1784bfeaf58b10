use crate::domain::messages::PodMessage;
use crate::domain::pod::MediaPod;
use crate::error::BoxError;
use crate::ports::queue::MessageQueuePort;
use async_trait::async_trait;
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client;
use tracing::warn;

/// Longest wait SQS allows for one receive call.
const MAX_WAIT_SECS: i32 = 20;

/// SqsAdapter implements MessageQueuePort for AWS SQS.
#[derive(Clone)]
pub struct SqsAdapter {
    client: Client,
    read_url: String,
    write_url: String,
}

impl SqsAdapter {
    pub fn new(client: Client, read_url: String, write_url: String) -> Self {
        Self {
            client,
            read_url,
            write_url,
        }
    }
}

#[async_trait]
impl MessageQueuePort for SqsAdapter {
    async fn publish(&self, pod: &MediaPod, message_type: &str) -> Result<(), BoxError> {
        let message = PodMessage::new(pod.clone(), message_type);
        let attribute = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(message_type)
            .build()?;
        self.client
            .send_message()
            .queue_url(&self.write_url)
            .message_body(message.to_json()?)
            .message_attributes("type", attribute)
            .send()
            .await?;
        Ok(())
    }

    async fn receive(&self, timeout_secs: f64) -> Result<Option<PodMessage>, BoxError> {
        let wait_time = if timeout_secs <= 0.0 {
            MAX_WAIT_SECS
        } else {
            (timeout_secs.ceil() as i32).min(MAX_WAIT_SECS)
        };
        let resp = self
            .client
            .receive_message()
            .queue_url(&self.read_url)
            .max_number_of_messages(1)
            .wait_time_seconds(wait_time)
            .send()
            .await?;

        let Some(msg) = resp.messages.and_then(|m| m.into_iter().next()) else {
            return Ok(None);
        };

        // Unparseable bodies are removed too, otherwise they come back forever.
        let parsed = msg.body().map(PodMessage::from_json);
        if let Some(receipt_handle) = msg.receipt_handle() {
            self.client
                .delete_message()
                .queue_url(&self.read_url)
                .receipt_handle(receipt_handle)
                .send()
                .await?;
        }

        match parsed {
            Some(Ok(message)) => Ok(Some(message)),
            Some(Err(e)) => Err(e.into()),
            None => {
                warn!(message = ?msg.message_id(), "Message without body dropped");
                Ok(None)
            }
        }
    }
}
