use super::pod::MediaPod;
use serde::{Deserialize, Serialize};

/// Envelope a pod travels in between stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodMessage {
    /// Routing label, e.g. `App\Protobuf\SubtitleGeneratorToApi`.
    #[serde(rename = "type", default)]
    pub message_type: String,
    pub media_pod: MediaPod,
}

impl PodMessage {
    pub fn new(media_pod: MediaPod, message_type: &str) -> Self {
        PodMessage {
            message_type: message_type.to_string(),
            media_pod,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
