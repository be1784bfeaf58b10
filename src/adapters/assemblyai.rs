//! `TranscriberPort` backed by the AssemblyAI REST API.

use crate::config::TranscriberConfig;
use crate::domain::subtitles::Word;
use crate::error::BoxError;
use crate::ports::transcriber::TranscriberPort;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct AssemblyAi {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    language_detection: bool,
}

#[derive(Debug, Deserialize)]
struct Transcript {
    id: String,
    status: TranscriptStatus,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    words: Option<Vec<Word>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl AssemblyAi {
    pub fn new(config: &TranscriberConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn upload(&self, audio_path: &Path) -> Result<String, BoxError> {
        let body = tokio::fs::read(audio_path).await?;
        let response: UploadResponse = self
            .http
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.upload_url)
    }

    async fn fetch(&self, id: &str) -> Result<Transcript, BoxError> {
        Ok(self
            .http
            .get(format!("{}/transcript/{}", self.base_url, id))
            .header("authorization", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

/// Words of a finished transcript, or the reason it has none.
fn finished_words(transcript: Transcript) -> Result<Vec<Word>, BoxError> {
    match transcript.status {
        TranscriptStatus::Completed => Ok(transcript.words.unwrap_or_default()),
        TranscriptStatus::Error => Err(format!(
            "transcript {} failed: {}",
            transcript.id,
            transcript.error.unwrap_or_default()
        )
        .into()),
        status => Err(format!("transcript {} still {:?}", transcript.id, status).into()),
    }
}

#[async_trait]
impl TranscriberPort for AssemblyAi {
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<Word>, BoxError> {
        let audio_url = self.upload(audio_path).await?;
        let mut transcript: Transcript = self
            .http
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&TranscriptRequest {
                audio_url: &audio_url,
                language_detection: true,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(transcript = %transcript.id, file = %audio_path.display(), "Transcript requested");

        while matches!(
            transcript.status,
            TranscriptStatus::Queued | TranscriptStatus::Processing
        ) {
            tokio::time::sleep(POLL_INTERVAL).await;
            transcript = self.fetch(&transcript.id).await?;
        }

        info!(transcript = %transcript.id, status = ?transcript.status, "Transcript finished");
        finished_words(transcript)
    }
}
