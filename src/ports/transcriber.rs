use crate::domain::subtitles::Word;
use crate::error::BoxError;
use async_trait::async_trait;
use std::path::Path;

/// Speech-to-text engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriberPort: Send + Sync {
    /// Transcribe an audio file into timed words, in spoken order.
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<Word>, BoxError>;
}
