use crate::domain::pod::VideoFormat;
use crate::error::BoxError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Transcoder and prober operations the stages rely on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaToolPort: Send + Sync {
    /// Extract the audio track of `video` into `output`.
    async fn extract_sound(&self, video: &Path, output: &Path) -> Result<(), BoxError>;

    /// Cut `audio` into segments of `segment_ms` named `{stem}_{n}.{ext}`
    /// (1-based) inside `output_dir`. Returns the produced files.
    async fn split_audio(
        &self,
        audio: &Path,
        segment_ms: u64,
        output_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, BoxError>;

    /// Duration of a media file in seconds.
    async fn probe_duration(&self, media: &Path) -> Result<f64, BoxError>;

    /// Transcode `input` into `output` in the requested framing.
    async fn format_video(
        &self,
        input: &Path,
        output: &Path,
        format: VideoFormat,
    ) -> Result<(), BoxError>;

    /// Copy `duration` seconds of `input` starting at `start` into `output`.
    async fn cut(
        &self,
        input: &Path,
        start: f64,
        duration: f64,
        output: &Path,
    ) -> Result<(), BoxError>;
}
