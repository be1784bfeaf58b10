//! One module per pipeline stage. Each stage type implements
//! [`PodStage`](crate::application::runner::PodStage).

pub mod sound_extractor;
pub mod subtitle_generator;
pub mod subtitle_merger;
pub mod subtitle_transformer;
pub mod video_formatter;
pub mod video_splitter;

pub use sound_extractor::SoundExtractor;
pub use subtitle_generator::SubtitleGenerator;
pub use subtitle_merger::SubtitleMerger;
pub use subtitle_transformer::SubtitleTransformer;
pub use video_formatter::VideoFormatter;
pub use video_splitter::VideoSplitter;

use crate::application::coordinator::{ChunkCoordinator, NamedChunk};
use crate::application::runner::PodStage;
use crate::config::WorkerConfig;
use crate::domain::lifecycle::Stage;
use crate::domain::subtitles::SegmentTiming;
use crate::error::{BoxError, StageError};
use crate::ports::media::MediaToolPort;
use crate::ports::storage::StoragePort;
use crate::ports::transcriber::TranscriberPort;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A file produced locally that still has to reach the blob store.
#[derive(Debug, Clone)]
pub struct LocalChunk {
    pub name: String,
    pub path: PathBuf,
}

impl NamedChunk for LocalChunk {
    fn chunk_name(&self) -> &str {
        &self.name
    }
}

impl LocalChunk {
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(LocalChunk { name, path })
    }
}

/// Scratch directory removed when the invocation ends.
pub(crate) fn scratch_dir() -> Result<TempDir, StageError> {
    Ok(tempfile::Builder::new().prefix("mediapod-").tempdir()?)
}

pub(crate) fn external(err: BoxError) -> StageError {
    StageError::External(err)
}

/// Build the stage a worker process was configured for.
pub fn build_stage<S, M, T>(
    config: &WorkerConfig,
    storage: S,
    media: M,
    transcriber: T,
) -> Arc<dyn PodStage>
where
    S: StoragePort + 'static,
    M: MediaToolPort + 'static,
    T: TranscriberPort + 'static,
{
    let coordinator = ChunkCoordinator::new(config.chunk_concurrency);
    match config.stage {
        Stage::SoundExtractor => Arc::new(SoundExtractor::new(
            storage,
            media,
            coordinator,
            config.segment_spacing_ms,
        )),
        Stage::SubtitleGenerator => Arc::new(SubtitleGenerator::new(
            storage,
            transcriber,
            coordinator,
            config.words_per_cue,
        )),
        Stage::SubtitleMerger => Arc::new(SubtitleMerger::new(
            storage,
            coordinator,
            SegmentTiming::Fixed(config.segment_spacing_ms),
        )),
        Stage::SubtitleTransformer => Arc::new(SubtitleTransformer::new(
            storage,
            config.ass_split_threshold,
        )),
        Stage::VideoFormatter => Arc::new(VideoFormatter::new(storage, media)),
        Stage::VideoSplitter => Arc::new(VideoSplitter::new(storage, media, coordinator)),
    }
}
