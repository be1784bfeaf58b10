use crate::application::coordinator::ChunkCoordinator;
use crate::application::runner::PodStage;
use crate::domain::chunks::file_stem;
use crate::domain::lifecycle::Stage;
use crate::domain::pod::{Folder, MediaPod};
use crate::domain::subtitles::{SegmentTiming, SubtitleTrack};
use crate::error::{BoxError, StageError};
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use tracing::{info, warn};

/// Joins the per-chunk captions into one track aligned to the full video.
pub struct SubtitleMerger<S> {
    storage: S,
    coordinator: ChunkCoordinator,
    timing: SegmentTiming,
}

impl<S> SubtitleMerger<S>
where
    S: StoragePort,
{
    /// `timing` must match how the sound extractor cut the audio; nothing
    /// in the captions themselves can reveal a mismatch.
    pub fn new(storage: S, coordinator: ChunkCoordinator, timing: SegmentTiming) -> Self {
        Self {
            storage,
            coordinator,
            timing,
        }
    }
}

#[async_trait]
impl<S> PodStage for SubtitleMerger<S>
where
    S: StoragePort,
{
    fn stage(&self) -> Stage {
        Stage::SubtitleMerger
    }

    async fn execute(&self, pod: &mut MediaPod) -> Result<(), StageError> {
        let chunks = pod.original_video.subtitles.clone().unwrap_or_default();
        if chunks.is_empty() {
            return Err(StageError::InvalidPod("no subtitle chunks to merge".into()));
        }

        let source: &MediaPod = pod;
        let tracks = self
            .coordinator
            .run(chunks.clone(), |name: String| async move {
                let bytes = self.storage.get(&source.key(Folder::Subtitles, &name)).await?;
                Ok::<_, BoxError>(SubtitleTrack::parse(&String::from_utf8_lossy(&bytes)))
            })
            .await?;

        let merged = SubtitleTrack::merge(&tracks, &self.timing);
        let name = format!("{}.srt", file_stem(&pod.original_video.name));
        self.storage
            .put(&pod.key(Folder::Subtitles, &name), merged.to_srt().into_bytes())
            .await?;
        info!(pod = %pod.uuid, cues = merged.len(), chunks = tracks.len(), "Subtitles merged");
        pod.original_video.subtitle = Some(name);

        for chunk in &chunks {
            if let Err(e) = self.storage.delete(&pod.key(Folder::Subtitles, chunk)).await {
                warn!(chunk = %chunk, error = %e, "Could not delete subtitle chunk");
            }
        }
        Ok(())
    }
}
