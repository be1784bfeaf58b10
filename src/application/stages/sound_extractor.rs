use super::{external, scratch_dir, LocalChunk};
use crate::application::coordinator::ChunkCoordinator;
use crate::application::runner::PodStage;
use crate::domain::chunks::file_stem;
use crate::domain::lifecycle::Stage;
use crate::domain::pod::{Folder, MediaPod};
use crate::error::{BoxError, StageError};
use crate::ports::media::MediaToolPort;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use tracing::info;

/// Pulls the audio track out of the original video and stores it as
/// fixed-length chunks.
pub struct SoundExtractor<S, M> {
    storage: S,
    media: M,
    coordinator: ChunkCoordinator,
    segment_ms: u64,
}

impl<S, M> SoundExtractor<S, M>
where
    S: StoragePort,
    M: MediaToolPort,
{
    pub fn new(storage: S, media: M, coordinator: ChunkCoordinator, segment_ms: u64) -> Self {
        Self {
            storage,
            media,
            coordinator,
            segment_ms,
        }
    }
}

#[async_trait]
impl<S, M> PodStage for SoundExtractor<S, M>
where
    S: StoragePort,
    M: MediaToolPort,
{
    fn stage(&self) -> Stage {
        Stage::SoundExtractor
    }

    async fn execute(&self, pod: &mut MediaPod) -> Result<(), StageError> {
        let dir = scratch_dir()?;
        let video_name = pod.original_video.name.clone();
        let stem = file_stem(&video_name).to_string();

        // 1. Download
        let video_path = dir.path().join(&video_name);
        self.storage
            .download(&pod.key(Folder::Videos, &video_name), &video_path)
            .await?;

        // 2. Probe + extract
        let duration = self
            .media
            .probe_duration(&video_path)
            .await
            .map_err(external)?;
        pod.original_video.length = Some(duration.round() as u64);

        let audio_path = dir.path().join(format!("{}.mp3", stem));
        self.media
            .extract_sound(&video_path, &audio_path)
            .await
            .map_err(external)?;

        // 3. Split
        let segments_dir = dir.path().join("audios");
        tokio::fs::create_dir_all(&segments_dir).await?;
        let files = self
            .media
            .split_audio(&audio_path, self.segment_ms, &segments_dir, &stem)
            .await
            .map_err(external)?;
        let chunks: Vec<LocalChunk> = files.into_iter().filter_map(LocalChunk::from_path).collect();
        if chunks.is_empty() {
            return Err(StageError::InvalidPod(format!(
                "no audio extracted from {}",
                video_name
            )));
        }

        // 4. Upload
        let target: &MediaPod = pod;
        let names = self
            .coordinator
            .run(chunks, |chunk: LocalChunk| async move {
                self.storage
                    .upload(&chunk.path, &target.key(Folder::Audios, &chunk.name))
                    .await?;
                Ok::<_, BoxError>(chunk.name)
            })
            .await?;

        info!(pod = %pod.uuid, chunks = names.len(), "Audio chunks uploaded");
        pod.original_video.set_audios(names);
        Ok(())
    }
}
