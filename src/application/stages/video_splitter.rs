use super::{external, scratch_dir};
use crate::application::coordinator::{ChunkCoordinator, NamedChunk};
use crate::application::runner::PodStage;
use crate::domain::chunks::{chunk_name, file_stem};
use crate::domain::lifecycle::Stage;
use crate::domain::pod::{Folder, MediaPod, Video};
use crate::error::{BoxError, StageError};
use crate::ports::media::MediaToolPort;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// One slice of the video to cut.
#[derive(Debug, Clone)]
pub struct VideoPart {
    pub name: String,
    pub start: f64,
    pub duration: f64,
}

impl NamedChunk for VideoPart {
    fn chunk_name(&self) -> &str {
        &self.name
    }
}

/// `parts` equal slices covering `total` seconds, numbered from 1.
pub fn plan_parts(stem: &str, total: f64, parts: u32) -> Vec<VideoPart> {
    let parts = parts.max(1);
    let length = total / parts as f64;
    (1..=parts)
        .map(|n| VideoPart {
            name: chunk_name(stem, n as usize, "mp4"),
            start: length * (n - 1) as f64,
            duration: length,
        })
        .collect()
}

/// Cuts the processed video into the number of parts the preset asks for.
pub struct VideoSplitter<S, M> {
    storage: S,
    media: M,
    coordinator: ChunkCoordinator,
}

impl<S, M> VideoSplitter<S, M>
where
    S: StoragePort,
    M: MediaToolPort,
{
    pub fn new(storage: S, media: M, coordinator: ChunkCoordinator) -> Self {
        Self {
            storage,
            media,
            coordinator,
        }
    }
}

#[async_trait]
impl<S, M> PodStage for VideoSplitter<S, M>
where
    S: StoragePort,
    M: MediaToolPort,
{
    fn stage(&self) -> Stage {
        Stage::VideoSplitter
    }

    async fn execute(&self, pod: &mut MediaPod) -> Result<(), StageError> {
        let source = pod
            .processed_video
            .clone()
            .unwrap_or_else(|| pod.original_video.clone());

        let dir = scratch_dir()?;
        let source_path = dir.path().join(&source.name);
        self.storage
            .download(&pod.key(Folder::Videos, &source.name), &source_path)
            .await?;

        let total = self
            .media
            .probe_duration(&source_path)
            .await
            .map_err(external)?;
        if total <= 0.0 {
            return Err(StageError::InvalidPod(format!("{} has no duration", source.name)));
        }

        let parts = plan_parts(file_stem(&source.name), total, pod.preset.video_parts);
        let target: &MediaPod = pod;
        let (input, out_dir): (&Path, &Path) = (&source_path, dir.path());
        let videos = self
            .coordinator
            .run(parts, |part: VideoPart| async move {
                let output = out_dir.join(&part.name);
                self.media
                    .cut(input, part.start, part.duration, &output)
                    .await?;
                let size = tokio::fs::metadata(&output).await?.len();
                self.storage
                    .upload(&output, &target.key(Folder::Videos, &part.name))
                    .await?;
                tokio::fs::remove_file(&output).await?;
                Ok::<_, BoxError>(Video {
                    length: Some(part.duration.round() as u64),
                    ..Video::new(&part.name, "video/mp4", size)
                })
            })
            .await?;

        info!(pod = %pod.uuid, parts = videos.len(), "Video split");
        pod.final_video = videos;
        Ok(())
    }
}
