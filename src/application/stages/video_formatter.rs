use super::{external, scratch_dir};
use crate::application::runner::PodStage;
use crate::domain::chunks::file_stem;
use crate::domain::lifecycle::Stage;
use crate::domain::pod::{Folder, MediaPod, Video};
use crate::error::StageError;
use crate::ports::media::MediaToolPort;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use tracing::info;

/// Re-frames the original video according to the preset's output format.
pub struct VideoFormatter<S, M> {
    storage: S,
    media: M,
}

impl<S, M> VideoFormatter<S, M>
where
    S: StoragePort,
    M: MediaToolPort,
{
    pub fn new(storage: S, media: M) -> Self {
        Self { storage, media }
    }
}

#[async_trait]
impl<S, M> PodStage for VideoFormatter<S, M>
where
    S: StoragePort,
    M: MediaToolPort,
{
    fn stage(&self) -> Stage {
        Stage::VideoFormatter
    }

    async fn execute(&self, pod: &mut MediaPod) -> Result<(), StageError> {
        let dir = scratch_dir()?;
        let source_name = pod.original_video.name.clone();
        let source_path = dir.path().join(&source_name);
        self.storage
            .download(&pod.key(Folder::Videos, &source_name), &source_path)
            .await?;

        let name = format!("{}_processed.mp4", file_stem(&source_name));
        let output = dir.path().join(&name);
        self.media
            .format_video(&source_path, &output, pod.preset.video_format)
            .await
            .map_err(external)?;
        let duration = self.media.probe_duration(&output).await.map_err(external)?;
        let size = tokio::fs::metadata(&output).await?.len();

        self.storage
            .upload(&output, &pod.key(Folder::Videos, &name))
            .await?;

        info!(pod = %pod.uuid, file = %name, format = ?pod.preset.video_format, "Video formatted");
        pod.processed_video = Some(Video {
            length: Some(duration.round() as u64),
            ..Video::new(&name, "video/mp4", size)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStorage;
    use crate::domain::pod::VideoFormat;
    use crate::ports::media::MockMediaToolPort;

    #[tokio::test]
    async fn test_formats_and_records_processed_video() {
        let storage = MemoryStorage::new();
        storage.put("u/p/videos/clip.mp4", b"raw".to_vec()).await.unwrap();
        let mut pod = MediaPod::new("p", "u", Video::new("clip.mp4", "video/mp4", 3));
        pod.preset.video_format = VideoFormat::Vertical916;

        let mut media = MockMediaToolPort::new();
        media
            .expect_format_video()
            .withf(|_, _, format| *format == VideoFormat::Vertical916)
            .times(1)
            .returning(|_, output, _| {
                std::fs::write(output, b"cropped!")?;
                Ok(())
            });
        media.expect_probe_duration().returning(|_| Ok(61.2));

        VideoFormatter::new(storage.clone(), media)
            .execute(&mut pod)
            .await
            .unwrap();

        let processed = pod.processed_video.unwrap();
        assert_eq!(processed.name, "clip_processed.mp4");
        assert_eq!(processed.size, 8);
        assert_eq!(processed.length, Some(61));
        assert_eq!(
            storage.get("u/p/videos/clip_processed.mp4").await.unwrap(),
            b"cropped!"
        );
    }

    #[tokio::test]
    async fn test_transcoder_failure_is_external() {
        let storage = MemoryStorage::new();
        storage.put("u/p/videos/clip.mp4", b"raw".to_vec()).await.unwrap();
        let mut pod = MediaPod::new("p", "u", Video::new("clip.mp4", "video/mp4", 3));
        let mut media = MockMediaToolPort::new();
        media
            .expect_format_video()
            .returning(|_, _, _| Err("ffmpeg exited with 1".into()));

        let err = VideoFormatter::new(storage, media)
            .execute(&mut pod)
            .await
            .unwrap_err();

        assert!(matches!(err, StageError::External(_)));
        assert!(pod.processed_video.is_none());
    }
}
