use crate::application::runner::PodStage;
use crate::domain::ass::AssStyle;
use crate::domain::chunks::with_extension;
use crate::domain::lifecycle::Stage;
use crate::domain::pod::{Folder, MediaPod};
use crate::domain::subtitles::SubtitleTrack;
use crate::error::StageError;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use tracing::info;

/// Renders the merged captions into the styled presentation format.
pub struct SubtitleTransformer<S> {
    storage: S,
    split_threshold: usize,
}

impl<S> SubtitleTransformer<S>
where
    S: StoragePort,
{
    pub fn new(storage: S, split_threshold: usize) -> Self {
        Self {
            storage,
            split_threshold,
        }
    }
}

#[async_trait]
impl<S> PodStage for SubtitleTransformer<S>
where
    S: StoragePort,
{
    fn stage(&self) -> Stage {
        Stage::SubtitleTransformer
    }

    async fn execute(&self, pod: &mut MediaPod) -> Result<(), StageError> {
        let srt_name = pod
            .original_video
            .subtitle
            .clone()
            .ok_or_else(|| StageError::InvalidPod("no merged subtitle to style".into()))?;

        let bytes = self.storage.get(&pod.key(Folder::Subtitles, &srt_name)).await?;
        let track = SubtitleTrack::parse(&String::from_utf8_lossy(&bytes));
        let style = AssStyle::from_preset(&pod.preset, self.split_threshold);

        let ass_name = with_extension(&srt_name, "ass");
        self.storage
            .put(&pod.key(Folder::Subtitles, &ass_name), track.to_ass(&style).into_bytes())
            .await?;

        info!(pod = %pod.uuid, cues = track.len(), file = %ass_name, "Subtitles styled");
        pod.original_video.ass = Some(ass_name);
        Ok(())
    }
}
