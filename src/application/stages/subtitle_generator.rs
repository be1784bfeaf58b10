use super::scratch_dir;
use crate::application::coordinator::ChunkCoordinator;
use crate::application::runner::PodStage;
use crate::domain::chunks::with_extension;
use crate::domain::lifecycle::Stage;
use crate::domain::pod::{Folder, MediaPod};
use crate::domain::subtitles::SubtitleTrack;
use crate::error::{BoxError, StageError};
use crate::ports::storage::StoragePort;
use crate::ports::transcriber::TranscriberPort;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Transcribes every audio chunk into its own captions chunk.
pub struct SubtitleGenerator<S, T> {
    storage: S,
    transcriber: T,
    coordinator: ChunkCoordinator,
    words_per_cue: usize,
}

impl<S, T> SubtitleGenerator<S, T>
where
    S: StoragePort,
    T: TranscriberPort,
{
    pub fn new(storage: S, transcriber: T, coordinator: ChunkCoordinator, words_per_cue: usize) -> Self {
        Self {
            storage,
            transcriber,
            coordinator,
            words_per_cue,
        }
    }
}

#[async_trait]
impl<S, T> PodStage for SubtitleGenerator<S, T>
where
    S: StoragePort,
    T: TranscriberPort,
{
    fn stage(&self) -> Stage {
        Stage::SubtitleGenerator
    }

    async fn execute(&self, pod: &mut MediaPod) -> Result<(), StageError> {
        let audios = pod.original_video.audios.clone().unwrap_or_default();
        if audios.is_empty() {
            return Err(StageError::InvalidPod("no audio chunks to transcribe".into()));
        }

        let dir = scratch_dir()?;
        let source: &MediaPod = pod;
        let subtitles = self
            .coordinator
            .run(audios.clone(), |audio: String| {
                let local = dir.path().join(&audio);
                async move {
                    self.storage
                        .download(&source.key(Folder::Audios, &audio), &local)
                        .await?;
                    let words = self.transcriber.transcribe(&local).await?;
                    debug!(chunk = %audio, words = words.len(), "Chunk transcribed");

                    let srt_name = with_extension(&audio, "srt");
                    let srt = SubtitleTrack::from_words(&words, self.words_per_cue).to_srt();
                    self.storage
                        .put(&source.key(Folder::Subtitles, &srt_name), srt.into_bytes())
                        .await?;
                    tokio::fs::remove_file(&local).await?;
                    Ok::<_, BoxError>(srt_name)
                }
            })
            .await?;

        info!(pod = %pod.uuid, chunks = subtitles.len(), "Subtitle chunks generated");
        pod.original_video.set_subtitles(subtitles);

        // The audio chunks are consumed once every caption chunk exists.
        for audio in &audios {
            if let Err(e) = self.storage.delete(&pod.key(Folder::Audios, audio)).await {
                warn!(chunk = %audio, error = %e, "Could not delete audio chunk");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStorage;
    use crate::domain::pod::Video;
    use crate::domain::subtitles::Word;
    use crate::ports::transcriber::MockTranscriberPort;
    use std::path::Path;

    fn word(text: &str, start: u64, end: u64) -> Word {
        Word {
            text: text.to_string(),
            start,
            end,
        }
    }

    async fn seeded(audios: &[&str]) -> (MemoryStorage, MediaPod) {
        let storage = MemoryStorage::new();
        let mut pod = MediaPod::new("p", "u", Video::new("clip.mp4", "video/mp4", 5));
        for audio in audios {
            storage
                .put(&pod.key(Folder::Audios, audio), audio.as_bytes().to_vec())
                .await
                .unwrap();
        }
        pod.original_video.audios = Some(audios.iter().map(|a| a.to_string()).collect());
        (storage, pod)
    }

    fn chunk_of(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[tokio::test]
    async fn test_generates_ordered_captions() {
        let (storage, mut pod) = seeded(&["clip_2.mp3", "clip_1.mp3"]).await;
        let mut transcriber = MockTranscriberPort::new();
        transcriber.expect_transcribe().times(2).returning(|path| {
            let label = chunk_of(path);
            Ok(vec![word(&label, 1_000, 1_500)])
        });
        let stage = SubtitleGenerator::new(storage.clone(), transcriber, ChunkCoordinator::new(4), 6);

        stage.execute(&mut pod).await.unwrap();

        assert_eq!(
            pod.original_video.subtitles,
            Some(vec!["clip_1.srt".to_string(), "clip_2.srt".to_string()])
        );
        let srt = storage.get("u/p/subtitles/clip_2.srt").await.unwrap();
        assert_eq!(
            String::from_utf8(srt).unwrap(),
            "1\n00:00:01,000 --> 00:00:01,500\nclip_2.mp3\n\n"
        );
        assert!(!storage.contains("u/p/audios/clip_1.mp3").await);
    }

    #[tokio::test]
    async fn test_one_failed_transcription_fails_the_stage() {
        let (storage, mut pod) = seeded(&["clip_1.mp3", "clip_2.mp3", "clip_3.mp3"]).await;
        let mut transcriber = MockTranscriberPort::new();
        transcriber.expect_transcribe().times(3).returning(|path| {
            if chunk_of(path) == "clip_2.mp3" {
                Err("quota exceeded".into())
            } else {
                Ok(vec![word("hi", 0, 100)])
            }
        });
        let stage = SubtitleGenerator::new(storage.clone(), transcriber, ChunkCoordinator::new(4), 6);

        let err = stage.execute(&mut pod).await.unwrap_err();

        match err {
            StageError::PartialFailure { failed } => assert_eq!(failed, vec!["clip_2.mp3"]),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(pod.original_video.subtitles.is_none());
        assert!(storage.contains("u/p/audios/clip_1.mp3").await);
    }

    #[tokio::test]
    async fn test_pod_without_audio_is_rejected() {
        let mut transcriber = MockTranscriberPort::new();
        transcriber.expect_transcribe().times(0);
        let stage = SubtitleGenerator::new(MemoryStorage::new(), transcriber, ChunkCoordinator::new(4), 6);
        let mut pod = MediaPod::new("p", "u", Video::new("clip.mp4", "video/mp4", 5));

        assert!(matches!(
            stage.execute(&mut pod).await,
            Err(StageError::InvalidPod(_))
        ));
    }
}
