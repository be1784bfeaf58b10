//! Pod lifecycle: which status a stage writes and which message type it
//! publishes.

use super::pod::MediaPod;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

const MESSAGE_NAMESPACE: &str = "App\\Protobuf\\";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SoundExtractor,
    SubtitleGenerator,
    SubtitleMerger,
    SubtitleTransformer,
    VideoFormatter,
    VideoSplitter,
}

/// Result of a stage's own work, as seen by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl<T, E> From<&Result<T, E>> for Outcome {
    fn from(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(_) => Outcome::Failure,
        }
    }
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::SoundExtractor,
        Stage::SubtitleGenerator,
        Stage::SubtitleMerger,
        Stage::SubtitleTransformer,
        Stage::VideoFormatter,
        Stage::VideoSplitter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::SoundExtractor => "sound_extractor",
            Stage::SubtitleGenerator => "subtitle_generator",
            Stage::SubtitleMerger => "subtitle_merger",
            Stage::SubtitleTransformer => "subtitle_transformer",
            Stage::VideoFormatter => "video_formatter",
            Stage::VideoSplitter => "video_splitter",
        }
    }

    fn message_name(self) -> &'static str {
        match self {
            Stage::SoundExtractor => "SoundExtractor",
            Stage::SubtitleGenerator => "SubtitleGenerator",
            Stage::SubtitleMerger => "SubtitleMerger",
            Stage::SubtitleTransformer => "SubtitleTransformer",
            Stage::VideoFormatter => "VideoFormatter",
            Stage::VideoSplitter => "VideoSplitter",
        }
    }

    pub fn status(self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success => format!("{}_complete", self.name()),
            Outcome::Failure => format!("{}_error", self.name()),
        }
    }

    /// Routing label of the outbound message.
    pub fn message_type(self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success => format!("{}{}ToApi", MESSAGE_NAMESPACE, self.message_name()),
            Outcome::Failure => format!("{}{}Error", MESSAGE_NAMESPACE, self.message_name()),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s.trim())
            .ok_or_else(|| ConfigError::Invalid {
                name: "STAGE",
                value: s.to_string(),
            })
    }
}

/// Write the stage's terminal status. Nothing else on the pod changes.
pub fn advance(mut pod: MediaPod, stage: Stage, outcome: Outcome) -> MediaPod {
    pod.status = stage.status(outcome);
    pod
}
