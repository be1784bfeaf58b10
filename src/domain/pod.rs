//! The media pod and the records it carries between stages.

use super::chunks::order_by_chunk_number;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPod {
    pub uuid: String,
    pub user_uuid: String,
    pub original_video: Video,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_video: Option<Video>,
    #[serde(default)]
    pub final_video: Vec<Video>,
    #[serde(default, alias = "configuration")]
    pub preset: Preset,
    #[serde(default)]
    pub status: String,
}

impl MediaPod {
    pub fn new(uuid: &str, user_uuid: &str, original_video: Video) -> Self {
        MediaPod {
            uuid: uuid.to_string(),
            user_uuid: user_uuid.to_string(),
            original_video,
            processed_video: None,
            final_video: Vec::new(),
            preset: Preset::default(),
            status: String::new(),
        }
    }

    /// Storage key of `name` inside one of the pod's folders.
    pub fn key(&self, folder: Folder, name: &str) -> String {
        format!("{}/{}/{}/{}", self.user_uuid, self.uuid, folder.as_str(), name)
    }
}

/// Top-level folders of a pod in the blob store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Videos,
    Audios,
    Subtitles,
}

impl Folder {
    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Videos => "videos",
            Folder::Audios => "audios",
            Folder::Subtitles => "subtitles",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub size: u64,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audios: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<Vec<String>>,
    /// Merged captions file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Styled presentation file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ass: Option<String>,
}

impl Video {
    pub fn new(name: &str, mime_type: &str, size: u64) -> Self {
        Video {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size,
            ..Video::default()
        }
    }

    pub fn set_audios(&mut self, mut names: Vec<String>) {
        order_by_chunk_number(&mut names);
        self.audios = Some(names);
    }

    pub fn set_subtitles(&mut self, mut names: Vec<String>) {
        order_by_chunk_number(&mut names);
        self.subtitles = Some(names);
    }
}

/// Output parameters chosen by the user. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preset {
    pub subtitle_font: SubtitleFont,
    #[serde(deserialize_with = "number_or_string")]
    pub subtitle_size: u32,
    pub subtitle_color: String,
    pub subtitle_bold: bool,
    pub subtitle_italic: bool,
    pub subtitle_underline: bool,
    pub subtitle_outline_color: String,
    #[serde(deserialize_with = "number_or_string")]
    pub subtitle_outline_thickness: u32,
    #[serde(deserialize_with = "number_or_string")]
    pub subtitle_shadow: u32,
    pub video_format: VideoFormat,
    #[serde(deserialize_with = "number_or_string")]
    pub video_parts: u32,
}

impl Default for Preset {
    fn default() -> Self {
        Preset {
            subtitle_font: SubtitleFont::default(),
            subtitle_size: 16,
            subtitle_color: "#FFFFFF".to_string(),
            subtitle_bold: false,
            subtitle_italic: false,
            subtitle_underline: false,
            subtitle_outline_color: "#000000".to_string(),
            subtitle_outline_thickness: 1,
            subtitle_shadow: 0,
            video_format: VideoFormat::default(),
            video_parts: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubtitleFont {
    TimesNewRoman,
    CourierNew,
    #[default]
    #[serde(other)]
    Arial,
}

impl SubtitleFont {
    pub fn family(self) -> &'static str {
        match self {
            SubtitleFont::Arial => "Arial",
            SubtitleFont::TimesNewRoman => "Times New Roman",
            SubtitleFont::CourierNew => "Courier New",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoFormat {
    /// Centre crop to 9:16.
    #[serde(rename = "vertical_916")]
    Vertical916,
    /// Centre crop to 1:1.
    Square,
    /// Unknown formats fall back to no re-framing.
    #[default]
    #[serde(other)]
    Original,
}

/// Protobuf JSON renders 64-bit integers as strings; accept both.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + TryFrom<u64>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => {
            T::try_from(n).map_err(|_| serde::de::Error::custom(format!("{} out of range", n)))
        }
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid integer {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_pod() {
        let json = r#"{
            "uuid": "pod-1",
            "userUuid": "user-1",
            "originalVideo": {"name": "clip.mp4", "mimeType": "video/mp4", "size": "1024"}
        }"#;
        let pod: MediaPod = serde_json::from_str(json).unwrap();
        assert_eq!(pod.original_video.size, 1024);
        assert!(pod.processed_video.is_none());
        assert!(pod.original_video.audios.is_none());
        assert_eq!(pod.preset, Preset::default());
        assert_eq!(pod.status, "");
    }

    #[test]
    fn test_preset_fields_and_unknown_enums() {
        let json = r##"{
            "subtitleFont": "COURIER_NEW",
            "subtitleSize": "22",
            "subtitleColor": "#112233",
            "videoFormat": "vertical_916",
            "videoParts": 3
        }"##;
        let preset: Preset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.subtitle_font, SubtitleFont::CourierNew);
        assert_eq!(preset.subtitle_size, 22);
        assert_eq!(preset.video_format, VideoFormat::Vertical916);
        assert_eq!(preset.video_parts, 3);

        let preset: Preset =
            serde_json::from_str(r#"{"subtitleFont": "COMIC_SANS", "videoFormat": "cinema"}"#)
                .unwrap();
        assert_eq!(preset.subtitle_font, SubtitleFont::Arial);
        assert_eq!(preset.video_format, VideoFormat::Original);
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let pod = MediaPod::new("p", "u", Video::new("clip.mp4", "video/mp4", 10));
        let value = serde_json::to_value(&pod).unwrap();
        assert!(value.get("processedVideo").is_none());
        assert!(value["originalVideo"].get("audios").is_none());
        assert_eq!(value["userUuid"], "u");
    }

    #[test]
    fn test_chunk_lists_are_ordered() {
        let mut video = Video::new("clip.mp4", "video/mp4", 10);
        video.set_audios(vec!["clip_10.mp3".into(), "clip_2.mp3".into(), "clip_1.mp3".into()]);
        assert_eq!(
            video.audios.unwrap(),
            vec!["clip_1.mp3", "clip_2.mp3", "clip_10.mp3"]
        );
    }

    #[test]
    fn test_keys() {
        let pod = MediaPod::new("p", "u", Video::default());
        assert_eq!(pod.key(Folder::Audios, "a_1.mp3"), "u/p/audios/a_1.mp3");
    }
}
