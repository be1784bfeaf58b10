//! `MediaToolPort` backed by the ffmpeg and ffprobe binaries.

use crate::domain::chunks::order_by_chunk_number;
use crate::domain::pod::VideoFormat;
use crate::error::BoxError;
use crate::ports::media::MediaToolPort;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command as TokioCommand;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct FfmpegTool {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl FfmpegTool {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    async fn ffmpeg<I, A>(&self, args: I) -> Result<Output, BoxError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let mut command = TokioCommand::new(&self.ffmpeg);
        command.arg("-y").arg("-hide_banner").arg("-loglevel").arg("error");
        command.args(args);
        debug!(command = ?command.as_std(), "Running ffmpeg");
        checked("ffmpeg", command.output().await?)
    }
}

fn checked(program: &str, output: Output) -> Result<Output, BoxError> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(format!("{} exited with {}: {}", program, output.status, stderr.trim()).into())
}

/// Video filter arguments for a target framing.
pub fn format_args(format: VideoFormat) -> Vec<&'static str> {
    match format {
        VideoFormat::Original => vec!["-c", "copy"],
        VideoFormat::Vertical916 => vec!["-vf", "crop=ih*9/16:ih", "-c:a", "copy"],
        VideoFormat::Square => vec!["-vf", "crop=min(iw\\,ih):min(iw\\,ih)", "-c:a", "copy"],
    }
}

/// `-segment_time` value in seconds, keeping millisecond precision.
pub fn segment_time(segment_ms: u64) -> String {
    format!("{}.{:03}", segment_ms / 1000, segment_ms % 1000)
}

/// Parse ffprobe's bare `format=duration` output.
pub fn parse_duration(stdout: &[u8]) -> Result<f64, BoxError> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    text.parse::<f64>()
        .map_err(|_| format!("unexpected ffprobe duration {:?}", text).into())
}

#[async_trait]
impl MediaToolPort for FfmpegTool {
    async fn extract_sound(&self, video: &Path, output: &Path) -> Result<(), BoxError> {
        self.ffmpeg([
            OsStr::new("-i"),
            video.as_os_str(),
            OsStr::new("-vn"),
            OsStr::new("-acodec"),
            OsStr::new("libmp3lame"),
            output.as_os_str(),
        ])
        .await?;
        Ok(())
    }

    async fn split_audio(
        &self,
        audio: &Path,
        segment_ms: u64,
        output_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, BoxError> {
        tokio::fs::create_dir_all(output_dir).await?;
        let ext = audio.extension().and_then(OsStr::to_str).unwrap_or("mp3");
        let pattern = output_dir.join(format!("{}_%d.{}", stem, ext));
        let segment_time = segment_time(segment_ms);
        self.ffmpeg([
            OsStr::new("-i"),
            audio.as_os_str(),
            OsStr::new("-f"),
            OsStr::new("segment"),
            OsStr::new("-segment_time"),
            OsStr::new(&segment_time),
            OsStr::new("-segment_start_number"),
            OsStr::new("1"),
            OsStr::new("-c"),
            OsStr::new("copy"),
            pattern.as_os_str(),
        ])
        .await?;

        let prefix = format!("{}_", stem);
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(output_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(&prefix) {
                    names.push(name.to_string());
                }
            }
        }
        order_by_chunk_number(&mut names);
        Ok(names.into_iter().map(|name| output_dir.join(name)).collect())
    }

    async fn probe_duration(&self, media: &Path) -> Result<f64, BoxError> {
        let output = TokioCommand::new(&self.ffprobe)
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(media)
            .output()
            .await?;
        parse_duration(&checked("ffprobe", output)?.stdout)
    }

    async fn format_video(
        &self,
        input: &Path,
        output: &Path,
        format: VideoFormat,
    ) -> Result<(), BoxError> {
        let mut args = vec![OsStr::new("-i"), input.as_os_str()];
        args.extend(format_args(format).into_iter().map(OsStr::new));
        args.push(output.as_os_str());
        self.ffmpeg(args).await?;
        Ok(())
    }

    async fn cut(
        &self,
        input: &Path,
        start: f64,
        duration: f64,
        output: &Path,
    ) -> Result<(), BoxError> {
        let (start, duration) = (format!("{:.3}", start), format!("{:.3}", duration));
        self.ffmpeg([
            OsStr::new("-ss"),
            OsStr::new(&start),
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-t"),
            OsStr::new(&duration),
            OsStr::new("-c"),
            OsStr::new("copy"),
            output.as_os_str(),
        ])
        .await?;
        Ok(())
    }
}
