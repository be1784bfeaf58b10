//! SRT captions: parsing, time shifting, merging and rendering.

use super::timecode::TimeCode;
use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Length of one split segment in milliseconds (five minutes).
///
/// The sound extractor cuts audio at this length and the merger shifts each
/// chunk's captions by it, so both stages must agree on the value.
pub const DEFAULT_SEGMENT_SPACING_MS: u64 = 300_000;

/// Words grouped into one cue when building captions from a transcript.
pub const DEFAULT_WORDS_PER_CUE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    pub index: usize,
    pub start: TimeCode,
    pub end: TimeCode,
    pub lines: Vec<String>,
}

impl SubtitleCue {
    pub fn shifted(&self, delta_ms: i64) -> Self {
        SubtitleCue {
            index: self.index,
            start: self.start.shift(delta_ms),
            end: self.end.shift(delta_ms),
            lines: self.lines.clone(),
        }
    }
}

/// One transcribed word with its timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: u64,
    pub end: u64,
}

/// How far each merged chunk is offset from the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentTiming {
    /// Every chunk is assumed to last exactly this many milliseconds.
    Fixed(u64),
    /// Measured chunk durations in milliseconds, one per chunk in order.
    Measured(Vec<u64>),
}

impl SegmentTiming {
    /// Offset applied to the `position`-th track (0-based).
    pub fn offset_of(&self, position: usize) -> u64 {
        match self {
            SegmentTiming::Fixed(spacing) => spacing * position as u64,
            SegmentTiming::Measured(durations) => durations.iter().take(position).sum(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub cues: Vec<SubtitleCue>,
}

impl SubtitleTrack {
    pub fn new(cues: Vec<SubtitleCue>) -> Self {
        SubtitleTrack { cues }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Parse SRT content. Blocks with fewer than three non-empty lines, or
    /// with an unreadable time range, are skipped.
    pub fn parse(content: &str) -> Self {
        let normalized = content.replace("\r\n", "\n");
        let mut cues = Vec::new();

        for block in split_blocks(&normalized) {
            let lines: Vec<&str> = block
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect();
            if lines.len() < 3 {
                continue;
            }
            match parse_time_range(lines[1]) {
                Ok((start, end)) => cues.push(SubtitleCue {
                    index: cues.len() + 1,
                    start,
                    end,
                    lines: lines[2..].iter().map(|l| l.to_string()).collect(),
                }),
                Err(e) => warn!(block = lines[0], error = %e, "Skipping malformed cue"),
            }
        }

        SubtitleTrack { cues }
    }

    pub fn shift_all(&self, delta_ms: i64) -> Self {
        SubtitleTrack {
            cues: self.cues.iter().map(|c| c.shifted(delta_ms)).collect(),
        }
    }

    /// Concatenate chunk tracks in order, offsetting each by its position.
    pub fn merge(tracks: &[SubtitleTrack], timing: &SegmentTiming) -> Self {
        let cues = tracks
            .iter()
            .enumerate()
            .flat_map(|(position, track)| {
                let offset = timing.offset_of(position) as i64;
                track.cues.iter().map(move |c| c.shifted(offset))
            })
            .enumerate()
            .map(|(i, cue)| SubtitleCue { index: i + 1, ..cue })
            .collect();
        SubtitleTrack { cues }
    }

    /// Build captions from transcript words, `words_per_cue` words per cue,
    /// each cue laid out on two lines split at the middle word.
    pub fn from_words(words: &[Word], words_per_cue: usize) -> Self {
        let cues = words
            .chunks(words_per_cue.max(1))
            .enumerate()
            .filter_map(|(i, group)| {
                let first = group.first()?;
                let last = group.last()?;
                let texts: Vec<&str> = group.iter().map(|w| w.text.as_str()).collect();
                let (head, tail) = texts.split_at(texts.len() / 2);
                let lines = [head, tail]
                    .iter()
                    .filter(|part| !part.is_empty())
                    .map(|part| part.join(" "))
                    .collect();
                Some(SubtitleCue {
                    index: i + 1,
                    start: TimeCode::from_millis(first.start),
                    end: TimeCode::from_millis(last.end),
                    lines,
                })
            })
            .collect();
        SubtitleTrack { cues }
    }

    /// Render as SRT, numbering cues from 1.
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for (i, cue) in self.cues.iter().enumerate() {
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                cue.start.to_srt(),
                cue.end.to_srt(),
                cue.lines.join("\n")
            ));
        }
        out
    }

    /// Latest end time across all cues.
    pub fn end(&self) -> TimeCode {
        self.cues
            .iter()
            .map(|c| c.end)
            .max()
            .unwrap_or(TimeCode::ZERO)
    }
}

fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_time_range(line: &str) -> Result<(TimeCode, TimeCode), FormatError> {
    let (start, end) = line
        .split_once("-->")
        .ok_or_else(|| FormatError::TimeRange(line.to_string()))?;
    Ok((TimeCode::parse_srt(start)?, TimeCode::parse_srt(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CUES: &str = "1\n00:00:01,000 --> 00:00:02,000\nhello\n\n\
                            2\n00:00:03,500 --> 00:00:04,250\nsecond\nline\n\n";

    fn word(text: &str, start: u64, end: u64) -> Word {
        Word {
            text: text.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_parse_two_cues() {
        let track = SubtitleTrack::parse(TWO_CUES);
        assert_eq!(track.len(), 2);
        assert_eq!(track.cues[0].start.as_millis(), 1_000);
        assert_eq!(track.cues[0].lines, vec!["hello"]);
        assert_eq!(track.cues[1].end.as_millis(), 4_250);
        assert_eq!(track.cues[1].lines, vec!["second", "line"]);
    }

    #[test]
    fn test_parse_crlf_and_extra_blank_lines() {
        let content = "\r\n\r\n7\r\n00:00:01,000 --> 00:00:02,000\r\nhello\r\n\r\n\r\n";
        let track = SubtitleTrack::parse(content);
        assert_eq!(track.len(), 1);
        assert_eq!(track.cues[0].lines, vec!["hello"]);
    }

    #[test]
    fn test_parse_drops_short_and_malformed_blocks() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\n\n\
                       2\nnot a time range\ntext\n\n\
                       3\n00:00:05,000 --> 00:00:06,000\nkept\n\n\
                       4\n00:00:07,000 -> 00:00:08,000\narrow\n";
        let track = SubtitleTrack::parse(content);
        assert_eq!(track.len(), 1);
        assert_eq!(track.cues[0].lines, vec!["kept"]);
    }

    #[test]
    fn test_parse_drops_cue_with_overflowing_hours() {
        let content = "1\n9999999999999:00:00,000 --> 9999999999999:00:01,000\nhuge\n\n\
                       2\n00:00:05,000 --> 00:00:06,000\nkept\n\n";
        let track = SubtitleTrack::parse(content);
        assert_eq!(track.len(), 1);
        assert_eq!(track.cues[0].lines, vec!["kept"]);
    }

    #[test]
    fn test_render_renumbers_from_one() {
        let content = "42\n00:00:01,000 --> 00:00:02,000\na\n\n\
                       17\n00:00:03,000 --> 00:00:04,000\nb\n\n";
        let out = SubtitleTrack::parse(content).to_srt();
        assert!(out.starts_with("1\n00:00:01,000"));
        assert!(out.contains("\n\n2\n00:00:03,000"));
    }

    #[test]
    fn test_shift_then_render() {
        let track = SubtitleTrack::parse("1\n00:00:01,000 --> 00:00:02,000\nhello\n\n");
        let out = track.shift_all(300_000).to_srt();
        assert_eq!(out, "1\n00:05:01,000 --> 00:05:02,000\nhello\n\n");
    }

    #[test]
    fn test_shift_keeps_cue_count() {
        let track = SubtitleTrack::parse(TWO_CUES);
        assert_eq!(track.shift_all(-10_000).len(), track.len());
        assert_eq!(track.shift_all(-10_000).cues[0].start, TimeCode::ZERO);
    }

    #[test]
    fn test_merge_offsets_and_reindexes() {
        let a = SubtitleTrack::parse(TWO_CUES);
        let b = SubtitleTrack::parse("1\n00:00:00,500 --> 00:00:01,000\nnext\n\n");
        let spacing = SegmentTiming::Fixed(DEFAULT_SEGMENT_SPACING_MS);

        let merged = SubtitleTrack::merge(&[a.clone(), b.clone()], &spacing);

        assert_eq!(merged.len(), a.len() + b.len());
        let indices: Vec<usize> = merged.cues.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        let a_end = merged.cues[..a.len()].iter().map(|c| c.end).max().unwrap();
        for cue in &merged.cues[a.len()..] {
            assert!(cue.start >= a_end);
        }
        assert_eq!(merged.cues[2].start.as_millis(), 300_500);
    }

    #[test]
    fn test_merge_third_track_offset_is_linear() {
        let one = SubtitleTrack::parse("1\n00:00:01,000 --> 00:00:02,000\nx\n\n");
        let merged = SubtitleTrack::merge(
            &[one.clone(), one.clone(), one],
            &SegmentTiming::Fixed(300_000),
        );
        let starts: Vec<u64> = merged.cues.iter().map(|c| c.start.as_millis()).collect();
        assert_eq!(starts, vec![1_000, 301_000, 601_000]);
    }

    // The spacing is an out-of-band contract with the splitting stage: a wrong
    // value is not detectable from the captions and silently shifts every
    // later chunk.
    #[test]
    fn test_merge_spacing_mismatch_desynchronizes_silently() {
        let one = SubtitleTrack::parse("1\n00:00:01,000 --> 00:00:02,000\nx\n\n");
        let tracks = [one.clone(), one];
        let agreed = SubtitleTrack::merge(&tracks, &SegmentTiming::Fixed(300_000));
        let drifted = SubtitleTrack::merge(&tracks, &SegmentTiming::Fixed(290_000));
        assert_eq!(agreed.len(), drifted.len());
        assert_eq!(
            agreed.cues[1].start.as_millis() - drifted.cues[1].start.as_millis(),
            10_000
        );
    }

    #[test]
    fn test_merge_with_measured_durations() {
        let one = SubtitleTrack::parse("1\n00:00:01,000 --> 00:00:02,000\nx\n\n");
        let merged = SubtitleTrack::merge(
            &[one.clone(), one.clone(), one],
            &SegmentTiming::Measured(vec![299_500, 300_250]),
        );
        let starts: Vec<u64> = merged.cues.iter().map(|c| c.start.as_millis()).collect();
        assert_eq!(starts, vec![1_000, 300_500, 600_750]);
    }

    #[test]
    fn test_merge_skips_empty_tracks() {
        let one = SubtitleTrack::parse("1\n00:00:01,000 --> 00:00:02,000\nx\n\n");
        let merged = SubtitleTrack::merge(
            &[SubtitleTrack::default(), one],
            &SegmentTiming::Fixed(300_000),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.cues[0].index, 1);
        assert_eq!(merged.cues[0].start.as_millis(), 301_000);
    }

    #[test]
    fn test_from_words_groups_and_splits_lines() {
        let words: Vec<Word> = (0..8)
            .map(|i| word(&format!("w{}", i), i * 500, i * 500 + 400))
            .collect();
        let track = SubtitleTrack::from_words(&words, 6);

        assert_eq!(track.len(), 2);
        assert_eq!(track.cues[0].lines, vec!["w0 w1 w2", "w3 w4 w5"]);
        assert_eq!(track.cues[0].start.as_millis(), 0);
        assert_eq!(track.cues[0].end.as_millis(), 2_900);
        assert_eq!(track.cues[1].lines, vec!["w6", "w7"]);
        assert_eq!(track.cues[1].start.as_millis(), 3_000);
    }

    #[test]
    fn test_from_words_single_word_keeps_one_line() {
        let track = SubtitleTrack::from_words(&[word("alone", 10, 20)], 6);
        assert_eq!(track.cues[0].lines, vec!["alone"]);
        assert!(SubtitleTrack::from_words(&[], 6).is_empty());
    }

    #[test]
    fn test_from_words_renders_parseable_srt() {
        let words = vec![word("hello", 1_000, 1_400), word("there", 1_500, 2_000)];
        let srt = SubtitleTrack::from_words(&words, 6).to_srt();
        assert_eq!(srt, "1\n00:00:01,000 --> 00:00:02,000\nhello\nthere\n\n");
        assert_eq!(SubtitleTrack::parse(&srt).len(), 1);
    }
}
