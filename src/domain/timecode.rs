//! Millisecond time codes and their SRT/ASS text forms.

use crate::error::FormatError;
use std::fmt;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Non-negative offset in milliseconds from the pod-relative zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeCode(u64);

impl TimeCode {
    pub const ZERO: TimeCode = TimeCode(0);

    pub const fn from_millis(ms: u64) -> Self {
        TimeCode(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Parse `HH:MM:SS,mmm`.
    pub fn parse_srt(s: &str) -> Result<Self, FormatError> {
        let err = || FormatError::SrtTimeCode(s.to_string());
        let (hms, millis) = s.trim().split_once(',').ok_or_else(err)?;
        let [h, m, sec] = split_hms(hms).ok_or_else(err)?;
        if h.len() < 2 || millis.len() != 3 {
            return Err(err());
        }
        let ms = fixed_digits(millis, 3).ok_or_else(err)?;
        Self::from_parts(h, m, sec, ms).ok_or_else(err)
    }

    /// Parse `H:MM:SS.cc`; the centisecond field is widened back to milliseconds.
    pub fn parse_ass(s: &str) -> Result<Self, FormatError> {
        let err = || FormatError::AssTimeCode(s.to_string());
        let (hms, centis) = s.trim().split_once('.').ok_or_else(err)?;
        let [h, m, sec] = split_hms(hms).ok_or_else(err)?;
        let cs = fixed_digits(centis, 2).ok_or_else(err)?;
        Self::from_parts(h, m, sec, cs * 10).ok_or_else(err)
    }

    /// Move by `delta_ms`, clamping at zero.
    pub fn shift(self, delta_ms: i64) -> Self {
        if delta_ms >= 0 {
            TimeCode(self.0.saturating_add(delta_ms.unsigned_abs()))
        } else {
            TimeCode(self.0.saturating_sub(delta_ms.unsigned_abs()))
        }
    }

    pub fn to_srt(self) -> String {
        let (h, m, s, ms) = self.split();
        format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
    }

    /// Render `H:MM:SS.cc`. Milliseconds are truncated to centiseconds.
    pub fn to_ass(self) -> String {
        let (h, m, s, ms) = self.split();
        format!("{}:{:02}:{:02}.{:02}", h, m, s, ms / 10)
    }

    fn split(self) -> (u64, u64, u64, u64) {
        let ms = self.0;
        (
            ms / MS_PER_HOUR,
            (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            (ms % MS_PER_MINUTE) / MS_PER_SECOND,
            ms % MS_PER_SECOND,
        )
    }

    fn from_parts(h: &str, m: &str, s: &str, ms: u64) -> Option<Self> {
        let hours: u64 = digits(h)?;
        let minutes = fixed_digits(m, 2)?;
        let seconds = fixed_digits(s, 2)?;
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        hours
            .checked_mul(MS_PER_HOUR)?
            .checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + ms)
            .map(TimeCode)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_srt())
    }
}

fn split_hms(s: &str) -> Option<[&str; 3]> {
    let mut parts = s.split(':');
    let hms = [parts.next()?, parts.next()?, parts.next()?];
    parts.next().is_none().then_some(hms)
}

fn digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn fixed_digits(s: &str, width: usize) -> Option<u64> {
    if s.len() != width {
        return None;
    }
    digits(s)
}
