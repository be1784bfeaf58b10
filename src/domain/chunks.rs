//! Chunk naming: `{stem}_{n}.{ext}` with a 1-based sequence number.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static CHUNK_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d+)\.[^./\\]+$").expect("valid chunk suffix pattern"));

/// Sequence number embedded in a chunk name, if it has one.
pub fn chunk_number(name: &str) -> Option<u64> {
    CHUNK_SUFFIX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Sort key that places unnumbered chunks after every numbered one.
pub fn chunk_sort_key(name: &str) -> (bool, u64) {
    match chunk_number(name) {
        Some(n) => (false, n),
        None => (true, 0),
    }
}

/// Stable sort by chunk number.
pub fn order_by_chunk_number(names: &mut [String]) {
    names.sort_by_key(|name| chunk_sort_key(name));
}

pub fn chunk_name(stem: &str, number: usize, ext: &str) -> String {
    format!("{}_{}.{}", stem, number, ext)
}

/// File name without its last extension.
pub fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Same chunk, other extension: `audio_3.mp3` -> `audio_3.srt`.
pub fn with_extension(name: &str, ext: &str) -> String {
    format!("{}.{}", file_stem(name), ext)
}
