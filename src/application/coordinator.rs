//! Bounded fan-out over named chunks with an ordered fan-in.

use crate::domain::chunks::chunk_sort_key;
use crate::error::{BoxError, ChunkFailure, PartialFailure};
use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::{debug, warn};

/// Workers in flight per invocation unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// A unit of work identified by a name carrying its sequence number.
pub trait NamedChunk {
    fn chunk_name(&self) -> &str;
}

impl NamedChunk for String {
    fn chunk_name(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkCoordinator {
    concurrency: usize,
}

impl Default for ChunkCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl ChunkCoordinator {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `worker` on every chunk, at most `concurrency` at a time.
    ///
    /// Every chunk runs to completion even when a sibling fails. Results are
    /// returned in chunk-number order (unnumbered chunks last, in input
    /// order), never in completion order. Any failure turns the whole run
    /// into a [`PartialFailure`] that still carries the completed results.
    pub async fn run<C, T, F, Fut>(&self, chunks: Vec<C>, worker: F) -> Result<Vec<T>, PartialFailure<T>>
    where
        C: NamedChunk,
        T: std::fmt::Debug,
        F: Fn(C) -> Fut,
        Fut: Future<Output = Result<T, BoxError>>,
    {
        let total = chunks.len();
        debug!(chunks = total, concurrency = self.concurrency, "Dispatching chunks");

        let mut settled: Vec<(usize, String, Result<T, BoxError>)> = stream::iter(chunks.into_iter().enumerate())
            .map(|(position, chunk)| {
                let name = chunk.chunk_name().to_string();
                let work = worker(chunk);
                async move { (position, name, work.await) }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Dispatch order first, so the stable sort below is independent of
        // completion order.
        settled.sort_by_key(|(position, _, _)| *position);
        settled.sort_by_key(|(_, name, _)| chunk_sort_key(name));

        let mut completed = Vec::with_capacity(total);
        let mut failed = Vec::new();
        for (_, chunk, result) in settled {
            match result {
                Ok(value) => completed.push((chunk, value)),
                Err(source) => {
                    warn!(chunk = %chunk, error = %source, "Chunk failed");
                    failed.push(ChunkFailure { chunk, source });
                }
            }
        }

        if failed.is_empty() {
            Ok(completed.into_iter().map(|(_, value)| value).collect())
        } else {
            Err(PartialFailure { failed, completed })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_results_follow_chunk_numbers_not_completion() {
        let coordinator = ChunkCoordinator::new(4);
        let chunks = names(&["a_3.mp3", "a_1.mp3", "a_10.mp3", "a_2.mp3"]);

        let result = coordinator
            .run(chunks, |name: String| async move {
                // Lower numbers finish last.
                let n = crate::domain::chunks::chunk_number(&name).unwrap();
                tokio::time::sleep(Duration::from_millis(40 - n * 3)).await;
                Ok::<_, BoxError>(name.replace(".mp3", ".srt"))
            })
            .await
            .unwrap();

        assert_eq!(result, names(&["a_1.srt", "a_2.srt", "a_3.srt", "a_10.srt"]));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_completed_results() {
        let coordinator = ChunkCoordinator::new(4);
        let chunks = names(&["c_1.mp3", "c_2.mp3", "c_3.mp3", "c_4.mp3", "c_5.mp3"]);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let err = coordinator
            .run(chunks, move |name: String| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if name == "c_3.mp3" {
                        return Err::<String, BoxError>("transcription failed".into());
                    }
                    Ok(name)
                }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(err.failed_names(), vec!["c_3.mp3"]);
        let completed: Vec<&str> = err.completed.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(completed, vec!["c_1.mp3", "c_2.mp3", "c_4.mp3", "c_5.mp3"]);
        assert_eq!(err.to_string(), "1 of 5 chunks failed: c_3.mp3");
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let coordinator = ChunkCoordinator::new(2);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let chunks: Vec<String> = (1..=6).map(|n| format!("v_{}.mp4", n)).collect();

        let (current, max) = (in_flight.clone(), peak.clone());
        coordinator
            .run(chunks, move |name: String| {
                let (current, max) = (current.clone(), max.clone());
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    max.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, BoxError>(name)
                }
            })
            .await
            .unwrap();

        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unnumbered_chunks_go_last() {
        let coordinator = ChunkCoordinator::default();
        let chunks = names(&["notes.txt", "s_2.srt", "readme", "s_1.srt"]);

        let result = coordinator
            .run(chunks, |name: String| async move { Ok::<_, BoxError>(name) })
            .await
            .unwrap();

        assert_eq!(result, names(&["s_1.srt", "s_2.srt", "notes.txt", "readme"]));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let result = ChunkCoordinator::new(0)
            .run(Vec::<String>::new(), |name: String| async move { Ok::<_, BoxError>(name) })
            .await
            .unwrap();
        assert!(result.is_empty());
    }
}
