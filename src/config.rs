//! Configuration for different deployment environments.

use crate::application::coordinator::DEFAULT_CONCURRENCY;
use crate::domain::ass::DEFAULT_SPLIT_THRESHOLD;
use crate::domain::lifecycle::Stage;
use crate::domain::subtitles::{DEFAULT_SEGMENT_SPACING_MS, DEFAULT_WORDS_PER_CUE};
use crate::error::ConfigError;
use std::env;
use std::str::FromStr;

/// Settings shared by every deployment: which stage this process runs and
/// how it runs it.
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Stage served by this process
    pub stage: Stage,
    /// Queue the worker consumes
    pub queue_read: String,
    /// Queue results are published to
    pub queue_write: String,
    /// Width of the per-invocation chunk pool
    pub chunk_concurrency: usize,
    /// Segment length shared by the sound extractor and the subtitle merger
    pub segment_spacing_ms: u64,
    /// Transcript words per generated cue
    pub words_per_cue: usize,
    /// Word count above which a styled line is broken in two
    pub ass_split_threshold: usize,
    /// Number of receive loops to spawn
    pub workers: usize,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            stage: required("STAGE")?.parse()?,
            queue_read: required("QUEUE_READ")?,
            queue_write: required("QUEUE_WRITE")?,
            chunk_concurrency: parsed_or("CHUNK_CONCURRENCY", DEFAULT_CONCURRENCY)?,
            segment_spacing_ms: positive_or("SEGMENT_SPACING_MS", DEFAULT_SEGMENT_SPACING_MS)?,
            words_per_cue: parsed_or("WORDS_PER_CUE", DEFAULT_WORDS_PER_CUE)?,
            ass_split_threshold: parsed_or("ASS_SPLIT_THRESHOLD", DEFAULT_SPLIT_THRESHOLD)?,
            workers: parsed_or("WORKERS", 1)?,
        })
    }
}

/// Configuration for local/monolith deployment.
#[cfg(feature = "local")]
#[derive(Clone, Debug)]
pub struct LocalConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Root directory of the local blob store
    pub storage_dir: String,
}

#[cfg(feature = "local")]
impl LocalConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| String::from("redis://127.0.0.1/")),
            storage_dir: env::var("STORAGE_DIR").unwrap_or_else(|_| String::from("./storage")),
        }
    }
}

/// Configuration for AWS deployment.
#[cfg(feature = "aws")]
#[derive(Clone, Debug)]
pub struct AwsConfig {
    /// S3 bucket for pod media
    pub s3_bucket: String,
    /// SQS queue URL the worker consumes
    pub sqs_read_url: String,
    /// SQS queue URL results are published to
    pub sqs_write_url: String,
}

#[cfg(feature = "aws")]
impl AwsConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            s3_bucket: required("S3_BUCKET")?,
            sqs_read_url: required("SQS_READ_URL")?,
            sqs_write_url: required("SQS_WRITE_URL")?,
        })
    }
}

/// Credentials for the transcription backend.
#[cfg(feature = "assemblyai")]
#[derive(Clone, Debug)]
pub struct TranscriberConfig {
    pub api_key: String,
    pub base_url: String,
}

#[cfg(feature = "assemblyai")]
impl TranscriberConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            api_key: required("ASSEMBLYAI_API_KEY")?,
            base_url: env::var("ASSEMBLYAI_URL")
                .unwrap_or_else(|_| String::from("https://api.assemblyai.com/v2")),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn positive_or(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match parsed_or(name, default)? {
        0 => Err(ConfigError::Invalid {
            name,
            value: String::from("0"),
        }),
        value => Ok(value),
    }
}
