//! Mediapod - media pod processing pipeline
//!
//! A pod (one uploaded video plus everything derived from it) travels
//! through independent stage workers: sound extraction, per-chunk
//! transcription, caption merging, caption styling, video formatting and
//! video splitting. Each worker reads a pod from its queue, does its stage
//! and publishes the pod with an updated status.
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (timecodes, subtitles, pod lifecycle)
//! - ports/: Trait definitions
//! - adapters/: Concrete implementations
//! - application/: Generic services (chunk coordinator, stage runner, workers)
//! - config: Environment configuration
//!
//! # Features
//! - `local`: Local/monolith deployment (filesystem storage, Redis queue)
//! - `aws`: AWS deployment (S3, SQS)
//! - `assemblyai`: AssemblyAI transcription
//! - `full`: All features

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

pub use domain::subtitles::SubtitleTrack;
pub use domain::timecode::TimeCode;
