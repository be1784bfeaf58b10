//! Ports - Trait definitions for external collaborators.

pub mod media;
pub mod queue;
pub mod storage;
pub mod transcriber;
