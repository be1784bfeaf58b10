//! Adapters - Concrete implementations of ports.

pub mod ffmpeg;

#[cfg(test)]
pub mod memory;

#[cfg(feature = "assemblyai")]
pub mod assemblyai;

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(feature = "local")]
pub mod local;
