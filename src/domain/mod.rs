//! Domain layer - Pure business logic.

pub mod ass;
pub mod chunks;
pub mod lifecycle;
pub mod messages;
pub mod pod;
pub mod subtitles;
pub mod timecode;
