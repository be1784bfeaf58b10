//! Application layer - Generic services that use ports.

pub mod coordinator;
pub mod runner;
pub mod stages;
pub mod worker;
