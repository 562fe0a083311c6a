//! # Integration Tests
//!
//! The registry service, the event bus and the node runtime wired together.

pub mod concurrency;
pub mod scenario;
