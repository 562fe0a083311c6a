//! # Registry Node Library
//!
//! This library exposes the internal modules of the registry node for testing.
//! The main entry point is the `main.rs` binary.
//!
//! - `config` - environment configuration and validation
//! - `journal` - JSON-lines ledger journal parsing and replay
//! - `runtime` - bus, service and background task wiring

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod journal;
pub mod runtime;

pub use config::{load_config, CompatMode, ConfigError, NodeConfig};
pub use journal::{read_journal, JournalEntry, JournalError, ReplaySummary};
pub use runtime::{NodeRuntime, NodeService};
