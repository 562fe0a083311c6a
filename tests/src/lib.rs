//! # Seller Registry Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs      # Identities, random command streams, snapshot helpers
//! ├── properties/      # Randomized checks of the engine's guarantees
//! │   ├── registration.rs
//! │   ├── permissions.rs
//! │   ├── sellers.rs
//! │   └── compat.rs
//! │
//! └── integration/     # Service, bus and node wired together
//!     ├── scenario.rs
//!     ├── concurrency.rs
//!     └── journal.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p registry-tests
//!
//! # By category
//! cargo test -p registry-tests properties::
//! cargo test -p registry-tests integration::
//!
//! # Benchmarks
//! cargo bench -p registry-tests
//! ```

#![allow(dead_code)]

pub mod integration;
