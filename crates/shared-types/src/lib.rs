//! # Shared Types Crate
//!
//! This crate contains the primitives, notifications and the
//! `LedgerEnvelope<T>` wrapper shared by the registry engine, the event bus
//! and the host runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Explicit Caller**: Every mutating call carries its caller `Identity`;
//!   there is no ambient execution context.
//! - **Sentinel Identity**: The all-zero identity means "absent" and is never
//!   a valid registration target.

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod notifications;

pub use entities::*;
pub use envelope::LedgerEnvelope;
pub use errors::*;
pub use notifications::*;
