//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic of the registry.
//! NO I/O, NO async.
//!
//! - This is the **inner layer** of the hexagonal architecture.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod engine;
pub mod entities;
pub mod invariants;
pub mod queries;
pub mod services;
pub mod value_objects;

pub use engine::*;
pub use entities::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
