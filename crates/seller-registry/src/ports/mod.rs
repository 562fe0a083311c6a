//! # Ports Layer
//!
//! - `inbound`: What the registry offers (API)
//! - `outbound`: What the registry needs from its host (SPI)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
