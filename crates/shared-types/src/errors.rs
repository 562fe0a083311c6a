//! # Error Types
//!
//! Errors raised while parsing shared primitives from text.

use thiserror::Error;

/// Errors produced when decoding an `Identity`, `Hash` or `Relationship`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte string had the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Relationship ordinal or name is not known.
    #[error("Unknown relationship: {0}")]
    UnknownRelationship(String),
}
