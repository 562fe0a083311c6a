//! # Domain Services
//!
//! Stateless key derivation for the registry's composite keys.
//!
//! Keys are Keccak-256 digests. Uniqueness (distinct inputs map to distinct
//! keys) is assumed from collision resistance, not proven.

use crate::domain::value_objects::{DomainHash, Hash, SellerKey};
use sha3::{Digest, Keccak256};

/// Computes keccak256 hash of data.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let hash = Keccak256::digest(data);
    Hash::new(hash.into())
}

/// Key of the domain index: keccak256 over the raw domain bytes.
///
/// Domains are hashed exactly as given; no case folding or trimming.
#[must_use]
pub fn domain_hash(domain: &str) -> DomainHash {
    keccak256(domain.as_bytes())
}

/// Key of a seller record: keccak256 over both fields, each prefixed with
/// its big-endian `u64` byte length.
///
/// The length prefix keeps `("ab", "c")` and `("a", "bc")` apart.
#[must_use]
pub fn seller_key(seller_domain: &str, seller_id: &str) -> SellerKey {
    let mut hasher = Keccak256::new();
    for field in [seller_domain, seller_id] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    Hash::new(hasher.finalize().into())
}
