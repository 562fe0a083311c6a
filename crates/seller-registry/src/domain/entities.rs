//! # Domain Entities
//!
//! The registry's records, its state container and the engine configuration.

use crate::domain::invariants::{
    check_domain_index_invariant, check_no_orphan_index_entries, check_seller_keys_consistent,
};
use crate::domain::value_objects::{DomainHash, Identity, Relationship, SellerKey};
use crate::errors::RestoreError;
use serde::{Deserialize, Serialize};
use shared_types::RegistryNotification;
use std::collections::BTreeMap;

// =============================================================================
// RECORDS
// =============================================================================

/// A registered publisher, keyed by `identity`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    /// The publisher's identity.
    pub identity: Identity,
    /// The domain the publisher claims.
    pub domain: String,
    /// Display name.
    pub name: String,
}

/// An authorization entry for a third party selling a publisher's inventory.
///
/// The default value (empty strings, `Direct`) stands for "absent": lookups
/// never fail, they return this record instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerRecord {
    /// Advertising system domain.
    pub domain: String,
    /// Seller account id within that system.
    pub seller_id: String,
    /// Direct or reseller.
    pub relationship: Relationship,
    /// Certification authority tag id.
    pub tag_id: String,
}

impl SellerRecord {
    /// Returns true if this is the default ("absent") record.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        *self == Self::default()
    }

    /// Projects the record into its interchange form (relationship ordinal).
    #[must_use]
    pub fn to_interchange(&self) -> SellerInterchange {
        SellerInterchange {
            domain: self.domain.clone(),
            seller_id: self.seller_id.clone(),
            relationship: self.relationship.ordinal(),
            tag_id: self.tag_id.clone(),
        }
    }
}

/// Interchange form of a [`SellerRecord`] with `Direct = 0`, `Reseller = 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerInterchange {
    /// Advertising system domain.
    pub domain: String,
    /// Seller account id.
    pub seller_id: String,
    /// Relationship ordinal.
    pub relationship: u8,
    /// Certification authority tag id.
    pub tag_id: String,
}

// =============================================================================
// STATE
// =============================================================================

/// The three stores plus the administrator scalar.
///
/// Fields are private: the engine's mutating operations are the only write
/// path, and [`RegistryState::restore`] the only way back from bytes. Maps are
/// ordered so that the encoded form is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistryState {
    administrator: Identity,
    publishers: BTreeMap<Identity, Publisher>,
    domain_index: BTreeMap<DomainHash, Identity>,
    sellers: BTreeMap<Identity, BTreeMap<SellerKey, SellerRecord>>,
    version: u64,
}

/// Decoding target for [`RegistryState::restore`]; field order matches the
/// encoded form.
#[derive(Deserialize)]
struct EncodedState {
    administrator: Identity,
    publishers: BTreeMap<Identity, Publisher>,
    domain_index: BTreeMap<DomainHash, Identity>,
    sellers: BTreeMap<Identity, BTreeMap<SellerKey, SellerRecord>>,
    version: u64,
}

impl RegistryState {
    /// Creates an empty registry owned by `administrator`.
    #[must_use]
    pub fn new(administrator: Identity) -> Self {
        Self {
            administrator,
            ..Self::default()
        }
    }

    /// The immutable administrator identity.
    #[must_use]
    pub fn administrator(&self) -> Identity {
        self.administrator
    }

    /// Number of committed transitions applied to this state.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Publisher table.
    #[must_use]
    pub fn publishers(&self) -> &BTreeMap<Identity, Publisher> {
        &self.publishers
    }

    /// Domain index.
    #[must_use]
    pub fn domain_index(&self) -> &BTreeMap<DomainHash, Identity> {
        &self.domain_index
    }

    /// Seller table.
    #[must_use]
    pub fn sellers(&self) -> &BTreeMap<Identity, BTreeMap<SellerKey, SellerRecord>> {
        &self.sellers
    }

    /// Stored publisher record, if any.
    #[must_use]
    pub fn publisher(&self, identity: &Identity) -> Option<&Publisher> {
        self.publishers.get(identity)
    }

    /// Seller records stored under a publisher identity.
    pub fn sellers_of(&self, identity: &Identity) -> impl Iterator<Item = (&SellerKey, &SellerRecord)> {
        self.sellers.get(identity).into_iter().flatten()
    }

    /// Deterministic binary encoding of the whole state.
    ///
    /// # Errors
    ///
    /// Returns the encoder error; never expected for in-memory state.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a committed head produced by [`RegistryState::encode`].
    ///
    /// Seller records must sit under their derived keys. When `config`
    /// keeps the domain index consistent, the index must also match the
    /// publisher table exactly; legacy heads may carry stale entries.
    pub fn restore(bytes: &[u8], config: &RegistryConfig) -> Result<Self, RestoreError> {
        let encoded: EncodedState = bincode::deserialize(bytes)?;
        let state = Self {
            administrator: encoded.administrator,
            publishers: encoded.publishers,
            domain_index: encoded.domain_index,
            sellers: encoded.sellers,
            version: encoded.version,
        };

        let mut violations = check_seller_keys_consistent(&state);
        if config.keeps_domain_index_consistent() {
            violations.extend(check_domain_index_invariant(&state));
            violations.extend(check_no_orphan_index_entries(&state));
        }
        if violations.is_empty() {
            Ok(state)
        } else {
            Err(RestoreError::Inconsistent(violations))
        }
    }

    // -------------------------------------------------------------------------
    // Write path (engine only)
    // -------------------------------------------------------------------------

    pub(crate) fn upsert_publisher(&mut self, publisher: Publisher) {
        self.publishers.insert(publisher.identity, publisher);
    }

    pub(crate) fn remove_publisher(&mut self, identity: &Identity) -> Option<Publisher> {
        self.publishers.remove(identity)
    }

    pub(crate) fn index_domain(&mut self, hash: DomainHash, identity: Identity) {
        self.domain_index.insert(hash, identity);
    }

    pub(crate) fn unindex_domain(&mut self, hash: &DomainHash) -> Option<Identity> {
        self.domain_index.remove(hash)
    }

    pub(crate) fn upsert_seller(&mut self, publisher: Identity, key: SellerKey, record: SellerRecord) {
        self.sellers.entry(publisher).or_default().insert(key, record);
    }

    pub(crate) fn remove_seller(&mut self, publisher: &Identity, key: &SellerKey) -> Option<SellerRecord> {
        let table = self.sellers.get_mut(publisher)?;
        let removed = table.remove(key);
        if table.is_empty() {
            self.sellers.remove(publisher);
        }
        removed
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }
}

// =============================================================================
// TRANSITION OUTCOME
// =============================================================================

/// Outcome of a mutating operation that did not abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// State changed and a notification was emitted.
    Applied(RegistryNotification),
    /// Legacy silent no-op: nothing changed, nothing emitted.
    Ignored,
}

impl Transition {
    /// The emitted notification, if any.
    #[must_use]
    pub fn notification(&self) -> Option<RegistryNotification> {
        match self {
            Self::Applied(n) => Some(*n),
            Self::Ignored => None,
        }
    }

    /// Returns true if the transition changed state.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// What happens when an unregistered identity calls `add_seller`/`remove_seller`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellerPolicy {
    /// Abort with `RegistryError::PublisherNotRegistered`.
    #[default]
    Reject,
    /// Legacy behaviour: silently do nothing.
    Ignore,
}

/// Engine behaviour switches.
///
/// `Default` is the strict behaviour; [`RegistryConfig::legacy`] reproduces
/// the legacy contract's quirks exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Handling of seller mutations from unregistered callers.
    pub unregistered_seller_policy: SellerPolicy,
    /// Drop the previous domain-index entry when a publisher is re-registered
    /// under a different domain.
    pub reindex_on_domain_change: bool,
    /// On deregistration, remove the domain-index entry only if it still
    /// points at the deregistered identity.
    pub guard_domain_index: bool,
    /// Refuse to register a domain still claimed by another registered
    /// publisher.
    pub exclusive_domains: bool,
    /// Reject empty domains, empty seller ids and the sentinel identity as a
    /// registration target.
    pub validate_inputs: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            unregistered_seller_policy: SellerPolicy::Reject,
            reindex_on_domain_change: true,
            guard_domain_index: true,
            exclusive_domains: true,
            validate_inputs: true,
        }
    }
}

impl RegistryConfig {
    /// Behavioural parity with the legacy registry contract.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            unregistered_seller_policy: SellerPolicy::Ignore,
            reindex_on_domain_change: false,
            guard_domain_index: false,
            exclusive_domains: false,
            validate_inputs: false,
        }
    }

    /// True when every committed state keeps the domain index in step with
    /// the publisher table.
    #[must_use]
    pub fn keeps_domain_index_consistent(&self) -> bool {
        self.reindex_on_domain_change
            && self.guard_domain_index
            && self.exclusive_domains
            && self.validate_inputs
    }

    /// Returns true if every switch is at its legacy setting.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        *self == Self::legacy()
    }
}
