//! # Domain Invariants
//!
//! Cross-store consistency checks. Under the default configuration every
//! committed state satisfies all of them; the legacy configuration can leave
//! stale domain-index entries behind, which `check_no_orphan_index_entries`
//! reports.
//!
//! | Check | Holds when |
//! |---|---|
//! | domain index | `DomainIndex[hash(p.domain)] == p.identity` for every registered `p` |
//! | orphan entries | every index entry points at a registered publisher claiming that domain |
//! | seller keys | every record is stored under `hash(record.domain, record.seller_id)` |

use crate::domain::entities::RegistryState;
use crate::domain::services::{domain_hash, seller_key};
use crate::domain::value_objects::{DomainHash, Identity, SellerKey};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Every registered publisher is reachable through its own domain.
#[must_use]
pub fn check_domain_index_invariant(state: &RegistryState) -> Vec<InvariantViolation> {
    state
        .publishers()
        .values()
        .filter(|p| state.is_registered_publisher(&p.identity))
        .filter_map(|p| {
            let indexed = state.resolve_domain(&p.domain);
            (indexed != p.identity).then(|| InvariantViolation::DomainNotIndexed {
                publisher: p.identity,
                indexed,
            })
        })
        .collect()
}

/// No index entry survives for a domain not currently claimed.
#[must_use]
pub fn check_no_orphan_index_entries(state: &RegistryState) -> Vec<InvariantViolation> {
    state
        .domain_index()
        .iter()
        .filter(|(hash, identity)| {
            let claimed = state
                .publisher(identity)
                .is_some_and(|p| domain_hash(&p.domain) == **hash);
            !(claimed && state.is_registered_publisher(identity))
        })
        .map(|(hash, identity)| InvariantViolation::OrphanIndexEntry {
            domain_hash: *hash,
            identity: *identity,
        })
        .collect()
}

/// Every seller record sits under the key derived from its own fields.
#[must_use]
pub fn check_seller_keys_consistent(state: &RegistryState) -> Vec<InvariantViolation> {
    state
        .sellers()
        .iter()
        .flat_map(|(publisher, table)| {
            table.iter().filter_map(move |(key, record)| {
                (seller_key(&record.domain, &record.seller_id) != *key).then_some(
                    InvariantViolation::MisplacedSeller {
                        publisher: *publisher,
                        key: *key,
                    },
                )
            })
        })
        .collect()
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &RegistryState) -> InvariantCheckResult {
    let mut violations = check_domain_index_invariant(state);
    violations.extend(check_no_orphan_index_entries(state));
    violations.extend(check_seller_keys_consistent(state));

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the violations (empty if valid).
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(v) => v,
        }
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A registered publisher's domain resolves to someone else.
    DomainNotIndexed {
        /// The publisher whose domain is mis-indexed.
        publisher: Identity,
        /// What the index returns instead.
        indexed: Identity,
    },
    /// An index entry with no registered publisher claiming the domain.
    OrphanIndexEntry {
        /// The dangling key.
        domain_hash: DomainHash,
        /// The identity it points at.
        identity: Identity,
    },
    /// A seller record stored under the wrong key.
    MisplacedSeller {
        /// Owning publisher.
        publisher: Identity,
        /// Key the record was found under.
        key: SellerKey,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainNotIndexed { publisher, indexed } => {
                write!(f, "domain of {publisher} resolves to {indexed}")
            }
            Self::OrphanIndexEntry {
                domain_hash,
                identity,
            } => write!(f, "index entry {domain_hash} -> {identity} is not claimed"),
            Self::MisplacedSeller { publisher, key } => {
                write!(f, "seller {key} of {publisher} is stored under the wrong key")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
