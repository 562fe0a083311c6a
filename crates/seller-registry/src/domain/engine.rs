//! # Registry Engine
//!
//! The pure state-transition function. Every mutating operation takes the
//! caller explicitly and either aborts with no effect or applies its change
//! and returns the notification to emit.
//!
//! ```text
//! (state, caller, command) ──▶ Ok(Applied(notification)) | Ok(Ignored) | Err(abort)
//! ```
//!
//! All checks run before the first write, so an `Err` leaves the state
//! untouched without any rollback.

use crate::domain::entities::{
    Publisher, RegistryConfig, RegistryState, SellerPolicy, SellerRecord, Transition,
};
use crate::domain::services::{domain_hash, seller_key};
use crate::domain::value_objects::{Identity, Relationship};
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use shared_types::RegistryNotification;
use tracing::debug;

// =============================================================================
// COMMANDS
// =============================================================================

/// A mutating call, as sequenced by the host ledger.
///
/// The caller is not part of the command; it travels alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryCommand {
    /// Administrator upserts a publisher.
    RegisterPublisher {
        identity: Identity,
        domain: String,
        name: String,
    },
    /// Administrator removes a publisher.
    DeregisterPublisher { identity: Identity },
    /// A publisher authorizes a seller.
    AddSeller {
        seller_domain: String,
        seller_id: String,
        #[serde(default)]
        relationship: Relationship,
        #[serde(default)]
        tag_id: String,
    },
    /// A publisher revokes a seller.
    RemoveSeller {
        seller_domain: String,
        seller_id: String,
    },
}

impl RegistryCommand {
    /// Returns true for commands reserved to the administrator.
    #[must_use]
    pub fn is_administrative(&self) -> bool {
        matches!(
            self,
            Self::RegisterPublisher { .. } | Self::DeregisterPublisher { .. }
        )
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// The registry state machine: configuration plus owned state.
#[derive(Clone, Debug)]
pub struct RegistryEngine {
    config: RegistryConfig,
    state: RegistryState,
}

impl RegistryEngine {
    /// A fresh registry whose administrator is its creator.
    #[must_use]
    pub fn new(administrator: Identity, config: RegistryConfig) -> Self {
        Self::from_state(config, RegistryState::new(administrator))
    }

    /// Continue from a state this crate produced (a service snapshot or a
    /// checked restore).
    #[must_use]
    pub(crate) fn from_state(config: RegistryConfig, state: RegistryState) -> Self {
        Self { config, state }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Consumes the engine, returning its state.
    #[must_use]
    pub fn into_state(self) -> RegistryState {
        self.state
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Dispatch a command on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Any abort raised by the individual operation.
    pub fn apply(
        &mut self,
        caller: Identity,
        command: RegistryCommand,
    ) -> Result<Transition, RegistryError> {
        match command {
            RegistryCommand::RegisterPublisher {
                identity,
                domain,
                name,
            } => self.register_publisher(caller, identity, domain, name),
            RegistryCommand::DeregisterPublisher { identity } => {
                self.deregister_publisher(caller, identity)
            }
            RegistryCommand::AddSeller {
                seller_domain,
                seller_id,
                relationship,
                tag_id,
            } => self.add_seller(caller, seller_domain, seller_id, relationship, tag_id),
            RegistryCommand::RemoveSeller {
                seller_domain,
                seller_id,
            } => self.remove_seller(caller, &seller_domain, &seller_id),
        }
    }

    // -------------------------------------------------------------------------
    // Publisher table (administrator only)
    // -------------------------------------------------------------------------

    /// Upsert `Publishers[identity]` and point `hash(domain)` at it.
    ///
    /// # Errors
    ///
    /// - `NotAdministrator` if `caller` is not the administrator
    /// - `InvalidPublisher` for a sentinel target or empty domain (validated mode)
    /// - `DomainClaimed` if another registered publisher holds the domain
    ///   (exclusive mode)
    pub fn register_publisher(
        &mut self,
        caller: Identity,
        identity: Identity,
        domain: String,
        name: String,
    ) -> Result<Transition, RegistryError> {
        self.ensure_administrator(caller)?;

        if self.config.validate_inputs {
            if identity.is_sentinel() {
                return Err(RegistryError::InvalidPublisher {
                    reason: "sentinel identity cannot be registered".into(),
                });
            }
            if domain.is_empty() {
                return Err(RegistryError::InvalidPublisher {
                    reason: "domain is empty".into(),
                });
            }
        }

        let hash = domain_hash(&domain);

        if self.config.exclusive_domains {
            let owner = self.state.resolve_domain(&domain);
            let still_claimed = self
                .state
                .publisher(&owner)
                .is_some_and(|p| p.domain == domain);
            if owner != identity && still_claimed && self.state.is_registered_publisher(&owner) {
                return Err(RegistryError::DomainClaimed { domain, owner });
            }
        }

        if self.config.reindex_on_domain_change {
            let previous = self
                .state
                .publisher(&identity)
                .filter(|p| p.domain != domain)
                .map(|p| domain_hash(&p.domain));
            if let Some(old) = previous {
                if self.state.domain_index().get(&old) == Some(&identity) {
                    self.state.unindex_domain(&old);
                    debug!(publisher = %identity, "Dropped previous domain mapping");
                }
            }
        }

        self.state.upsert_publisher(Publisher {
            identity,
            domain,
            name,
        });
        self.state.index_domain(hash, identity);
        self.state.bump_version();

        Ok(Transition::Applied(
            RegistryNotification::PublisherRegistered { identity },
        ))
    }

    /// Remove `Publishers[identity]` and its domain-index entry.
    ///
    /// Deregistering an absent identity is an idempotent no-op that still
    /// emits `PublisherDeregistered`.
    ///
    /// # Errors
    ///
    /// `NotAdministrator` if `caller` is not the administrator.
    pub fn deregister_publisher(
        &mut self,
        caller: Identity,
        identity: Identity,
    ) -> Result<Transition, RegistryError> {
        self.ensure_administrator(caller)?;

        // An absent publisher reads as the default record, whose domain is "".
        let domain = self
            .state
            .publisher(&identity)
            .map(|p| p.domain.clone())
            .unwrap_or_default();
        let hash = domain_hash(&domain);

        let owns_entry = self.state.domain_index().get(&hash) == Some(&identity);
        if owns_entry || !self.config.guard_domain_index {
            self.state.unindex_domain(&hash);
        }
        self.state.remove_publisher(&identity);
        self.state.bump_version();

        Ok(Transition::Applied(
            RegistryNotification::PublisherDeregistered { identity },
        ))
    }

    // -------------------------------------------------------------------------
    // Seller table (owning publisher only)
    // -------------------------------------------------------------------------

    /// Upsert `Sellers[caller][hash(seller_domain, seller_id)]`.
    ///
    /// # Errors
    ///
    /// - `PublisherNotRegistered` for an unregistered caller under
    ///   `SellerPolicy::Reject` (under `Ignore` the call returns `Ignored`)
    /// - `InvalidSeller` for an empty domain or id (validated mode)
    pub fn add_seller(
        &mut self,
        caller: Identity,
        seller_domain: String,
        seller_id: String,
        relationship: Relationship,
        tag_id: String,
    ) -> Result<Transition, RegistryError> {
        if let Some(outcome) = self.gate_seller_mutation(caller)? {
            return Ok(outcome);
        }

        if self.config.validate_inputs {
            if seller_domain.is_empty() {
                return Err(RegistryError::InvalidSeller {
                    reason: "seller domain is empty".into(),
                });
            }
            if seller_id.is_empty() {
                return Err(RegistryError::InvalidSeller {
                    reason: "seller id is empty".into(),
                });
            }
        }

        let key = seller_key(&seller_domain, &seller_id);
        self.state.upsert_seller(
            caller,
            key,
            SellerRecord {
                domain: seller_domain,
                seller_id,
                relationship,
                tag_id,
            },
        );
        self.state.bump_version();

        Ok(Transition::Applied(RegistryNotification::SellerAdded {
            publisher: caller,
            seller_key: key,
        }))
    }

    /// Delete `Sellers[caller][hash(seller_domain, seller_id)]`.
    ///
    /// Removing an absent record still emits `SellerRemoved`.
    ///
    /// # Errors
    ///
    /// `PublisherNotRegistered` for an unregistered caller under
    /// `SellerPolicy::Reject`.
    pub fn remove_seller(
        &mut self,
        caller: Identity,
        seller_domain: &str,
        seller_id: &str,
    ) -> Result<Transition, RegistryError> {
        if let Some(outcome) = self.gate_seller_mutation(caller)? {
            return Ok(outcome);
        }

        let key = seller_key(seller_domain, seller_id);
        self.state.remove_seller(&caller, &key);
        self.state.bump_version();

        Ok(Transition::Applied(RegistryNotification::SellerRemoved {
            publisher: caller,
            seller_key: key,
        }))
    }

    // -------------------------------------------------------------------------
    // Guards
    // -------------------------------------------------------------------------

    fn ensure_administrator(&self, caller: Identity) -> Result<(), RegistryError> {
        if caller == self.state.administrator() {
            Ok(())
        } else {
            Err(RegistryError::NotAdministrator { caller })
        }
    }

    /// `Ok(None)` lets the mutation proceed; `Ok(Some(Ignored))` is the
    /// legacy silent no-op.
    fn gate_seller_mutation(&self, caller: Identity) -> Result<Option<Transition>, RegistryError> {
        if self.state.is_registered_publisher(&caller) {
            return Ok(None);
        }
        match self.config.unregistered_seller_policy {
            SellerPolicy::Reject => Err(RegistryError::PublisherNotRegistered { caller }),
            SellerPolicy::Ignore => {
                debug!(caller = %caller, "Ignoring seller mutation from unregistered caller");
                Ok(Some(Transition::Ignored))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
