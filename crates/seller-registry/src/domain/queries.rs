//! # Query Surface
//!
//! Read-only operations, callable by anyone against any committed snapshot.
//! None of them signal "not found": absence is the sentinel identity or the
//! default seller record.

use crate::domain::entities::{RegistryState, SellerRecord};
use crate::domain::services::{domain_hash, seller_key};
use crate::domain::value_objects::Identity;

impl RegistryState {
    /// True iff a publisher record exists for `identity` and its stored
    /// identity is not the sentinel.
    #[must_use]
    pub fn is_registered_publisher(&self, identity: &Identity) -> bool {
        self.publisher(identity)
            .is_some_and(|p| !p.identity.is_sentinel())
    }

    /// True iff the domain index maps `hash(domain)` to a non-sentinel identity.
    #[must_use]
    pub fn is_registered_publisher_domain(&self, domain: &str) -> bool {
        !self.resolve_domain(domain).is_sentinel()
    }

    /// `DomainIndex[hash(domain)]`, or the sentinel if absent.
    #[must_use]
    pub fn resolve_domain(&self, domain: &str) -> Identity {
        self.domain_index()
            .get(&domain_hash(domain))
            .copied()
            .unwrap_or(Identity::SENTINEL)
    }

    /// `Sellers[identity][hash(seller_domain, seller_id)]`, or the default
    /// record if absent.
    #[must_use]
    pub fn get_seller_for_publisher(
        &self,
        identity: &Identity,
        seller_domain: &str,
        seller_id: &str,
    ) -> SellerRecord {
        let key = seller_key(seller_domain, seller_id);
        self.sellers()
            .get(identity)
            .and_then(|table| table.get(&key))
            .cloned()
            .unwrap_or_default()
    }

    /// Resolves the publisher through the domain index, then delegates to
    /// [`RegistryState::get_seller_for_publisher`]. An unknown domain
    /// resolves to the sentinel, which never owns records.
    #[must_use]
    pub fn get_seller_for_publisher_domain(
        &self,
        publisher_domain: &str,
        seller_domain: &str,
        seller_id: &str,
    ) -> SellerRecord {
        let identity = self.resolve_domain(publisher_domain);
        self.get_seller_for_publisher(&identity, seller_domain, seller_id)
    }
}
