//! # Event Handler Adapter
//!
//! Translates host-ledger requests into registry API calls.
//!
//! - Mutations arrive as `LedgerEnvelope<RegistryCommand>` and leave as a
//!   `TransitionReceipt` (aborts become receipts, not transport errors)
//! - Seller lookups answer in interchange form (relationship ordinal)

use crate::events::{
    PublisherRef, RegistryCommand, SellerLookupRequest, SellerLookupResponse, TransitionReceipt,
};
use crate::ports::inbound::RegistryApi;
use shared_types::LedgerEnvelope;
use std::sync::Arc;

/// Event handler for registry requests.
pub struct RegistryEventHandler<T: RegistryApi> {
    /// The registry API implementation.
    api: Arc<T>,
}

impl<T: RegistryApi> RegistryEventHandler<T> {
    /// Create a new event handler.
    pub fn new(api: Arc<T>) -> Self {
        Self { api }
    }

    /// Handle a ledger-sequenced mutation.
    pub async fn handle_envelope(
        &self,
        envelope: LedgerEnvelope<RegistryCommand>,
    ) -> TransitionReceipt {
        let correlation_id = envelope.correlation_id;
        let sequence = envelope.sequence;

        match self.api.submit(envelope).await {
            Ok(transition) => TransitionReceipt::completed(correlation_id, sequence, &transition),
            Err(e) => TransitionReceipt::rejected(correlation_id, sequence, e),
        }
    }

    /// Handle a seller lookup.
    pub fn handle_lookup(&self, request: &SellerLookupRequest) -> SellerLookupResponse {
        let record = match &request.publisher {
            PublisherRef::Identity(identity) => self.api.get_seller_for_publisher(
                identity,
                &request.seller_domain,
                &request.seller_id,
            ),
            PublisherRef::Domain(domain) => self.api.get_seller_for_publisher_domain(
                domain,
                &request.seller_domain,
                &request.seller_id,
            ),
        };
        SellerLookupResponse {
            record: record.to_interchange(),
        }
    }
}
