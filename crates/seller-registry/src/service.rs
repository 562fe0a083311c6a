//! # Seller Registry Service
//!
//! Wires the pure engine to the host ledger's ports.
//!
//! ## Concurrency
//!
//! - Readers load an `Arc<RegistryState>` snapshot and never block a writer
//!   for longer than a pointer swap.
//! - Mutations are serialized by a single writer lock, in ledger order.
//! - A transition becomes visible only after `StateCommitter::commit`
//!   returns `Ok`; notifications go out after the swap.
//!
//! ```text
//! submit ─▶ [writer lock] ─▶ sequence guard ─▶ engine.apply(clone)
//!                                                   │
//!                          commit ◀─────────────────┘
//!                            │ ok
//!                            ▼
//!                      swap snapshot ─▶ publish Committed
//! ```

use crate::domain::engine::{RegistryCommand, RegistryEngine};
use crate::domain::entities::{RegistryConfig, RegistryState, SellerRecord, Transition};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::value_objects::{Identity, Relationship};
use crate::errors::{RegistryError, RestoreError, ServiceError};
use crate::ports::inbound::RegistryApi;
use crate::ports::outbound::{NotificationSink, StateCommitter};

use async_trait::async_trait;
use parking_lot::RwLock as SnapshotLock;
use shared_bus::RegistryEvent;
use shared_types::LedgerEnvelope;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

/// Registry service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Engine behaviour switches.
    pub registry: RegistryConfig,
    /// Reject envelopes whose sequence does not strictly increase.
    pub enforce_sequence: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            enforce_sequence: true,
        }
    }
}

impl ServiceConfig {
    /// Legacy engine behaviour, sequence guard still on.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            registry: RegistryConfig::legacy(),
            ..Self::default()
        }
    }
}

/// Statistics for the registry service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Transitions committed.
    pub applied: u64,
    /// Silent no-ops (legacy seller policy).
    pub ignored: u64,
    /// Aborts for a caller lacking the required role.
    pub rejected_permission: u64,
    /// Aborts for a domain held by another publisher.
    pub rejected_policy: u64,
    /// Aborts for unusable arguments or envelope version.
    pub rejected_validation: u64,
    /// Envelopes refused by the sequence guard.
    pub rejected_sequence: u64,
    /// Transitions discarded because the commit failed.
    pub commit_failures: u64,
}

impl ServiceStats {
    /// Total aborted calls, commit failures included.
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected_permission
            + self.rejected_policy
            + self.rejected_validation
            + self.rejected_sequence
            + self.commit_failures
    }
}

/// Writer-side bookkeeping, guarded by the writer lock.
#[derive(Debug, Default)]
struct WriterState {
    last_sequence: Option<u64>,
}

/// The registry service.
///
/// This service:
/// 1. Serializes mutations and checks their ledger sequence
/// 2. Runs the engine against a private copy of the current head
/// 3. Commits, swaps the head and publishes the notification
/// 4. Answers queries from the latest committed snapshot
pub struct RegistryService<C: StateCommitter, N: NotificationSink> {
    /// Service configuration.
    config: ServiceConfig,
    /// Latest committed state.
    head: SnapshotLock<Arc<RegistryState>>,
    /// Single-writer lock.
    writer: Mutex<WriterState>,
    /// Durable commit adapter.
    committer: Arc<C>,
    /// Outbound notifications.
    sink: Arc<N>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<C: StateCommitter, N: NotificationSink> RegistryService<C, N> {
    /// Create a service over a fresh registry owned by `administrator`.
    pub fn new(administrator: Identity, committer: C, sink: N, config: ServiceConfig) -> Self {
        Self::with_state(RegistryState::new(administrator), committer, sink, config)
    }

    /// Resume from a committed head, as produced by [`RegistryState::encode`].
    ///
    /// The head is checked with [`RegistryState::restore`] under the
    /// service's registry configuration before it becomes visible.
    pub fn resume(
        head: &[u8],
        committer: C,
        sink: N,
        config: ServiceConfig,
    ) -> Result<Self, RestoreError> {
        let state = RegistryState::restore(head, &config.registry)?;
        info!(
            version = state.version(),
            publishers = state.publishers().len(),
            "Resuming registry from committed head"
        );
        Ok(Self::with_state(state, committer, sink, config))
    }

    fn with_state(state: RegistryState, committer: C, sink: N, config: ServiceConfig) -> Self {
        Self {
            config,
            head: SnapshotLock::new(Arc::new(state)),
            writer: Mutex::new(WriterState::default()),
            committer: Arc::new(committer),
            sink: Arc::new(sink),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// The latest committed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistryState> {
        self.head.read().clone()
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The commit adapter.
    #[must_use]
    pub fn committer(&self) -> &Arc<C> {
        &self.committer
    }

    /// The notification adapter.
    #[must_use]
    pub fn sink(&self) -> &Arc<N> {
        &self.sink
    }

    /// Highest sequence accepted so far.
    pub async fn last_sequence(&self) -> Option<u64> {
        self.writer.lock().await.last_sequence
    }

    /// Run the structural invariant checks against the current snapshot.
    #[must_use]
    pub fn check_invariants(&self) -> InvariantCheckResult {
        check_all_invariants(&self.snapshot())
    }

    /// Apply a command on behalf of `caller` without a ledger sequence.
    ///
    /// # Errors
    ///
    /// Engine aborts and commit failures.
    pub async fn execute(
        &self,
        caller: Identity,
        command: RegistryCommand,
    ) -> Result<Transition, ServiceError> {
        self.run(caller, None, command).await
    }

    /// Serialized mutation path.
    async fn run(
        &self,
        caller: Identity,
        sequence: Option<u64>,
        command: RegistryCommand,
    ) -> Result<Transition, ServiceError> {
        let mut writer = self.writer.lock().await;

        if let (true, Some(received), Some(last)) =
            (self.config.enforce_sequence, sequence, writer.last_sequence)
        {
            if received <= last {
                let err = ServiceError::StaleSequence { received, last };
                warn!(caller = %caller, received, last, "Stale envelope refused");
                self.stats.write().await.rejected_sequence += 1;
                self.reject(caller, sequence, &err).await;
                return Err(err);
            }
        }

        let base = self.snapshot();
        let mut engine =
            RegistryEngine::from_state(self.config.registry.clone(), RegistryState::clone(&base));

        let outcome = engine.apply(caller, command);

        // An aborted call still consumes its slot in the ledger order.
        let previous = writer.last_sequence;
        if sequence.is_some() {
            writer.last_sequence = sequence.max(previous);
        }

        let notification = match outcome {
            Ok(Transition::Applied(notification)) => notification,
            Ok(Transition::Ignored) => {
                debug!(caller = %caller, "Transition ignored");
                self.stats.write().await.ignored += 1;
                return Ok(Transition::Ignored);
            }
            Err(e) => {
                warn!(caller = %caller, error = %e, "Registry call aborted");
                self.record_abort(&e).await;
                let err = ServiceError::from(e);
                self.reject(caller, sequence, &err).await;
                return Err(err);
            }
        };

        let next = engine.into_state();
        if let Err(e) = self.committer.commit(&next).await {
            error!(error = %e, version = next.version(), "Commit failed, transition discarded");
            // The sequence is not consumed: the ledger may retry it.
            writer.last_sequence = previous;
            self.stats.write().await.commit_failures += 1;
            self.sink
                .publish(RegistryEvent::CriticalError {
                    error: e.to_string(),
                })
                .await;
            return Err(e.into());
        }

        let state_version = next.version();
        *self.head.write() = Arc::new(next);
        self.stats.write().await.applied += 1;

        info!(
            event = notification.name(),
            publisher = %notification.publisher(),
            state_version,
            "Registry transition committed"
        );

        self.sink
            .publish(RegistryEvent::Committed {
                sequence,
                state_version,
                notification,
            })
            .await;

        Ok(Transition::Applied(notification))
    }

    async fn record_abort(&self, error: &RegistryError) {
        let mut stats = self.stats.write().await;
        match error {
            e if e.is_permission_error() => stats.rejected_permission += 1,
            RegistryError::DomainClaimed { .. } => stats.rejected_policy += 1,
            _ => stats.rejected_validation += 1,
        }
    }

    async fn reject(&self, caller: Identity, sequence: Option<u64>, error: &ServiceError) {
        self.sink
            .publish(RegistryEvent::Rejected {
                caller,
                sequence,
                reason: error.to_string(),
            })
            .await;
    }
}

#[async_trait]
impl<C: StateCommitter, N: NotificationSink> RegistryApi for RegistryService<C, N> {
    #[instrument(skip(self, name))]
    async fn register_publisher(
        &self,
        caller: Identity,
        identity: Identity,
        domain: String,
        name: String,
    ) -> Result<Transition, ServiceError> {
        self.run(
            caller,
            None,
            RegistryCommand::RegisterPublisher {
                identity,
                domain,
                name,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn deregister_publisher(
        &self,
        caller: Identity,
        identity: Identity,
    ) -> Result<Transition, ServiceError> {
        self.run(caller, None, RegistryCommand::DeregisterPublisher { identity })
            .await
    }

    #[instrument(skip(self, tag_id))]
    async fn add_seller(
        &self,
        caller: Identity,
        seller_domain: String,
        seller_id: String,
        relationship: Relationship,
        tag_id: String,
    ) -> Result<Transition, ServiceError> {
        self.run(
            caller,
            None,
            RegistryCommand::AddSeller {
                seller_domain,
                seller_id,
                relationship,
                tag_id,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_seller(
        &self,
        caller: Identity,
        seller_domain: String,
        seller_id: String,
    ) -> Result<Transition, ServiceError> {
        self.run(
            caller,
            None,
            RegistryCommand::RemoveSeller {
                seller_domain,
                seller_id,
            },
        )
        .await
    }

    #[instrument(
        skip(self, envelope),
        fields(
            correlation_id = %envelope.correlation_id,
            sequence = envelope.sequence,
            caller = %envelope.caller,
        )
    )]
    async fn submit(
        &self,
        envelope: LedgerEnvelope<RegistryCommand>,
    ) -> Result<Transition, ServiceError> {
        if !envelope.is_supported_version() {
            let err = ServiceError::UnsupportedVersion {
                received: envelope.version,
                supported: LedgerEnvelope::<RegistryCommand>::CURRENT_VERSION,
            };
            warn!(version = envelope.version, "Unsupported envelope version");
            self.stats.write().await.rejected_validation += 1;
            self.reject(envelope.caller, Some(envelope.sequence), &err)
                .await;
            return Err(err);
        }

        self.run(envelope.caller, Some(envelope.sequence), envelope.payload)
            .await
    }

    fn is_registered_publisher(&self, identity: &Identity) -> bool {
        self.snapshot().is_registered_publisher(identity)
    }

    fn is_registered_publisher_domain(&self, domain: &str) -> bool {
        self.snapshot().is_registered_publisher_domain(domain)
    }

    fn get_seller_for_publisher(
        &self,
        identity: &Identity,
        seller_domain: &str,
        seller_id: &str,
    ) -> SellerRecord {
        self.snapshot()
            .get_seller_for_publisher(identity, seller_domain, seller_id)
    }

    fn get_seller_for_publisher_domain(
        &self,
        publisher_domain: &str,
        seller_domain: &str,
        seller_id: &str,
    ) -> SellerRecord {
        self.snapshot()
            .get_seller_for_publisher_domain(publisher_domain, seller_domain, seller_id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
