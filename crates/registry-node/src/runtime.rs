//! # Node Runtime
//!
//! Owns the event bus and the registry service, and runs the background
//! event logger until shutdown.
//!
//! ```text
//! journal ──▶ RegistryEventHandler ──▶ RegistryService ──▶ InMemoryCommitter
//!                                            │
//!                                            ▼
//!                               BusNotificationSink ──▶ InMemoryEventBus ──▶ logger
//! ```

use crate::config::NodeConfig;
use crate::journal::{replay, JournalEntry, ReplaySummary};
use seller_registry::adapters::{BusNotificationSink, InMemoryCommitter, RegistryEventHandler};
use seller_registry::domain::entities::RegistryState;
use seller_registry::service::RegistryService;
use shared_bus::{EventFilter, InMemoryEventBus, RegistryEvent, SubscriptionError};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Concrete service type hosted by the node.
pub type NodeService = RegistryService<InMemoryCommitter, BusNotificationSink<InMemoryEventBus>>;

/// The registry node.
pub struct NodeRuntime {
    /// Shared event bus.
    bus: Arc<InMemoryEventBus>,
    /// Registry service.
    service: Arc<NodeService>,
    /// Request translator in front of the service.
    handler: RegistryEventHandler<NodeService>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Build the bus, the service and its adapters.
    pub fn new(config: &NodeConfig) -> Self {
        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
        let service = Arc::new(RegistryService::new(
            config.admin,
            InMemoryCommitter::new(),
            BusNotificationSink::new(Arc::clone(&bus)),
            config.service_config(),
        ));
        let handler = RegistryEventHandler::new(Arc::clone(&service));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            admin = %config.admin,
            compat = ?config.compat,
            enforce_sequence = config.enforce_sequence,
            "Registry node initialized"
        );

        Self {
            bus,
            service,
            handler,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Spawn the task that logs every bus event until shutdown.
    pub fn spawn_event_logger(&self) -> JoinHandle<()> {
        let mut subscription = self.bus.subscribe(EventFilter::all());
        let mut shutdown = self.shutdown_rx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    event = subscription.recv() => match event {
                        Ok(event) => log_event(&event),
                        // Already reported with the count; keep following the feed.
                        Err(SubscriptionError::Lagged { .. }) => {}
                        Err(SubscriptionError::Closed) => break,
                    },
                    _ = shutdown.changed() => {
                        loop {
                            match subscription.try_recv() {
                                Ok(Some(event)) => log_event(&event),
                                Err(SubscriptionError::Lagged { .. }) => {}
                                Ok(None) | Err(SubscriptionError::Closed) => break,
                            }
                        }
                        info!(missed = subscription.missed(), "Event logger shutting down");
                        break;
                    }
                }
            }
        })
    }

    /// Replay journal entries through the request handler.
    pub async fn replay(&self, entries: Vec<JournalEntry>) -> ReplaySummary {
        let service = Arc::clone(&self.service);
        replay(&self.handler, entries, move || service.snapshot()).await
    }

    /// Latest committed state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistryState> {
        self.service.snapshot()
    }

    /// The registry service.
    #[must_use]
    pub fn service(&self) -> Arc<NodeService> {
        Arc::clone(&self.service)
    }

    /// The event bus.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// Signal background tasks to stop.
    pub fn shutdown(&self) {
        info!("Initiating shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }
}

fn log_event(event: &RegistryEvent) {
    match event {
        RegistryEvent::Committed {
            sequence,
            state_version,
            notification,
        } => info!(
            ?sequence,
            state_version,
            event = notification.name(),
            publisher = %notification.publisher(),
            "Committed"
        ),
        RegistryEvent::Rejected {
            caller,
            sequence,
            reason,
        } => warn!(%caller, ?sequence, %reason, "Rejected"),
        RegistryEvent::CriticalError { error } => error!(%error, "Critical registry error"),
    }
}
