//! # Seller Registry Node
//!
//! Hosts the registry service in-process and replays a ledger journal.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG` filter, `info` by default)
//! 2. Load configuration from the environment
//! 3. Validate that the administrator is not the sentinel identity
//! 4. Wire the event bus, the commit adapter and the service
//! 5. Start the event logger
//! 6. Replay the journal, if any, and print the summary as JSON
//!
//! ## Usage
//!
//! ```text
//! REGISTRY_ADMIN=0xad.. registry-node [journal.jsonl]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use registry_node::{load_config, read_journal, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let journal_arg = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(journal_arg).context("Invalid registry configuration")?;

    let runtime = NodeRuntime::new(&config);
    let logger = runtime.spawn_event_logger();

    match &config.journal {
        Some(path) => {
            let entries = read_journal(path)
                .with_context(|| format!("Failed to read journal {}", path.display()))?;
            info!(entries = entries.len(), path = %path.display(), "Replaying journal");

            let summary = runtime.replay(entries).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            let stats = runtime.service().stats().await;
            info!(
                applied = stats.applied,
                ignored = stats.ignored,
                rejected = stats.rejected(),
                "Replay complete"
            );
        }
        None => warn!("No journal given; nothing to replay"),
    }

    let violations = runtime.service().check_invariants();
    if !violations.is_valid() {
        for violation in violations.violations() {
            warn!(%violation, "Invariant violated");
        }
    }

    runtime.shutdown();
    logger.await?;

    let bus = runtime.bus().stats();
    info!(
        published = bus.total(),
        undelivered = bus.undelivered,
        "Event bus drained"
    );

    Ok(())
}
