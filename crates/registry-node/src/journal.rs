//! # Ledger Journal
//!
//! A journal is the host ledger's ordered log of registry calls, one
//! `LedgerEnvelope<RegistryCommand>` JSON object per line. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! {"sequence":1,"caller":"0xad..","payload":{"op":"register_publisher",...}}
//! {"sequence":2,"caller":"0x0a..","payload":{"op":"add_seller",...}}
//! ```

use seller_registry::adapters::RegistryEventHandler;
use seller_registry::domain::entities::RegistryState;
use seller_registry::events::RegistryCommand;
use seller_registry::ports::inbound::RegistryApi;
use serde::Serialize;
use shared_types::LedgerEnvelope;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// One journal line.
pub type JournalEntry = LedgerEnvelope<RegistryCommand>;

/// Journal read errors.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The journal could not be read.
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid envelope.
    #[error("journal line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse every envelope from a reader.
pub fn parse_journal<R: BufRead>(reader: R) -> Result<Vec<JournalEntry>, JournalError> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = serde_json::from_str(trimmed).map_err(|source| JournalError::Parse {
            line: index + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Open and parse a journal file.
pub fn read_journal(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let file = File::open(path)?;
    parse_journal(BufReader::new(file))
}

/// Outcome of a replay.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Envelopes submitted.
    pub submitted: usize,
    /// Envelopes that committed a change.
    pub applied: usize,
    /// Envelopes that completed without effect.
    pub ignored: usize,
    /// Envelopes that aborted.
    pub rejected: usize,
    /// State version after the replay.
    pub state_version: u64,
    /// Registered publishers after the replay.
    pub publishers: usize,
    /// Seller records after the replay, across all publishers.
    pub sellers: usize,
}

impl ReplaySummary {
    fn record_state(&mut self, state: &RegistryState) {
        self.state_version = state.version();
        self.publishers = state.publishers().len();
        self.sellers = state.sellers().values().map(|table| table.len()).sum();
    }
}

/// Submit every entry in order and tally the receipts.
pub async fn replay<T, F>(
    handler: &RegistryEventHandler<T>,
    entries: Vec<JournalEntry>,
    snapshot: F,
) -> ReplaySummary
where
    T: RegistryApi,
    F: Fn() -> std::sync::Arc<RegistryState>,
{
    let mut summary = ReplaySummary::default();

    for entry in entries {
        summary.submitted += 1;
        let receipt = handler.handle_envelope(entry).await;
        match (&receipt.error, receipt.applied) {
            (Some(reason), _) => {
                warn!(sequence = receipt.sequence, %reason, "Journal entry rejected");
                summary.rejected += 1;
            }
            (None, true) => summary.applied += 1,
            (None, false) => {
                debug!(sequence = receipt.sequence, "Journal entry ignored");
                summary.ignored += 1;
            }
        }
    }

    summary.record_state(&snapshot());
    summary
}
