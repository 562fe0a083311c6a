//! # In-Memory Commit Adapter
//!
//! Stand-in for the host ledger's durable commit. Keeps the encoded form of
//! every committed head so tests can compare states byte for byte.

use crate::domain::entities::RegistryState;
use crate::errors::CommitError;
use crate::ports::outbound::StateCommitter;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A committed head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedHead {
    /// State version at commit time.
    pub version: u64,
    /// Deterministic encoding of the state.
    pub bytes: Vec<u8>,
}

/// In-memory implementation of [`StateCommitter`].
#[derive(Debug)]
pub struct InMemoryCommitter {
    history: Mutex<Vec<CommittedHead>>,
    available: AtomicBool,
}

impl InMemoryCommitter {
    /// Create an available committer with empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Most recent committed head.
    #[must_use]
    pub fn head(&self) -> Option<CommittedHead> {
        self.history.lock().last().cloned()
    }

    /// Number of commits accepted so far.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.history.lock().len()
    }
}

impl Default for InMemoryCommitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateCommitter for InMemoryCommitter {
    async fn commit(&self, state: &RegistryState) -> Result<(), CommitError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(CommitError::Unavailable);
        }
        let bytes = state
            .encode()
            .map_err(|e| CommitError::Rejected(e.to_string()))?;
        self.history.lock().push(CommittedHead {
            version: state.version(),
            bytes,
        });
        Ok(())
    }
}
