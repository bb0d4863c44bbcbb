//! Application state.

use crate::auth::AuthState;
use pool_ledger_data::repositories::SnapshotRepository;
use pool_ledger_engine::PoolLedger;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// The ledger.
    pub ledger: Arc<PoolLedger>,
    /// API key table.
    pub auth: AuthState,
    /// Snapshot target, if persistence is enabled.
    pub snapshots: Option<Arc<SnapshotRepository>>,
    /// Serializes snapshot-then-save so an older image never lands last.
    persist_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Creates state without persistence.
    #[must_use]
    pub fn new(ledger: Arc<PoolLedger>, auth: AuthState) -> Self {
        Self {
            ledger,
            auth,
            snapshots: None,
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Enables snapshot persistence.
    #[must_use]
    pub fn with_snapshots(mut self, repository: Arc<SnapshotRepository>) -> Self {
        self.snapshots = Some(repository);
        self
    }

    /// Writes a snapshot after a committed mutation.
    ///
    /// The mutation already happened in memory, so a failed write is logged
    /// rather than reported to the caller.
    pub async fn persist(&self) {
        let Some(repository) = &self.snapshots else {
            return;
        };
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.ledger.snapshot().await;
        if let Err(err) = repository.save(&snapshot).await {
            error!(error = %err, path = %repository.path().display(), "Snapshot write failed");
        }
    }
}
