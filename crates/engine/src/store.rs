//! Shared pool store.
//!
//! Pools live behind one table lock that is only held to look up, list or
//! insert entries. Each pool then has its own mutex, so mutations of one pool
//! run one at a time in arrival order while different pools proceed in
//! parallel.

use crate::access::{AccessConfig, AccessControl};
use crate::clock::Clock;
use crate::error::{Entity, LedgerError, LedgerResult};
use crate::journal::EventJournal;
use pool_ledger_domain::entities::{Cover, Pool};
use pool_ledger_domain::value_objects::{PoolId, ProposalId, SplitPercentage, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// A pool together with the covers it backs and the claims it has paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Pool record with its deposits.
    pub pool: Pool,
    /// Attached covers.
    #[serde(default)]
    pub covers: Vec<Cover>,
    /// Proposals already paid from this pool.
    #[serde(default)]
    pub settled_proposals: BTreeSet<ProposalId>,
}

impl PoolEntry {
    /// Wraps a fresh pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            covers: Vec::new(),
            settled_proposals: BTreeSet::new(),
        }
    }

    /// Sum of `capacity_amount` over attached covers.
    pub fn committed_cover_capacity(&self) -> LedgerResult<TokenAmount> {
        committed_capacity(&self.covers)
    }

    /// Amount the reserve can still pay out.
    ///
    /// The reserve (`tvl * split / 100`) less claims paid, accrued payouts
    /// withdrawn and committed cover capacity, saturating at zero.
    pub fn claim_headroom(&self) -> LedgerResult<TokenAmount> {
        let committed = self.committed_cover_capacity()?;
        Ok(self
            .pool
            .reserved_funds()
            .saturating_sub(self.pool.claims_paid)
            .saturating_sub(self.pool.accruals_paid)
            .saturating_sub(committed))
    }

    /// Fails with `InsufficientPoolFunds` unless `covers` fit in the capital
    /// left outside the reserve once tvl is `tvl` and the split is `split`.
    pub fn ensure_cover_capacity(
        &self,
        covers: &[Cover],
        tvl: TokenAmount,
        split: SplitPercentage,
    ) -> LedgerResult<()> {
        let requested = committed_capacity(covers)?;
        let available = tvl.saturating_sub(split.apply(tvl));
        if requested > available {
            debug!(
                pool_id = %self.pool.id,
                requested = %requested,
                available = %available,
                "Cover capacity exceeds pool capital"
            );
            return Err(LedgerError::InsufficientPoolFunds {
                requested,
                available,
            });
        }
        Ok(())
    }
}

fn committed_capacity(covers: &[Cover]) -> LedgerResult<TokenAmount> {
    TokenAmount::checked_sum(covers.iter().map(|c| c.capacity_amount)).ok_or(LedgerError::Overflow)
}

/// Serializable image of the whole store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Next pool id to hand out.
    pub next_pool_id: u64,
    /// Every pool in id order.
    pub pools: Vec<PoolEntry>,
    /// Role assignments at the time of the snapshot.
    #[serde(default)]
    pub access: Option<AccessConfig>,
}

#[derive(Debug, Default)]
struct Tables {
    next_pool_id: u64,
    pools: BTreeMap<PoolId, Arc<Mutex<PoolEntry>>>,
}

/// Process-wide pool store, created once at service start and shared by
/// every ledger component.
#[derive(Debug, Default)]
pub struct LedgerStore {
    tables: RwLock<Tables>,
}

impl LedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let highest = snapshot.pools.iter().map(|e| e.pool.id.0 + 1).max();
        let next_pool_id = snapshot.next_pool_id.max(highest.unwrap_or(0));
        let pools = snapshot
            .pools
            .into_iter()
            .map(|entry| (entry.pool.id, Arc::new(Mutex::new(entry))))
            .collect();
        Self {
            tables: RwLock::new(Tables {
                next_pool_id,
                pools,
            }),
        }
    }

    /// Allocates the next pool id and inserts the entry built for it.
    pub async fn insert_with<F>(&self, build: F) -> PoolId
    where
        F: FnOnce(PoolId) -> PoolEntry,
    {
        let mut tables = self.tables.write().await;
        let id = PoolId(tables.next_pool_id);
        tables.next_pool_id += 1;
        tables.pools.insert(id, Arc::new(Mutex::new(build(id))));
        id
    }

    /// Handle to one pool.
    pub async fn entry(&self, pool_id: PoolId) -> LedgerResult<Arc<Mutex<PoolEntry>>> {
        self.tables
            .read()
            .await
            .pools
            .get(&pool_id)
            .cloned()
            .ok_or(LedgerError::NotFound(Entity::Pool(pool_id)))
    }

    /// Handles to every pool in id order (which is creation order).
    pub async fn entries(&self) -> Vec<(PoolId, Arc<Mutex<PoolEntry>>)> {
        self.tables
            .read()
            .await
            .pools
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect()
    }

    /// Number of pools.
    pub async fn pool_count(&self) -> usize {
        self.tables.read().await.pools.len()
    }

    /// Copies the store. Each pool is captured under its own lock.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let next_pool_id = self.tables.read().await.next_pool_id;
        let mut pools = Vec::new();
        for (_, entry) in self.entries().await {
            pools.push(entry.lock().await.clone());
        }
        LedgerSnapshot {
            next_pool_id,
            pools,
            access: None,
        }
    }
}

/// Everything a ledger component needs, passed explicitly at construction.
pub struct LedgerContext {
    /// Pool store.
    pub store: Arc<LedgerStore>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Role gates.
    pub access: Arc<AccessControl>,
    /// Event journal.
    pub journal: Arc<EventJournal>,
}

impl LedgerContext {
    /// Bundles the shared services.
    #[must_use]
    pub fn new(store: Arc<LedgerStore>, clock: Arc<dyn Clock>, access: Arc<AccessControl>) -> Self {
        Self {
            store,
            clock,
            access,
            journal: Arc::new(EventJournal::new()),
        }
    }

    /// Current ledger time.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }
}
