//! In-memory event journal.

use super::{EventData, LedgerEvent, LedgerEventType};
use pool_ledger_domain::value_objects::PoolId;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;

/// Events kept per pool before the oldest are dropped.
pub const DEFAULT_EVENTS_PER_POOL: usize = 1024;

/// Append-only journal of ledger events, grouped by pool.
///
/// Each pool keeps its most recent events only; the snapshot, not the
/// journal, is the durable record.
#[derive(Debug)]
pub struct EventJournal {
    events: RwLock<HashMap<PoolId, VecDeque<LedgerEvent>>>,
    per_pool: usize,
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENTS_PER_POOL)
    }
}

impl EventJournal {
    /// Creates an empty journal with the default per-pool capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty journal keeping at most `per_pool` events per pool.
    #[must_use]
    pub fn with_capacity(per_pool: usize) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            per_pool: per_pool.max(1),
        }
    }

    /// Appends an event, evicting the pool's oldest one when full.
    pub async fn record(
        &self,
        event_type: LedgerEventType,
        pool_id: PoolId,
        at: u64,
        data: EventData,
    ) {
        let event = LedgerEvent::new(event_type, pool_id, at, data);
        debug!(pool_id = %pool_id, event_type = ?event_type, event_id = %event.id, "Journal event");
        let mut events = self.events.write().await;
        let pool_events = events.entry(pool_id).or_default();
        if pool_events.len() == self.per_pool {
            pool_events.pop_front();
        }
        pool_events.push_back(event);
    }

    /// Events for a pool, oldest first.
    pub async fn events(&self, pool_id: PoolId) -> Vec<LedgerEvent> {
        self.events
            .read()
            .await
            .get(&pool_id)
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }
}
