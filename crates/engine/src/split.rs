//! Percentage-split controller.
//!
//! The split is the share of a pool's tvl reserved for claim payouts. It only
//! moves by deltas; there is no setter.

use crate::access::{CallContext, Role};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::{EventData, LedgerEventType, SplitData};
use crate::store::LedgerContext;
use pool_ledger_domain::value_objects::{PoolId, SplitPercentage};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
enum Direction {
    Increase,
    Reduce,
}

/// Moves a pool's claim-reserve split.
pub struct SplitController {
    shared: Arc<LedgerContext>,
}

impl SplitController {
    /// Creates the controller over the shared context.
    #[must_use]
    pub fn new(shared: Arc<LedgerContext>) -> Self {
        Self { shared }
    }

    /// Raises the split by `delta` points.
    ///
    /// Fails with `InsufficientPoolFunds` when the attached covers would no
    /// longer fit in the capital left outside the reserve.
    pub async fn increase_percentage_split(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        delta: u64,
    ) -> LedgerResult<SplitPercentage> {
        self.apply(call, pool_id, delta, Direction::Increase).await
    }

    /// Lowers the split by `delta` points.
    pub async fn reduce_percentage_split(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        delta: u64,
    ) -> LedgerResult<SplitPercentage> {
        self.apply(call, pool_id, delta, Direction::Reduce).await
    }

    async fn apply(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        delta: u64,
        direction: Direction,
    ) -> LedgerResult<SplitPercentage> {
        self.shared.access.ensure(call, Role::CoverService).await?;
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        let current = entry.pool.percentage_split_balance;

        let next = match direction {
            Direction::Increase => current.increase(delta),
            Direction::Reduce => current.reduce(delta),
        }
        .ok_or_else(|| {
            debug!(
                pool_id = %pool_id,
                current = current.value(),
                delta = delta,
                ?direction,
                "Split change out of bounds"
            );
            LedgerError::OutOfBounds {
                current: current.value(),
                delta,
            }
        })?;
        // a larger reserve leaves less capital behind the attached covers
        if let Direction::Increase = direction {
            entry.ensure_cover_capacity(&entry.covers, entry.pool.tvl, next)?;
        }
        entry.pool.percentage_split_balance = next;
        drop(entry);

        info!(
            pool_id = %pool_id,
            old_split = current.value(),
            new_split = next.value(),
            "Percentage split changed"
        );
        self.shared
            .journal
            .record(
                LedgerEventType::SplitChanged,
                pool_id,
                self.shared.now(),
                EventData::Split(SplitData {
                    old_split: current.value(),
                    new_split: next.value(),
                }),
            )
            .await;
        Ok(next)
    }
}
