//! Pool registry: creation, parameter updates and deactivation.

use crate::access::{CallContext, Role};
use crate::accrual::settle_deposit;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::{EventData, LedgerEventType, PoolCreatedData, PoolUpdatedData};
use crate::store::{LedgerContext, PoolEntry};
use pool_ledger_domain::entities::Pool;
use pool_ledger_domain::enums::RiskType;
use pool_ledger_domain::value_objects::PoolId;
use std::sync::Arc;
use tracing::{debug, info};

/// Owns pool records.
pub struct PoolRegistry {
    shared: Arc<LedgerContext>,
}

impl PoolRegistry {
    /// Creates the registry over the shared context.
    #[must_use]
    pub fn new(shared: Arc<LedgerContext>) -> Self {
        Self { shared }
    }

    /// Creates an active, empty pool and returns its id. Owner only.
    pub async fn create_pool(
        &self,
        call: &CallContext,
        risk_type: RiskType,
        pool_name: &str,
        apy: u64,
        min_period: u64,
    ) -> LedgerResult<PoolId> {
        self.shared.access.ensure(call, Role::Owner).await?;
        let pool_name = pool_name.trim();
        if pool_name.is_empty() {
            debug!("Rejected pool with empty name");
            return Err(LedgerError::InvalidParameter(
                "pool name must not be empty".to_string(),
            ));
        }

        let now = self.shared.now();
        let pool_id = self
            .shared
            .store
            .insert_with(|id| {
                PoolEntry::new(Pool::new(id, pool_name, risk_type, apy, min_period, now))
            })
            .await;

        info!(
            pool_id = %pool_id,
            pool_name = pool_name,
            risk_type = %risk_type,
            apy = apy,
            min_period = min_period,
            "Pool created"
        );
        self.shared
            .journal
            .record(
                LedgerEventType::PoolCreated,
                pool_id,
                now,
                EventData::PoolCreated(PoolCreatedData {
                    pool_name: pool_name.to_string(),
                    risk_type,
                    apy,
                    min_period,
                }),
            )
            .await;
        Ok(pool_id)
    }

    /// Changes a pool's APY and minimum period. Owner only.
    ///
    /// Active deposits are settled at the old APY first, so the new rate only
    /// applies from now on. Existing expiry dates are not moved.
    pub async fn update_pool(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        apy: u64,
        min_period: u64,
    ) -> LedgerResult<()> {
        self.shared.access.ensure(call, Role::Owner).await?;
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        let now = self.shared.now();
        let old_apy = entry.pool.apy;
        let old_min_period = entry.pool.min_period;

        let mut settled = entry.pool.deposits.clone();
        let mut settled_count = 0;
        for deposit in settled.values_mut() {
            if settle_deposit(deposit, old_apy, now)?.days > 0 {
                settled_count += 1;
            }
        }

        entry.pool.deposits = settled;
        entry.pool.apy = apy;
        entry.pool.min_period = min_period;
        drop(entry);

        info!(
            pool_id = %pool_id,
            old_apy = old_apy,
            new_apy = apy,
            min_period = min_period,
            settled = settled_count,
            "Pool updated"
        );
        self.shared
            .journal
            .record(
                LedgerEventType::PoolUpdated,
                pool_id,
                now,
                EventData::PoolUpdated(PoolUpdatedData {
                    old_apy,
                    new_apy: apy,
                    old_min_period,
                    new_min_period: min_period,
                    settled_deposits: settled_count,
                }),
            )
            .await;
        Ok(())
    }

    /// Stops new deposits into a pool. Idempotent. Owner only.
    pub async fn deactivate_pool(&self, call: &CallContext, pool_id: PoolId) -> LedgerResult<()> {
        self.shared.access.ensure(call, Role::Owner).await?;
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        if !entry.pool.is_active {
            debug!(pool_id = %pool_id, "Pool already inactive");
            return Ok(());
        }
        entry.pool.is_active = false;
        drop(entry);

        info!(pool_id = %pool_id, "Pool deactivated");
        self.shared
            .journal
            .record(
                LedgerEventType::PoolDeactivated,
                pool_id,
                self.shared.now(),
                EventData::PoolDeactivated,
            )
            .await;
        Ok(())
    }

    /// Reads one pool.
    pub async fn get_pool(&self, pool_id: PoolId) -> LedgerResult<Pool> {
        let handle = self.shared.store.entry(pool_id).await?;
        let pool = handle.lock().await.pool.clone();
        Ok(pool)
    }

    /// Every pool in creation order.
    pub async fn get_all_pools(&self) -> Vec<(PoolId, Pool)> {
        let mut pools = Vec::new();
        for (id, handle) in self.shared.store.entries().await {
            pools.push((id, handle.lock().await.pool.clone()));
        }
        pools
    }

    /// Whether a pool accepts deposits.
    pub async fn pool_active(&self, pool_id: PoolId) -> LedgerResult<bool> {
        let handle = self.shared.store.entry(pool_id).await?;
        let active = handle.lock().await.pool.is_active;
        Ok(active)
    }
}
