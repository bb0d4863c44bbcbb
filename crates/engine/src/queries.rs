//! Read-only projections across pools.

use crate::error::LedgerResult;
use crate::store::LedgerContext;
use pool_ledger_domain::entities::PoolInfo;
use pool_ledger_domain::value_objects::{PoolId, Principal, TokenAmount};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Cross-pool queries.
pub struct QueryFacade {
    shared: Arc<LedgerContext>,
}

impl QueryFacade {
    /// Creates the façade over the shared context.
    #[must_use]
    pub fn new(shared: Arc<LedgerContext>) -> Self {
        Self { shared }
    }

    /// Every principal holding a deposit record in any pool, sorted.
    pub async fn get_all_participants(&self) -> Vec<Principal> {
        let mut participants = BTreeSet::new();
        for (_, handle) in self.shared.store.entries().await {
            let entry = handle.lock().await;
            participants.extend(entry.pool.deposits.keys().cloned());
        }
        participants.into_iter().collect()
    }

    /// Pool tvl.
    pub async fn get_pool_tvl(&self, pool_id: PoolId) -> LedgerResult<TokenAmount> {
        let handle = self.shared.store.entry(pool_id).await?;
        let tvl = handle.lock().await.pool.tvl;
        Ok(tvl)
    }

    /// Sum of `lp`'s deposit amounts across all pools, zero for strangers.
    pub async fn get_user_participation(&self, lp: &Principal) -> TokenAmount {
        let mut total = TokenAmount::zero();
        for (_, handle) in self.shared.store.entries().await {
            let entry = handle.lock().await;
            if let Some(deposit) = entry.pool.deposits.get(lp) {
                total = total.saturating_add(deposit.amount);
            }
        }
        total
    }

    /// One [`PoolInfo`] per pool `lp` has a deposit record in, in pool order.
    pub async fn get_pools_by_address(&self, lp: &Principal) -> Vec<PoolInfo> {
        let now = self.shared.now();
        let mut infos = Vec::new();
        for (_, handle) in self.shared.store.entries().await {
            let entry = handle.lock().await;
            if let Some(deposit) = entry.pool.deposits.get(lp) {
                infos.push(entry.pool.info_for(deposit, now));
            }
        }
        infos
    }
}
