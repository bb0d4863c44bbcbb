//! Covers backed by a pool's capital.

use crate::access::{CallContext, Role};
use crate::error::{Entity, LedgerError, LedgerResult};
use crate::journal::{CoverData, EventData, LedgerEventType};
use crate::store::{LedgerContext, PoolEntry};
use pool_ledger_domain::entities::Cover;
use pool_ledger_domain::value_objects::PoolId;
use std::sync::Arc;
use tracing::info;

/// Attaches covers to pools and keeps their capacity within the pool's
/// non-reserved capital.
pub struct CoverBook {
    shared: Arc<LedgerContext>,
}

impl CoverBook {
    /// Creates the book over the shared context.
    #[must_use]
    pub fn new(shared: Arc<LedgerContext>) -> Self {
        Self { shared }
    }

    /// Attaches a new cover to `pool_id`.
    pub async fn add_pool_cover(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        cover: Cover,
    ) -> LedgerResult<()> {
        self.shared.access.ensure(call, Role::CoverService).await?;
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        check_scope(pool_id, &cover)?;
        if entry.covers.iter().any(|c| c.id == cover.id) {
            return Err(LedgerError::InvalidParameter(format!(
                "cover {} is already attached to pool {}",
                cover.id, pool_id
            )));
        }

        let mut covers = entry.covers.clone();
        covers.push(cover.clone());
        check_capacity(&entry, &covers)?;
        entry.covers = covers;
        drop(entry);

        self.committed(pool_id, &cover, false).await;
        Ok(())
    }

    /// Replaces the attached cover with the same id.
    pub async fn update_pool_cover(
        &self,
        call: &CallContext,
        pool_id: PoolId,
        cover: Cover,
    ) -> LedgerResult<()> {
        self.shared.access.ensure(call, Role::CoverService).await?;
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;
        check_scope(pool_id, &cover)?;

        let mut covers = entry.covers.clone();
        let slot = covers
            .iter_mut()
            .find(|c| c.id == cover.id)
            .ok_or(LedgerError::NotFound(Entity::Cover {
                pool_id,
                cover_id: cover.id,
            }))?;
        *slot = cover.clone();
        check_capacity(&entry, &covers)?;
        entry.covers = covers;
        drop(entry);

        self.committed(pool_id, &cover, true).await;
        Ok(())
    }

    /// Covers attached to `pool_id`, in attachment order.
    pub async fn get_pool_covers(&self, pool_id: PoolId) -> LedgerResult<Vec<Cover>> {
        let handle = self.shared.store.entry(pool_id).await?;
        let covers = handle.lock().await.covers.clone();
        Ok(covers)
    }

    async fn committed(&self, pool_id: PoolId, cover: &Cover, replaced: bool) {
        info!(
            pool_id = %pool_id,
            cover_id = %cover.id,
            capacity_amount = %cover.capacity_amount,
            replaced = replaced,
            "Cover committed"
        );
        self.shared
            .journal
            .record(
                LedgerEventType::CoverChanged,
                pool_id,
                self.shared.now(),
                EventData::Cover(CoverData {
                    cover_id: cover.id,
                    capacity_amount: cover.capacity_amount,
                    replaced,
                }),
            )
            .await;
    }
}

fn check_scope(pool_id: PoolId, cover: &Cover) -> LedgerResult<()> {
    if cover.pool_id != pool_id {
        return Err(LedgerError::InvalidParameter(format!(
            "cover {} belongs to pool {}, not {}",
            cover.id, cover.pool_id, pool_id
        )));
    }
    Ok(())
}

/// Committed capacity must fit in `tvl - reserved`.
fn check_capacity(entry: &PoolEntry, covers: &[Cover]) -> LedgerResult<()> {
    entry.ensure_cover_capacity(covers, entry.pool.tvl, entry.pool.percentage_split_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessConfig, AccessControl};
    use crate::clock::ManualClock;
    use crate::store::LedgerStore;
    use pool_ledger_domain::entities::Pool;
    use pool_ledger_domain::enums::RiskType;
    use pool_ledger_domain::value_objects::{CoverId, Principal, SplitPercentage, TokenAmount};

    async fn book_with_pool(tvl: u64, split: u64) -> (CoverBook, PoolId) {
        let mut config = AccessConfig::with_owner(Principal::from("owner"));
        config.cover_service = Some(Principal::from("covers"));
        let shared = Arc::new(LedgerContext::new(
            Arc::new(LedgerStore::new()),
            Arc::new(ManualClock::new(0)),
            Arc::new(AccessControl::new(config)),
        ));
        let pool_id = shared
            .store
            .insert_with(|id| {
                let mut pool = Pool::new(id, "P", RiskType::SmartContract, 10, 30, 0);
                pool.tvl = TokenAmount::from(tvl);
                pool.percentage_split_balance = SplitPercentage::new(split).unwrap();
                PoolEntry::new(pool)
            })
            .await;
        (CoverBook::new(shared), pool_id)
    }

    fn cover(id: u64, pool_id: PoolId, capacity_amount: u64) -> Cover {
        Cover {
            id: CoverId(id),
            pool_id,
            cover_name: format!("cover-{}", id),
            cid: String::new(),
            risk_type: RiskType::SmartContract,
            chains: vec!["ethereum".to_string(), "arbitrum".to_string()],
            cost: TokenAmount::from(3u64),
            cover_values: TokenAmount::zero(),
            capacity: 50,
            capacity_amount: TokenAmount::from(capacity_amount),
            max_amount: TokenAmount::from(capacity_amount),
        }
    }

    fn cover_service() -> CallContext {
        CallContext::authenticated(Principal::from("covers"))
    }

    #[tokio::test]
    async fn test_capacity_bounded_by_unreserved_capital() {
        // 1000 tvl, 20% reserved leaves 800 for covers
        let (book, pool_id) = book_with_pool(1000, 20).await;
        book.add_pool_cover(&cover_service(), pool_id, cover(1, pool_id, 500))
            .await
            .unwrap();
        let err = book
            .add_pool_cover(&cover_service(), pool_id, cover(2, pool_id, 301))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientPoolFunds {
                requested: TokenAmount::from(801u64),
                available: TokenAmount::from(800u64),
            }
        );
        book.add_pool_cover(&cover_service(), pool_id, cover(2, pool_id, 300))
            .await
            .unwrap();
        assert_eq!(book.get_pool_covers(pool_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let (book, pool_id) = book_with_pool(1000, 0).await;
        book.add_pool_cover(&cover_service(), pool_id, cover(1, pool_id, 100))
            .await
            .unwrap();
        book.update_pool_cover(&cover_service(), pool_id, cover(1, pool_id, 900))
            .await
            .unwrap();
        let covers = book.get_pool_covers(pool_id).await.unwrap();
        assert_eq!(covers.len(), 1);
        assert_eq!(covers[0].capacity_amount, TokenAmount::from(900u64));

        let missing = book
            .update_pool_cover(&cover_service(), pool_id, cover(9, pool_id, 1))
            .await
            .unwrap_err();
        assert!(matches!(missing, LedgerError::NotFound(Entity::Cover { .. })));
    }

    #[tokio::test]
    async fn test_rejects_duplicates_and_foreign_pool() {
        let (book, pool_id) = book_with_pool(1000, 0).await;
        book.add_pool_cover(&cover_service(), pool_id, cover(1, pool_id, 10))
            .await
            .unwrap();
        assert!(matches!(
            book.add_pool_cover(&cover_service(), pool_id, cover(1, pool_id, 10))
                .await,
            Err(LedgerError::InvalidParameter(_))
        ));
        assert!(matches!(
            book.add_pool_cover(&cover_service(), pool_id, cover(2, PoolId(99), 10))
                .await,
            Err(LedgerError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_requires_cover_service_role() {
        let (book, pool_id) = book_with_pool(1000, 0).await;
        let stranger = CallContext::authenticated(Principal::from("mallory"));
        assert_eq!(
            book.add_pool_cover(&stranger, pool_id, cover(1, pool_id, 10))
                .await
                .unwrap_err(),
            LedgerError::Unauthorized
        );
        assert!(matches!(
            book.get_pool_covers(PoolId(42)).await,
            Err(LedgerError::NotFound(Entity::Pool(_)))
        ));
    }
}
