//! Pool ledger façade wiring every component over one shared store.

use crate::access::{AccessConfig, AccessControl, CallContext};
use crate::accrual::AccrualEngine;
use crate::claims::ClaimsSettlement;
use crate::clock::Clock;
use crate::covers::CoverBook;
use crate::deposits::DepositLedger;
use crate::error::LedgerResult;
use crate::gateway::{GovernanceGateway, TokenLedger};
use crate::journal::{EventJournal, LedgerEvent};
use crate::queries::QueryFacade;
use crate::registry::PoolRegistry;
use crate::split::SplitController;
use crate::store::{LedgerContext, LedgerSnapshot, LedgerStore};
use pool_ledger_domain::value_objects::{PoolId, Principal};
use std::sync::Arc;
use tracing::info;

/// The pool ledger service.
///
/// Components share one [`LedgerContext`]; the façade only routes calls.
pub struct PoolLedger {
    shared: Arc<LedgerContext>,
    registry: PoolRegistry,
    deposits: DepositLedger,
    accrual: AccrualEngine,
    split: SplitController,
    covers: CoverBook,
    claims: ClaimsSettlement,
    queries: QueryFacade,
}

impl PoolLedger {
    /// Builds a ledger over `store`.
    #[must_use]
    pub fn new(
        store: Arc<LedgerStore>,
        clock: Arc<dyn Clock>,
        access: AccessConfig,
        governance: Arc<dyn GovernanceGateway>,
        token_ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        let shared = Arc::new(LedgerContext::new(
            store,
            clock,
            Arc::new(AccessControl::new(access)),
        ));
        Self {
            registry: PoolRegistry::new(shared.clone()),
            deposits: DepositLedger::new(shared.clone()),
            accrual: AccrualEngine::new(shared.clone()),
            split: SplitController::new(shared.clone()),
            covers: CoverBook::new(shared.clone()),
            claims: ClaimsSettlement::new(shared.clone(), governance, token_ledger),
            queries: QueryFacade::new(shared.clone()),
            shared,
        }
    }

    /// Rebuilds a ledger from a persisted snapshot.
    ///
    /// Role assignments saved in the snapshot win over `access`, which only
    /// seeds a snapshot that predates them.
    #[must_use]
    pub fn from_snapshot(
        mut snapshot: LedgerSnapshot,
        clock: Arc<dyn Clock>,
        access: AccessConfig,
        governance: Arc<dyn GovernanceGateway>,
        token_ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        let access = match snapshot.access.take() {
            Some(saved) => {
                if saved != access {
                    info!(owner = %saved.owner, "Restoring persisted role assignments");
                }
                saved
            }
            None => access,
        };
        Self::new(
            Arc::new(LedgerStore::from_snapshot(snapshot)),
            clock,
            access,
            governance,
            token_ledger,
        )
    }

    /// Pool creation and administration.
    #[must_use]
    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// Deposits and withdrawals.
    #[must_use]
    pub fn deposits(&self) -> &DepositLedger {
        &self.deposits
    }

    /// Accrual settlement and accrual reads.
    #[must_use]
    pub fn accrual(&self) -> &AccrualEngine {
        &self.accrual
    }

    /// Claim-reserve split.
    #[must_use]
    pub fn split(&self) -> &SplitController {
        &self.split
    }

    /// Pool covers.
    #[must_use]
    pub fn covers(&self) -> &CoverBook {
        &self.covers
    }

    /// Claim payouts.
    #[must_use]
    pub fn claims(&self) -> &ClaimsSettlement {
        &self.claims
    }

    /// Cross-pool reads.
    #[must_use]
    pub fn queries(&self) -> &QueryFacade {
        &self.queries
    }

    /// Role table.
    #[must_use]
    pub fn access(&self) -> &AccessControl {
        &self.shared.access
    }

    /// Event journal.
    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        &self.shared.journal
    }

    /// Events recorded for `pool_id`, oldest first.
    pub async fn events(&self, pool_id: PoolId) -> Vec<LedgerEvent> {
        self.shared.journal.events(pool_id).await
    }

    /// Transfers ownership. Owner only.
    pub async fn set_owner(&self, call: &CallContext, new_owner: Principal) -> LedgerResult<()> {
        self.shared.access.set_owner(call, new_owner).await
    }

    /// Rewires the collaborator identities. Owner only.
    pub async fn set_collaborators(
        &self,
        call: &CallContext,
        cover_service: Option<Principal>,
        governance: Option<Principal>,
    ) -> LedgerResult<()> {
        self.shared
            .access
            .set_collaborators(call, cover_service, governance)
            .await
    }

    /// Copies the whole store and the role table for persistence.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let mut snapshot = self.shared.store.snapshot().await;
        snapshot.access = Some(self.shared.access.config().await);
        info!(pools = snapshot.pools.len(), "Ledger snapshot taken");
        snapshot
    }

    /// Current ledger time.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.shared.now()
    }
}
