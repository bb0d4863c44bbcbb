//! Claims settlement.
//!
//! Pays governance-approved claims out of a pool's claim reserve. Each
//! proposal is paid at most once: the governance `executed` flag is checked
//! first and every pool also remembers the proposals it has paid, so a replay
//! after a lost `mark_claimed` call is still a no-op.

use crate::access::{CallContext, Role};
use crate::error::{Entity, LedgerError, LedgerResult};
use crate::gateway::{GovernanceGateway, TokenLedger};
use crate::journal::{ClaimData, EventData, LedgerEventType};
use crate::store::LedgerContext;
use pool_ledger_domain::entities::Proposal;
use pool_ledger_domain::enums::ProposalStatus;
use pool_ledger_domain::value_objects::ProposalId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a claim call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOutcome {
    /// Payout credited to the claimant's deposit in the pool.
    CreditedToDeposit,
    /// Payout minted to the claimant through the token ledger.
    RoutedExternally,
    /// Proposal was already paid; nothing changed.
    AlreadySettled,
}

/// Settles approved claims.
pub struct ClaimsSettlement {
    shared: Arc<LedgerContext>,
    governance: Arc<dyn GovernanceGateway>,
    token_ledger: Arc<dyn TokenLedger>,
}

impl ClaimsSettlement {
    /// Creates the settlement component with its collaborators.
    #[must_use]
    pub fn new(
        shared: Arc<LedgerContext>,
        governance: Arc<dyn GovernanceGateway>,
        token_ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        Self {
            shared,
            governance,
            token_ledger,
        }
    }

    /// Pays the claim of an approved proposal. Governance only.
    pub async fn claim_proposal_funds(
        &self,
        call: &CallContext,
        proposal_id: ProposalId,
    ) -> LedgerResult<ClaimOutcome> {
        self.shared.access.ensure(call, Role::Governance).await?;

        let proposal = self
            .governance
            .proposal(proposal_id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Proposal(proposal_id)))?;
        if proposal.executed || proposal.status == ProposalStatus::Claimed {
            debug!(proposal_id = %proposal_id, "Proposal already executed");
            return Ok(ClaimOutcome::AlreadySettled);
        }
        if proposal.status != ProposalStatus::Approved {
            return Err(LedgerError::ProposalNotApproved(proposal_id));
        }

        let outcome = self.settle(&proposal).await?;
        if outcome == ClaimOutcome::AlreadySettled {
            return Ok(outcome);
        }

        if let Err(err) = self.governance.mark_claimed(proposal_id).await {
            warn!(
                proposal_id = %proposal_id,
                error = %err,
                "Claim paid but governance was not updated"
            );
        }
        Ok(outcome)
    }

    async fn settle(&self, proposal: &Proposal) -> LedgerResult<ClaimOutcome> {
        let params = &proposal.params;
        let pool_id = params.pool_id;
        let handle = self.shared.store.entry(pool_id).await?;
        let mut entry = handle.lock().await;

        if entry.settled_proposals.contains(&proposal.id) {
            debug!(proposal_id = %proposal.id, pool_id = %pool_id, "Proposal already paid");
            return Ok(ClaimOutcome::AlreadySettled);
        }
        let amount = params.claim_amount;
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }
        let available = entry.claim_headroom()?;
        if amount > available {
            debug!(
                proposal_id = %proposal.id,
                pool_id = %pool_id,
                requested = %amount,
                available = %available,
                "Claim exceeds reserve"
            );
            return Err(LedgerError::InsufficientPoolFunds {
                requested: amount,
                available,
            });
        }
        let claims_paid = entry
            .pool
            .claims_paid
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let credited = match entry.pool.deposits.get(&params.user) {
            Some(deposit) => Some((
                deposit
                    .accrued_payout
                    .checked_add(amount)
                    .ok_or(LedgerError::Overflow)?,
                deposit
                    .claim_credit
                    .checked_add(amount)
                    .ok_or(LedgerError::Overflow)?,
            )),
            None => {
                // the pool stays locked until the mint resolves
                self.token_ledger.mint(&params.user, amount).await?;
                None
            }
        };

        if let (Some((accrued, claim_credit)), Some(deposit)) =
            (credited, entry.pool.deposits.get_mut(&params.user))
        {
            deposit.accrued_payout = accrued;
            deposit.claim_credit = claim_credit;
        }
        entry.pool.claims_paid = claims_paid;
        entry.settled_proposals.insert(proposal.id);
        drop(entry);

        let outcome = if credited.is_some() {
            ClaimOutcome::CreditedToDeposit
        } else {
            ClaimOutcome::RoutedExternally
        };
        info!(
            proposal_id = %proposal.id,
            pool_id = %pool_id,
            claimant = %params.user,
            amount = %amount,
            ?outcome,
            "Claim settled"
        );
        self.shared
            .journal
            .record(
                LedgerEventType::ClaimSettled,
                pool_id,
                self.shared.now(),
                EventData::Claim(ClaimData {
                    proposal_id: proposal.id,
                    claimant: params.user.clone(),
                    amount,
                    credited_to_deposit: credited.is_some(),
                }),
            )
            .await;
        Ok(outcome)
    }
}
