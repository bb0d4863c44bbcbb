use pool_ledger_domain::entities::{Cover, Proposal, ProposalParams};
use pool_ledger_domain::enums::{DepositStatus, ProposalStatus, RiskType};
use pool_ledger_domain::math::accrual::SECONDS_PER_DAY;
use pool_ledger_domain::value_objects::{CoverId, PoolId, Principal, ProposalId, TokenAmount};
use pool_ledger_engine::prelude::*;
use std::sync::Arc;

const START: u64 = 1_700_000_000;

struct Harness {
    ledger: Arc<PoolLedger>,
    clock: Arc<ManualClock>,
    governance: Arc<InMemoryGovernance>,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(START));
    let governance = Arc::new(InMemoryGovernance::new());
    let access = AccessConfig {
        owner: Principal::from("owner"),
        cover_service: Some(Principal::from("covers")),
        governance: Some(Principal::from("dao")),
    };
    let ledger = PoolLedger::new(
        Arc::new(LedgerStore::new()),
        clock.clone(),
        access,
        governance.clone(),
        Arc::new(InMemoryTokenLedger::new()),
    );
    Harness {
        ledger: Arc::new(ledger),
        clock,
        governance,
    }
}

fn as_user(name: &str) -> CallContext {
    CallContext::authenticated(Principal::from(name))
}

fn amount(v: u64) -> TokenAmount {
    TokenAmount::from(v)
}

async fn create_p1(h: &Harness) -> PoolId {
    h.ledger
        .registry()
        .create_pool(&as_user("owner"), RiskType::Stablecoin, "P1", 1000, 30)
        .await
        .unwrap()
}

fn cover(pool_id: PoolId, capacity_amount: u64) -> Cover {
    Cover {
        id: CoverId(1),
        pool_id,
        cover_name: "Stable depeg".to_string(),
        cid: String::new(),
        risk_type: RiskType::Stablecoin,
        chains: vec!["ethereum".to_string()],
        cost: amount(10),
        cover_values: TokenAmount::zero(),
        capacity: 50,
        capacity_amount: amount(capacity_amount),
        max_amount: amount(capacity_amount),
    }
}

fn approved_claim(id: u64, user: &str, pool_id: PoolId, claim_amount: u64) -> Proposal {
    Proposal {
        id: ProposalId(id),
        status: ProposalStatus::Approved,
        executed: false,
        params: ProposalParams {
            user: Principal::from(user),
            pool_id,
            cover_id: CoverId(0),
            claim_amount: amount(claim_amount),
            risk_type: RiskType::Stablecoin,
            description: "depeg".to_string(),
            tx_hash: String::new(),
        },
    }
}

async fn assert_covers_backed(h: &Harness, pool_id: PoolId) {
    let pool = h.ledger.registry().get_pool(pool_id).await.unwrap();
    let covers = h.ledger.covers().get_pool_covers(pool_id).await.unwrap();
    let committed = TokenAmount::checked_sum(covers.iter().map(|c| c.capacity_amount)).unwrap();
    assert!(committed <= pool.cover_capital(), "covers exceed pool capital");
}

async fn assert_tvl_matches_active_deposits(h: &Harness, pool_id: PoolId) {
    let pool = h.ledger.registry().get_pool(pool_id).await.unwrap();
    let active = pool.active_principal().unwrap();
    assert_eq!(pool.tvl, active, "tvl drifted from active principal");
}

#[tokio::test]
async fn test_deposit_and_withdraw_scenarios() {
    let h = harness();

    // create pool
    let pool_id = create_p1(&h).await;
    assert_eq!(pool_id, PoolId(0));
    assert_eq!(
        h.ledger.registry().get_pool(pool_id).await.unwrap().tvl,
        TokenAmount::zero()
    );

    // first deposit
    let alice = as_user("alice");
    h.ledger
        .deposits()
        .deposit(&alice, pool_id, amount(1000))
        .await
        .unwrap();
    let first = h
        .ledger
        .deposits()
        .get_user_deposit(pool_id, alice.caller())
        .await
        .unwrap();
    assert_eq!(first.amount, amount(1000));
    assert_eq!(h.ledger.queries().get_pool_tvl(pool_id).await.unwrap(), amount(1000));

    // top-up keeps the expiry date
    h.ledger
        .deposits()
        .deposit(&alice, pool_id, amount(500))
        .await
        .unwrap();
    let topped = h
        .ledger
        .deposits()
        .get_user_deposit(pool_id, alice.caller())
        .await
        .unwrap();
    assert_eq!(topped.amount, amount(1500));
    assert_eq!(topped.expiry_date, first.expiry_date);

    // over-withdrawal leaves state untouched
    let before = h.ledger.snapshot().await;
    let err = h
        .ledger
        .deposits()
        .withdraw(&alice, pool_id, amount(2000))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(h.ledger.snapshot().await, before);

    // full withdrawal closes the deposit
    h.ledger
        .deposits()
        .withdraw(&alice, pool_id, amount(1500))
        .await
        .unwrap();
    let closed = h
        .ledger
        .deposits()
        .get_user_deposit(pool_id, alice.caller())
        .await
        .unwrap();
    assert_eq!(closed.status, DepositStatus::Withdrawn);
    assert_eq!(h.ledger.queries().get_pool_tvl(pool_id).await.unwrap(), TokenAmount::zero());
    assert_tvl_matches_active_deposits(&h, pool_id).await;

    // split cannot leave [0, 100]
    let err = h
        .ledger
        .split()
        .increase_percentage_split(&as_user("covers"), pool_id, 150)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::OutOfBounds { current: 0, delta: 150 });
}

#[tokio::test]
async fn test_tcp_is_cumulative() {
    let h = harness();
    let pool_id = create_p1(&h).await;
    let bob = as_user("bob");
    h.ledger.deposits().deposit(&bob, pool_id, amount(700)).await.unwrap();
    h.ledger.deposits().withdraw(&bob, pool_id, amount(200)).await.unwrap();
    h.ledger.deposits().deposit(&bob, pool_id, amount(100)).await.unwrap();

    let pool = h.ledger.registry().get_pool(pool_id).await.unwrap();
    assert_eq!(pool.tvl, amount(600));
    assert_eq!(pool.tcp, amount(800));
}

#[tokio::test]
async fn test_split_stays_within_bounds() {
    let h = harness();
    let pool_id = create_p1(&h).await;
    let covers = as_user("covers");
    let split = h.ledger.split();

    assert_eq!(split.increase_percentage_split(&covers, pool_id, 60).await.unwrap().value(), 60);
    assert_eq!(split.increase_percentage_split(&covers, pool_id, 40).await.unwrap().value(), 100);
    assert!(split.increase_percentage_split(&covers, pool_id, 1).await.is_err());
    assert_eq!(split.reduce_percentage_split(&covers, pool_id, 100).await.unwrap().value(), 0);
    assert!(matches!(
        split.reduce_percentage_split(&covers, pool_id, 1).await,
        Err(LedgerError::OutOfBounds { current: 0, delta: 1 })
    ));
    assert_eq!(
        split
            .increase_percentage_split(&as_user("owner"), pool_id, 1)
            .await
            .unwrap_err(),
        LedgerError::Unauthorized
    );
    assert_eq!(
        h.ledger
            .registry()
            .get_pool(pool_id)
            .await
            .unwrap()
            .percentage_split_balance
            .value(),
        0
    );
}

#[tokio::test]
async fn test_covers_stay_backed_through_split_and_withdrawal() {
    let h = harness();
    let pool_id = create_p1(&h).await;
    let alice = as_user("alice");
    let covers = as_user("covers");
    h.ledger.deposits().deposit(&alice, pool_id, amount(1000)).await.unwrap();
    h.ledger
        .covers()
        .add_pool_cover(&covers, pool_id, cover(pool_id, 1000))
        .await
        .unwrap();
    let before = h.ledger.snapshot().await;

    assert_eq!(
        h.ledger
            .split()
            .increase_percentage_split(&covers, pool_id, 50)
            .await
            .unwrap_err(),
        LedgerError::InsufficientPoolFunds {
            requested: amount(1000),
            available: amount(500),
        }
    );
    assert_eq!(
        h.ledger.deposits().withdraw(&alice, pool_id, amount(1000)).await.unwrap_err(),
        LedgerError::InsufficientPoolFunds {
            requested: amount(1000),
            available: TokenAmount::zero(),
        }
    );
    assert_eq!(h.ledger.snapshot().await, before);

    // shrinking the cover frees capital for both moves
    h.ledger
        .covers()
        .update_pool_cover(&covers, pool_id, cover(pool_id, 400))
        .await
        .unwrap();
    h.ledger
        .split()
        .increase_percentage_split(&covers, pool_id, 50)
        .await
        .unwrap();
    assert_covers_backed(&h, pool_id).await;
    h.ledger.deposits().withdraw(&alice, pool_id, amount(200)).await.unwrap();
    assert_covers_backed(&h, pool_id).await;
    assert!(h.ledger.deposits().withdraw(&alice, pool_id, amount(10)).await.is_err());
    assert_covers_backed(&h, pool_id).await;
    assert_tvl_matches_active_deposits(&h, pool_id).await;
}

#[tokio::test]
async fn test_accrued_withdrawal_draws_down_reserve() {
    let h = harness();
    let pool_id = h
        .ledger
        .registry()
        .create_pool(&as_user("owner"), RiskType::Protocol, "Yield", 10, 60)
        .await
        .unwrap();
    h.ledger
        .split()
        .increase_percentage_split(&as_user("covers"), pool_id, 10)
        .await
        .unwrap();
    let alice = as_user("alice");
    h.ledger.deposits().deposit(&alice, pool_id, amount(365_000)).await.unwrap();

    h.clock.advance_days(30);
    let receipt = h.ledger.deposits().withdraw(&alice, pool_id, amount(3000)).await.unwrap();
    assert_eq!(receipt.from_accrued, amount(3000));
    let pool = h.ledger.registry().get_pool(pool_id).await.unwrap();
    assert_eq!(pool.tvl, amount(365_000));
    assert_eq!(pool.accruals_paid, amount(3000));

    // 36500 reserved, 3000 already paid out as yield
    h.governance.upsert(approved_claim(1, "bob", pool_id, 36_500)).await;
    let dao = as_user("dao");
    assert_eq!(
        h.ledger.claims().claim_proposal_funds(&dao, ProposalId(1)).await.unwrap_err(),
        LedgerError::InsufficientPoolFunds {
            requested: amount(36_500),
            available: amount(33_500),
        }
    );
    h.governance.upsert(approved_claim(2, "bob", pool_id, 33_500)).await;
    assert_eq!(
        h.ledger.claims().claim_proposal_funds(&dao, ProposalId(2)).await.unwrap(),
        ClaimOutcome::RoutedExternally
    );
}

#[tokio::test]
async fn test_claim_is_idempotent() {
    let h = harness();
    let pool_id = create_p1(&h).await;
    h.ledger
        .deposits()
        .deposit(&as_user("alice"), pool_id, amount(10_000))
        .await
        .unwrap();
    h.ledger
        .split()
        .increase_percentage_split(&as_user("covers"), pool_id, 10)
        .await
        .unwrap();
    h.governance
        .upsert(Proposal {
            id: ProposalId(1),
            status: ProposalStatus::Approved,
            executed: false,
            params: ProposalParams {
                user: Principal::from("alice"),
                pool_id,
                cover_id: CoverId(0),
                claim_amount: amount(400),
                risk_type: RiskType::Stablecoin,
                description: "depeg".to_string(),
                tx_hash: String::new(),
            },
        })
        .await;

    let dao = as_user("dao");
    let first = h.ledger.claims().claim_proposal_funds(&dao, ProposalId(1)).await.unwrap();
    assert_eq!(first, ClaimOutcome::CreditedToDeposit);
    let once = h.ledger.snapshot().await;

    let second = h.ledger.claims().claim_proposal_funds(&dao, ProposalId(1)).await.unwrap();
    assert_eq!(second, ClaimOutcome::AlreadySettled);
    assert_eq!(h.ledger.snapshot().await, once);

    let deposit = h
        .ledger
        .deposits()
        .get_user_deposit(pool_id, &Principal::from("alice"))
        .await
        .unwrap();
    assert_eq!(deposit.accrued_payout, amount(400));
    assert_eq!(h.ledger.events(pool_id).await.len(), 4);
}

#[tokio::test]
async fn test_accrual_settles_daily_and_survives_rate_change() {
    let h = harness();
    let pool_id = h
        .ledger
        .registry()
        .create_pool(&as_user("owner"), RiskType::Protocol, "Yield", 10, 60)
        .await
        .unwrap();
    let alice = as_user("alice");
    h.ledger.deposits().deposit(&alice, pool_id, amount(365_000)).await.unwrap();

    h.clock.advance(3 * SECONDS_PER_DAY + 100);
    assert_eq!(
        h.ledger.accrual().claimable_days(alice.caller(), pool_id).await.unwrap(),
        3
    );

    // days already elapsed keep the old 10% rate
    h.ledger
        .registry()
        .update_pool(&as_user("owner"), pool_id, 20, 60)
        .await
        .unwrap();
    assert_eq!(
        h.ledger.accrual().last_claim_time(alice.caller(), pool_id).await.unwrap(),
        START + 3 * SECONDS_PER_DAY
    );

    h.clock.advance_days(2);
    let credited = h.ledger.accrual().settle_accrual(&alice, pool_id).await.unwrap();
    assert_eq!(credited, amount(400));

    let deposit = h
        .ledger
        .deposits()
        .get_user_deposit(pool_id, alice.caller())
        .await
        .unwrap();
    assert_eq!(deposit.accrued_payout, amount(700));
    assert_eq!(deposit.daily_payout, amount(200));
    assert_eq!(deposit.days_left, 55);
}

#[tokio::test]
async fn test_participation_queries() {
    let h = harness();
    let p0 = create_p1(&h).await;
    let p1 = create_p1(&h).await;
    h.ledger.deposits().deposit(&as_user("alice"), p0, amount(100)).await.unwrap();
    h.ledger.deposits().deposit(&as_user("alice"), p1, amount(250)).await.unwrap();
    h.ledger.deposits().deposit(&as_user("bob"), p1, amount(5)).await.unwrap();

    let participants = h.ledger.queries().get_all_participants().await;
    assert_eq!(participants, vec![Principal::from("alice"), Principal::from("bob")]);
    assert_eq!(
        h.ledger.queries().get_user_participation(&Principal::from("alice")).await,
        amount(350)
    );
    assert_eq!(
        h.ledger.queries().get_user_participation(&Principal::from("carol")).await,
        TokenAmount::zero()
    );

    let infos = h.ledger.queries().get_pools_by_address(&Principal::from("alice")).await;
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[1].pool_id, p1);
    assert_eq!(infos[1].deposit_amount, amount(250));
    assert_eq!(infos[1].tvl, amount(255));
}

#[tokio::test]
async fn test_deactivated_pool_rejects_deposits_only() {
    let h = harness();
    let pool_id = create_p1(&h).await;
    let alice = as_user("alice");
    h.ledger.deposits().deposit(&alice, pool_id, amount(100)).await.unwrap();

    let owner = as_user("owner");
    h.ledger.registry().deactivate_pool(&owner, pool_id).await.unwrap();
    h.ledger.registry().deactivate_pool(&owner, pool_id).await.unwrap();
    assert!(!h.ledger.registry().pool_active(pool_id).await.unwrap());

    assert_eq!(
        h.ledger.deposits().deposit(&alice, pool_id, amount(1)).await.unwrap_err(),
        LedgerError::PoolInactive(pool_id)
    );
    h.ledger.deposits().withdraw(&alice, pool_id, amount(100)).await.unwrap();
    assert_tvl_matches_active_deposits(&h, pool_id).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deposits_do_not_lose_updates() {
    let h = harness();
    let pool_id = create_p1(&h).await;

    let mut tasks = Vec::new();
    for i in 0..32u64 {
        let ledger = h.ledger.clone();
        tasks.push(tokio::spawn(async move {
            let call = as_user(&format!("lp-{}", i % 8));
            ledger.deposits().deposit(&call, pool_id, amount(i + 1)).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let pool = h.ledger.registry().get_pool(pool_id).await.unwrap();
    assert_eq!(pool.tvl, amount((1..=32).sum()));
    assert_eq!(pool.deposits.len(), 8);
    assert_tvl_matches_active_deposits(&h, pool_id).await;
}

#[tokio::test]
async fn test_role_changes_survive_restore() {
    let h = harness();
    let pool_id = create_p1(&h).await;
    h.ledger
        .set_owner(&as_user("owner"), Principal::from("treasury"))
        .await
        .unwrap();
    h.ledger
        .set_collaborators(&as_user("treasury"), Some(Principal::from("covers-v2")), None)
        .await
        .unwrap();
    let snapshot = h.ledger.snapshot().await;

    // the startup config still names the original owner
    let restored = PoolLedger::from_snapshot(
        snapshot.clone(),
        h.clock.clone(),
        AccessConfig::with_owner(Principal::from("owner")),
        h.governance.clone(),
        Arc::new(InMemoryTokenLedger::new()),
    );
    let access = restored.access();
    assert!(access.has_role(&Principal::from("treasury"), Role::Owner).await);
    assert!(!access.has_role(&Principal::from("owner"), Role::Owner).await);
    assert!(access.has_role(&Principal::from("covers-v2"), Role::CoverService).await);
    assert!(!access.has_role(&Principal::from("dao"), Role::Governance).await);
    assert_eq!(restored.snapshot().await, snapshot);
    assert_eq!(restored.registry().get_pool(pool_id).await.unwrap().pool_name, "P1");
}
