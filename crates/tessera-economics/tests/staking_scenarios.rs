// crates/tessera-economics/tests/staking_scenarios.rs
//
// End-to-end staking scenarios.
//
// Each test deploys a fresh token, credential registry, and staking ledger
// through the public deployment wiring and drives them with a shared
// ManualClock, the way an external orchestrator would.

use tessera_core::clock::{Clock, ManualClock};
use tessera_core::error::TesseraError;
use tessera_core::identity::{AccountId, CredentialId};
use tessera_core::traits::{CredentialRegistry, FungibleLedger};
use tessera_economics::{
    deploy, reward_for, DeployConfig, FaucetPolicy, StakeState, StandardLedger, Tes,
    CERTIFICATE_THRESHOLD, DEFAULT_APR_BPS, GRAIN_PER_TES, SECONDS_PER_YEAR,
    UNLIMITED_ALLOWANCE,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GENESIS: u64 = 1_700_000_000;
const LOCK_SECS: u64 = 300;

fn tes(n: u128) -> u128 {
    Tes::from_whole(n).grains
}

fn admin() -> AccountId {
    AccountId::from_label("deployer")
}

/// Deploy with the observed test parameters and hand `accounts` 2,000,000 TES
/// each, pre-approved for the staking custody.
fn setup(accounts: &[AccountId]) -> (StandardLedger, ManualClock) {
    let config = DeployConfig {
        faucet: FaucetPolicy {
            amount: tes(100),
            cooldown_secs: 15,
        },
        ..DeployConfig::default()
    };
    assert_eq!(config.policy.lock_duration_secs, LOCK_SECS);

    let mut ledger = deploy(&admin(), &config).unwrap();
    let custody = *ledger.custody();
    for account in accounts {
        let tokens = ledger.tokens_mut();
        tokens.transfer(&admin(), account, tes(2_000_000)).unwrap();
        tokens.approve(account, &custody, UNLIMITED_ALLOWANCE);
    }
    (ledger, ManualClock::new(GENESIS))
}

// ---------------------------------------------------------------------------
// Scenario 1: immediate withdrawal is locked
// ---------------------------------------------------------------------------

#[test]
fn deposit_then_immediate_withdraw_is_lock_active() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);

    ledger.deposit(&alice, tes(1_000), clock.now()).unwrap();
    let err = ledger.withdraw(&alice, tes(1_000), clock.now()).unwrap_err();

    assert_eq!(
        err,
        TesseraError::LockActive {
            remaining_secs: LOCK_SECS,
            unlock_at: GENESIS + LOCK_SECS
        }
    );
    assert_eq!(ledger.record(&alice).principal, tes(1_000));
}

// ---------------------------------------------------------------------------
// Scenario 2: withdraw the reported amount after the lock
// ---------------------------------------------------------------------------

#[test]
fn withdraw_reported_amount_after_lock_returns_to_unstaked() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);

    ledger.deposit(&alice, tes(1_000), clock.now()).unwrap();
    clock.advance(300).unwrap();

    let (withdrawable, pending) = ledger.get_withdrawable_amount(&alice, clock.now()).unwrap();
    assert_eq!(withdrawable, tes(1_000));

    let receipt = ledger.withdraw(&alice, withdrawable, clock.now()).unwrap();
    assert_eq!(receipt.remaining_principal, 0);
    assert_eq!(receipt.reward_paid, pending);
    assert_eq!(ledger.record(&alice).principal, 0);
    assert_eq!(ledger.state(&alice, clock.now()), StakeState::Unstaked);
    assert_eq!(
        ledger.tokens().balance_of(&alice),
        tes(2_000_000) + pending
    );
}

// ---------------------------------------------------------------------------
// Scenario 3: threshold deposits issue credentials with rising ids
// ---------------------------------------------------------------------------

#[test]
fn qualifying_deposits_issue_increasing_credential_ids() {
    let alice = AccountId::from_label("alice");
    let bob = AccountId::from_label("bob");
    let (mut ledger, clock) = setup(&[alice, bob]);

    let first = ledger.deposit(&alice, CERTIFICATE_THRESHOLD, clock.now()).unwrap();
    assert_eq!(ledger.credentials().balance_of(&alice), 1);

    clock.advance(1).unwrap();
    let second = ledger.deposit(&bob, tes(1_500_000), clock.now()).unwrap();
    assert_eq!(ledger.credentials().balance_of(&bob), 1);

    let (a, b) = (first.credential.unwrap(), second.credential.unwrap());
    assert_eq!(a, CredentialId(0));
    assert!(b > a);
    assert_eq!(ledger.credentials().owner_of(a), Some(alice));
    assert_eq!(ledger.credentials().owner_of(b), Some(bob));
}

#[test]
fn deposit_below_threshold_issues_nothing() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);

    let receipt = ledger
        .deposit(&alice, CERTIFICATE_THRESHOLD - 1, clock.now())
        .unwrap();
    assert_eq!(receipt.credential, None);
    assert_eq!(ledger.credentials().balance_of(&alice), 0);
}

// ---------------------------------------------------------------------------
// Scenario 4: one day of reward
// ---------------------------------------------------------------------------

#[test]
fn one_day_reward_matches_linear_formula() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);

    ledger.deposit(&alice, tes(1_000), clock.now()).unwrap();
    clock.advance(86_400).unwrap();

    let (_, pending) = ledger.get_withdrawable_amount(&alice, clock.now()).unwrap();
    let expected = 1_000.0 * 0.08 * 86_400.0 / SECONDS_PER_YEAR as f64;
    assert!((Tes::from_grains(pending).to_tes_f64() - expected).abs() < 0.01);

    // Exact to the grain against the integer formula, rounded down.
    let exact = tes(1_000) * 800 * 86_400 / (10_000 * SECONDS_PER_YEAR as u128);
    assert_eq!(pending, exact);
}

#[test]
fn reward_is_linear_across_many_reads() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);
    ledger.deposit(&alice, tes(777), clock.now()).unwrap();

    let mut last = 0;
    for _ in 0..24 {
        clock.advance(3_600).unwrap();
        let pending = ledger.pending_reward(&alice, clock.now()).unwrap();
        assert!(pending > last);
        last = pending;
    }
    assert_eq!(last, reward_for(tes(777), DEFAULT_APR_BPS, 86_400).unwrap());
}

#[test]
fn frequent_claims_never_overpay() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);
    ledger.deposit(&alice, tes(1_234), clock.now()).unwrap();

    let mut claimed = 0;
    for _ in 0..100 {
        clock.advance(864).unwrap();
        claimed += ledger.claim(&alice, clock.now()).unwrap().reward_paid;
    }
    let single = reward_for(tes(1_234), DEFAULT_APR_BPS, 86_400).unwrap();
    assert!(claimed <= single);
    assert!(single - claimed <= 1);
}

// ---------------------------------------------------------------------------
// Scenario 5: faucet cooldown
// ---------------------------------------------------------------------------

#[test]
fn faucet_respects_cooldown() {
    let carol = AccountId::from_label("carol");
    let (mut ledger, clock) = setup(&[]);

    ledger.tokens_mut().faucet(&carol, clock.now()).unwrap();
    clock.advance(15).unwrap();
    ledger.tokens_mut().faucet(&carol, clock.now()).unwrap();
    assert_eq!(ledger.tokens().balance_of(&carol), 2 * tes(100));

    let err = ledger.tokens_mut().faucet(&carol, clock.now()).unwrap_err();
    assert_eq!(err, TesseraError::CooldownActive { remaining_secs: 15 });
    assert_eq!(ledger.tokens().balance_of(&carol), 2 * tes(100));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn principal_decreases_by_exactly_the_withdrawn_amount() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);
    ledger.deposit(&alice, tes(1_000), clock.now()).unwrap();
    clock.advance(LOCK_SECS).unwrap();

    let mut principal = tes(1_000);
    for amount in [tes(1), tes(99), tes(400), tes(500)] {
        clock.advance(10).unwrap();
        ledger.withdraw(&alice, amount, clock.now()).unwrap();
        principal -= amount;
        assert_eq!(ledger.record(&alice).principal, principal);
    }
    assert_eq!(principal, 0);

    clock.advance(10).unwrap();
    assert!(matches!(
        ledger.withdraw(&alice, 1, clock.now()),
        Err(TesseraError::InvalidAmount(_))
    ));
}

#[test]
fn redeposit_relocks_entire_principal() {
    let alice = AccountId::from_label("alice");
    let (mut ledger, clock) = setup(&[alice]);
    ledger.deposit(&alice, tes(1_000), clock.now()).unwrap();
    clock.advance(LOCK_SECS).unwrap();
    assert_eq!(ledger.state(&alice, clock.now()), StakeState::Unlockable);

    ledger.deposit(&alice, tes(1), clock.now()).unwrap();
    assert_eq!(ledger.state(&alice, clock.now()), StakeState::Locked);
    assert!(matches!(
        ledger.withdraw(&alice, tes(1_000), clock.now()),
        Err(TesseraError::LockActive { .. })
    ));
}

#[test]
fn non_admin_mint_is_unauthorized_without_state_change() {
    let mallory = AccountId::from_label("mallory");
    let (mut ledger, _clock) = setup(&[]);
    let supply = ledger.tokens().total_supply();

    let err = ledger.tokens_mut().mint(&mallory, &mallory, tes(1)).unwrap_err();
    assert_eq!(err, TesseraError::Unauthorized { caller: mallory });
    assert_eq!(ledger.tokens().total_supply(), supply);
    assert_eq!(ledger.tokens().balance_of(&mallory), 0);
}

#[test]
fn custody_holds_principal_plus_pool() {
    let alice = AccountId::from_label("alice");
    let bob = AccountId::from_label("bob");
    let (mut ledger, clock) = setup(&[alice, bob]);
    let pool = ledger.tokens().balance_of(ledger.custody());

    ledger.deposit(&alice, tes(10), clock.now()).unwrap();
    ledger.deposit(&bob, tes(20), clock.now()).unwrap();
    assert_eq!(ledger.total_principal(), tes(30));
    assert_eq!(
        ledger.tokens().balance_of(ledger.custody()),
        pool + tes(30)
    );

    clock.advance(SECONDS_PER_YEAR).unwrap();
    let receipt = ledger.withdraw(&alice, tes(10), clock.now()).unwrap();
    assert_eq!(receipt.reward_paid, 8 * GRAIN_PER_TES / 10);
    assert_eq!(
        ledger.tokens().balance_of(ledger.custody()),
        pool + tes(20) - receipt.reward_paid
    );
}
