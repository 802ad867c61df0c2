// ============================================================================
// E2E NEON LOCKER TEST
// ============================================================================
//
// Locker behaviour through the action ABI, against both a plain BEP-20 LP
// token and the taxed NEON token.
//
// Test Scenarios:
//   1.  LP token lock and owner-only unlock
//   2.  Unlock of an empty holding is a no-op
//   3.  NEON release is taxed and capped like any transfer
//   4.  Locker ownership handover
//   5.  Unknown token addresses are rejected
//
// Run:
//   cargo test --test e2e_locker -- --nocapture
//
// ============================================================================

use neon_core::{Address, ContractKind, Deployment, NeonAction, NeonEvent, NeonResponse, BURN_ADDRESS};

// ============================================================================
// HELPERS
// ============================================================================

fn ok(d: &mut Deployment, caller: &Address, action: NeonAction) -> NeonResponse {
    let resp = d.execute(caller, action);
    assert!(resp.success, "expected success, got: {}", resp.message);
    resp
}

fn fail(d: &mut Deployment, caller: &Address, action: NeonAction) -> NeonResponse {
    let resp = d.execute(caller, action);
    assert!(!resp.success, "expected failure, got: {}", resp.message);
    resp
}

fn amount(resp: &NeonResponse) -> u128 {
    let v: serde_json::Value = serde_json::from_str(resp.data.as_deref().unwrap()).unwrap();
    v.as_str().unwrap().parse().unwrap()
}

/// Deploy a 1,000,000 supply LP token owned by `owner`.
fn deploy_lp(d: &mut Deployment, owner: &Address) -> Address {
    let resp = ok(
        d,
        owner,
        NeonAction::DeployBep20 {
            name: "LPToken".to_string(),
            symbol: "LP1".to_string(),
            decimals: 18,
            total_supply: 1_000_000,
        },
    );
    let v: serde_json::Value = serde_json::from_str(resp.data.as_deref().unwrap()).unwrap();
    v.as_str().unwrap().parse().unwrap()
}

// ============================================================================
// 1. LP LOCK / UNLOCK
// ============================================================================

#[test]
fn test_01_only_owner_can_unlock() {
    let owner = Address::from_seed("owner");
    let bob = Address::from_seed("bob");
    let carol = Address::from_seed("carol");
    let mut d = Deployment::new(owner);
    let lp = deploy_lp(&mut d, &owner);
    let locker = d.locker().address();
    assert_eq!(d.locker().owner(), owner);

    ok(&mut d, &owner, NeonAction::Transfer { token: Some(lp), to: locker, amount: 2_000 });
    let held = ok(&mut d, &bob, NeonAction::LockedBalance { token: Some(lp) });
    assert_eq!(amount(&held), 2_000);

    let resp = fail(&mut d, &bob, NeonAction::Unlock { token: Some(lp), recipient: bob });
    assert_eq!(resp.message, "Ownable: caller is not the owner");
    assert_eq!(d.bep20(&lp).unwrap().balance_of(&locker), 2_000);

    let resp = ok(&mut d, &owner, NeonAction::Unlock { token: Some(lp), recipient: carol });
    assert_eq!(amount(&resp), 2_000);
    assert!(resp.events.contains(&NeonEvent::Unlocked {
        token: lp,
        recipient: carol,
        amount: 2_000
    }));
    let lp_token = d.bep20(&lp).unwrap();
    assert_eq!(lp_token.balance_of(&carol), 2_000);
    assert_eq!(lp_token.balance_of(&locker), 0);
    assert_eq!(lp_token.balance_of(&owner), 998_000);
}

// ============================================================================
// 2. EMPTY UNLOCK
// ============================================================================

#[test]
fn test_02_empty_unlock_is_noop() {
    let owner = Address::from_seed("owner");
    let mut d = Deployment::new(owner);
    let lp = deploy_lp(&mut d, &owner);
    let resp = ok(&mut d, &owner, NeonAction::Unlock { token: Some(lp), recipient: owner });
    assert_eq!(amount(&resp), 0);
    assert!(resp.events.is_empty());

    let resp = fail(&mut d, &owner, NeonAction::Unlock { token: Some(lp), recipient: Address::ZERO });
    assert_eq!(resp.error_kind.as_deref(), Some("invalid_argument"));
}

// ============================================================================
// 3. NEON RELEASE
// ============================================================================

#[test]
fn test_03_neon_release_goes_through_transfer_rule() {
    let owner = Address::from_seed("owner");
    let carol = Address::from_seed("carol");
    let mut d = Deployment::new(owner);
    let locker = d.locker().address();
    let token = d.token().address();

    ok(&mut d, &owner, NeonAction::Mint { to: owner, amount: 1_000_000 });
    ok(&mut d, &owner, NeonAction::Transfer { token: None, to: locker, amount: 10_000 });
    // 10000 in, taxed on the way in: 9500 held
    assert_eq!(d.token().balance_of(&locker), 9_500);

    // cap is 5000 and neither locker nor carol is excluded
    let resp = fail(&mut d, &owner, NeonAction::Unlock { token: None, recipient: carol });
    assert_eq!(resp.error_kind.as_deref(), Some("limit_exceeded"));
    assert_eq!(d.token().balance_of(&locker), 9_500);

    ok(
        &mut d,
        &owner,
        NeonAction::SetExcludedFromAntiWhale { account: locker, excluded: true },
    );
    let resp = ok(&mut d, &owner, NeonAction::Unlock { token: Some(token), recipient: carol });
    assert_eq!(amount(&resp), 9_500);
    // 9500: tax 475, burn 95, liquify 380
    assert_eq!(d.token().balance_of(&carol), 9_025);
    assert_eq!(d.token().balance_of(&locker), 0);
    assert_eq!(d.token().balance_of(&BURN_ADDRESS), 100 + 95);
    assert_eq!(d.token().balance_of(&token), 400 + 380);
    assert!(d.audit().is_ok());
}

// ============================================================================
// 4. OWNERSHIP
// ============================================================================

#[test]
fn test_04_locker_ownership_handover() {
    let owner = Address::from_seed("owner");
    let carol = Address::from_seed("carol");
    let mut d = Deployment::new(owner);
    let lp = deploy_lp(&mut d, &owner);
    let locker = d.locker().address();
    ok(&mut d, &owner, NeonAction::Transfer { token: Some(lp), to: locker, amount: 500 });

    ok(
        &mut d,
        &owner,
        NeonAction::TransferOwnership {
            contract: ContractKind::Locker,
            new_owner: carol,
        },
    );
    // token ownership is untouched
    assert_eq!(d.token().owner(), owner);
    assert_eq!(d.locker().owner(), carol);

    fail(&mut d, &owner, NeonAction::Unlock { token: Some(lp), recipient: owner });
    ok(&mut d, &carol, NeonAction::Unlock { token: Some(lp), recipient: carol });
    assert_eq!(d.bep20(&lp).unwrap().balance_of(&carol), 500);

    ok(&mut d, &carol, NeonAction::RenounceOwnership { contract: ContractKind::Locker });
    fail(&mut d, &carol, NeonAction::Unlock { token: Some(lp), recipient: carol });
}

// ============================================================================
// 5. UNKNOWN TOKEN
// ============================================================================

#[test]
fn test_05_unknown_token() {
    let owner = Address::from_seed("owner");
    let mut d = Deployment::new(owner);
    let nowhere = Address::from_seed("nowhere");
    let resp = fail(&mut d, &owner, NeonAction::Unlock { token: Some(nowhere), recipient: owner });
    assert_eq!(resp.error_kind.as_deref(), Some("unknown_contract"));
    assert_eq!(resp.message, format!("no contract deployed at {}", nowhere));
}
