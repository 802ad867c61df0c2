// ============================================================================
// E2E SCENARIO REPLAY TEST
// ============================================================================
//
// Replays the shipped scenario files under scenarios/ (the same files the
// `neon-cli simulate` command runs) and checks final balances, plus a JSON
// round trip of the whole deployment state.
//
// Run:
//   cargo test --test e2e_scenarios -- --nocapture
//
// ============================================================================

use neon_core::{Address, Deployment, NeonAction, NeonConfig, Scenario, BURN_ADDRESS};

const TOKEN_TAX: &str = include_str!("../scenarios/token_tax.json");
const LOCKER_REFERRAL: &str = include_str!("../scenarios/locker_referral.json");

fn seed(label: &str) -> Address {
    Address::from_seed(label)
}

#[test]
fn test_token_tax_scenario() {
    let sim = Scenario::from_json(TOKEN_TAX)
        .unwrap()
        .run(&NeonConfig::default())
        .unwrap();
    for step in &sim.steps {
        assert!(
            step.matches_expectation(),
            "step {} ({}) -> {}",
            step.index,
            step.action,
            step.response.message
        );
    }

    let t = sim.deployment.token();
    assert_eq!(t.balance_of(&seed("alice")), 9_964_057);
    assert_eq!(t.balance_of(&seed("bob")), 11_728 + 19 + 1_173);
    assert_eq!(t.balance_of(&seed("carol")), 21_228);
    assert_eq!(t.balance_of(&BURN_ADDRESS), 346 + 61);
    assert_eq!(t.balance_of(&t.address()), 1_388);
    assert_eq!(t.burn_rate(), 100);
    assert_eq!(t.operator(), seed("operator"));
    assert!(sim.deployment.audit().is_ok());
}

#[test]
fn test_locker_referral_scenario() {
    let sim = Scenario::from_json(LOCKER_REFERRAL)
        .unwrap()
        .run(&NeonConfig::default())
        .unwrap();
    assert!(sim.passed());

    let d = &sim.deployment;
    assert_eq!(d.token().balance_of(&d.locker().address()), 0);
    assert_eq!(d.token().balance_of(&seed("carol")), 9_025);
    assert_eq!(d.referral().get_referrer(&seed("alice")), Some(seed("referrer")));
    assert_eq!(d.referral().get_referrer(&seed("carol")), None);
    assert_eq!(d.referral().referrals_count(&seed("referrer")), 1);
    assert_eq!(d.referral().referrals_count(&seed("bob")), 0);
    assert_eq!(d.referral().total_referral_commissions(&seed("referrer")), 111);
    assert_eq!(d.bep20_tokens().count(), 1);
    assert!(d.audit().is_ok());
}

#[test]
fn test_config_changes_replay() {
    let mut config = NeonConfig::default();
    config.token.transfer_tax_rate = 0;
    let sim = Scenario::from_json(TOKEN_TAX).unwrap().run(&config).unwrap();
    let t = sim.deployment.token();
    // 12345 arrives untaxed
    assert_eq!(sim.steps[2].response.data.as_deref().map(|s| s.contains("\"send\":\"12345\"")), Some(true));
    assert_eq!(t.balance_of(&BURN_ADDRESS), 0);
    assert_eq!(t.balance_of(&t.address()), 0);
}

#[test]
fn test_deployment_state_roundtrip() {
    let sim = Scenario::from_json(LOCKER_REFERRAL)
        .unwrap()
        .run(&NeonConfig::default())
        .unwrap();
    let json = serde_json::to_string(&sim.deployment).unwrap();
    let mut restored: Deployment = serde_json::from_str(&json).unwrap();

    assert_eq!(
        restored.token().balance_of(&seed("carol")),
        sim.deployment.token().balance_of(&seed("carol"))
    );
    assert_eq!(restored.referral().get_referrer(&seed("alice")), Some(seed("referrer")));
    assert_eq!(restored.token().events(), sim.deployment.token().events());

    // the restored deployment keeps working, nonces included
    let resp = restored.execute(
        &seed("owner"),
        NeonAction::DeployBep20 {
            name: "LPToken2".to_string(),
            symbol: "LP2".to_string(),
            decimals: 18,
            total_supply: 1,
        },
    );
    assert!(resp.success, "{}", resp.message);
    assert_eq!(restored.bep20_tokens().count(), 2);
}
