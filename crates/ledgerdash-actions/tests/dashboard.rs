use ledgerdash_actions::{
    contract_for, Action, ActionError, ActionObserver, ConfigError, Dashboard, DashboardConfig, FailureKind,
};
use ledgerdash_script::{KeyHash, Network};
use ledgerdash_transaction::{TxId, Value};
use ledgerdash_wallet::{Emulator, EmulatorConfig, WalletInterface};

fn owner() -> KeyHash {
    "9493315cd92eb5d8c4304e67b7e16ae36d61d34502694657811a2c8e".parse().unwrap()
}

fn dashboard(lovelace: u64) -> Dashboard<Emulator> {
    let emulator = Emulator::new(EmulatorConfig::default(), owner());
    emulator.fund(emulator.address(), Value::lovelace(lovelace));
    Dashboard::new(emulator, DashboardConfig::default()).unwrap()
}

#[derive(Default)]
struct Recorder {
    successes: Vec<(Action, TxId)>,
    errors: Vec<(Action, FailureKind)>,
}

impl ActionObserver for Recorder {
    fn on_success(&mut self, action: Action, tx_id: TxId) {
        self.successes.push((action, tx_id));
    }

    fn on_error(&mut self, action: Action, error: ActionError) {
        self.errors.push((action, error.kind()));
    }
}

#[tokio::test]
async fn mint_then_burn_nets_to_zero() {
    let dash = dashboard(50_000_000);
    let wallet = dash.ledger().address();
    let plan = dash.plan(Action::Mint).await.unwrap();
    let (unit, quantity) = plan.mint().iter().next().map(|(u, q)| (u.clone(), q)).unwrap();
    assert_eq!(quantity, 42);
    assert_eq!(unit.name.as_text(), Some("42 Token"));

    dash.run(Action::Mint).await.unwrap();
    assert_eq!(dash.ledger().balance(&wallet).unwrap().quantity_of(&unit), 42);

    dash.run(Action::Burn).await.unwrap();
    assert_eq!(dash.ledger().balance(&wallet).unwrap().quantity_of(&unit), 0);
    assert_eq!(dash.ledger().submitted().len(), 2);
}

#[tokio::test]
async fn burn_without_holdings() {
    let dash = dashboard(50_000_000);
    let err = dash.run(Action::Burn).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::InsufficientAssetUtxo);
    assert!(err.is_retryable());
    assert!(dash.ledger().submitted().is_empty());
}

#[tokio::test]
async fn deposit_then_withdraw() {
    let dash = dashboard(100_000_000);
    let contract = dash.contract_address().unwrap();
    assert_eq!(contract, contract_for(Network::Preprod, owner()).unwrap().address);

    dash.run(Action::Deposit).await.unwrap();
    assert_eq!(dash.ledger().balance(&contract).unwrap(), Value::lovelace(42_000_000));

    let withdraw = dash.plan(Action::Withdraw).await.unwrap();
    assert_eq!(withdraw.inputs().len(), 1);
    assert_eq!(withdraw.inputs()[0].utxo.address(), &contract);

    dash.run(Action::Withdraw).await.unwrap();
    assert_eq!(dash.ledger().balance(&contract).unwrap(), Value::default());

    let fees: u64 = 100_000_000 - dash.ledger().balance(&dash.ledger().address()).unwrap().lovelace;
    assert!(fees > 0 && fees < 2_000_000, "fees {fees}");
}

#[tokio::test]
async fn withdraw_with_nothing_locked() {
    let dash = dashboard(50_000_000);
    let err = dash.run(Action::Withdraw).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoFundsAtContractAddress);
    assert!(matches!(err, ActionError::NoFundsAtContractAddress { address } if address == dash.contract_address().unwrap()));
}

#[tokio::test]
async fn plans_are_deterministic() {
    let dash = dashboard(50_000_000);
    for action in [Action::Mint, Action::Deposit] {
        assert_eq!(dash.plan(action).await.unwrap(), dash.plan(action).await.unwrap());
    }
}

#[tokio::test]
async fn observer_receives_every_outcome() {
    let dash = dashboard(100_000_000);
    let mut recorder = Recorder::default();

    dash.invoke(Action::Deposit, &mut recorder).await;
    dash.invoke(Action::Burn, &mut recorder).await;

    dash.ledger().set_reject_signing(true);
    dash.invoke(Action::Mint, &mut recorder).await;

    dash.ledger().set_reject_signing(false);
    dash.ledger().set_query_outage(true);
    dash.invoke(Action::Withdraw, &mut recorder).await;

    assert_eq!(recorder.successes.len(), 1);
    assert_eq!(recorder.successes[0].0, Action::Deposit);
    assert_eq!(
        recorder.errors,
        vec![
            (Action::Burn, FailureKind::InsufficientAssetUtxo),
            (Action::Mint, FailureKind::SigningRejected),
            (Action::Withdraw, FailureKind::Query),
        ]
    );
    assert_eq!(dash.ledger().submitted().len(), 1);
}

#[tokio::test]
async fn unfunded_wallet_fails_completion() {
    let dash = dashboard(0);
    let err = dash.run(Action::Deposit).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::CompletionFailed);
}

#[tokio::test]
async fn actions_parse_from_trigger_names() {
    let dash = dashboard(100_000_000);
    let mut recorder = Recorder::default();
    for name in ["deposit", "WITHDRAW"] {
        dash.invoke(name.parse().unwrap(), &mut recorder).await;
    }
    assert!(recorder.errors.is_empty());
    assert_eq!(recorder.successes.len(), 2);
}

#[test]
fn dashboard_rejects_invalid_config() {
    let emulator = Emulator::new(EmulatorConfig::default(), owner());
    let config = DashboardConfig::from_toml_str("[deposit]\nlovelace = 1\n").unwrap();
    assert_eq!(config.deposit.lovelace, 1);

    let mut bad = DashboardConfig::default();
    bad.mint.quantity = 0;
    let err = Dashboard::new(emulator, bad).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
