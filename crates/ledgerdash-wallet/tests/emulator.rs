use ledgerdash_script::{derive_address, Credential, KeyHash, Network, PlutusData, ScriptKind, MINT_SPEND};
use ledgerdash_transaction::{new_tx, AssetBundle, AssetName, AssetUnit, Value};
use ledgerdash_wallet::{Broadcaster, ChainQuery, Emulator, EmulatorConfig, WalletError, WalletInterface};

fn owner() -> KeyHash {
    "9493315cd92eb5d8c4304e67b7e16ae36d61d34502694657811a2c8e".parse().unwrap()
}

fn funded(lovelace: u64) -> Emulator {
    let emulator = Emulator::new(EmulatorConfig::default(), owner());
    emulator.fund(emulator.address(), Value::lovelace(lovelace));
    emulator
}

fn other_address() -> ledgerdash_script::Address {
    derive_address(Network::Preprod, Credential::Key(KeyHash::new([3; 28])), None)
}

#[tokio::test]
async fn queries_filter_by_address_and_unit() {
    let emulator = funded(10_000_000);
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
    let unit = AssetUnit::new(policy.hash(), AssetName::from_text("42 Token").unwrap());
    emulator.fund(
        emulator.address(),
        Value::lovelace(2_000_000).with_asset(unit.clone(), 42).unwrap(),
    );
    emulator.fund(other_address(), Value::lovelace(1));

    assert_eq!(emulator.utxos_at(&emulator.address()).await.unwrap().len(), 2);
    let holding = emulator.utxos_at_with_unit(&emulator.address(), &unit).await.unwrap();
    assert_eq!(holding.len(), 1);
    assert_eq!(holding[0].value().quantity_of(&unit), 42);
}

#[tokio::test]
async fn query_outage_surfaces_query_error() {
    let emulator = funded(1);
    emulator.set_query_outage(true);
    let err = emulator.utxos_at(&emulator.address()).await.unwrap_err();
    assert!(matches!(err, WalletError::Query(_)));
}

#[tokio::test]
async fn payment_round_trip() {
    let emulator = funded(50_000_000);
    let plan = new_tx()
        .pay_to_address(other_address(), Value::lovelace(42_000_000))
        .build()
        .unwrap();

    let tx = emulator.complete(plan).await.unwrap();
    assert!(tx.fee() > emulator.config().min_fee_b);
    assert_eq!(tx.extra_inputs().len(), 1);
    let change = tx.change().unwrap().value.lovelace;
    assert_eq!(change + tx.fee() + 42_000_000, 50_000_000);

    let signed = emulator.sign(tx).await.unwrap();
    let tx_id = emulator.submit(&signed).await.unwrap();

    assert_eq!(emulator.submitted(), vec![tx_id]);
    assert_eq!(emulator.balance(&other_address()).unwrap().lovelace, 42_000_000);
    assert_eq!(emulator.balance(&emulator.address()).unwrap().lovelace, change);
}

#[tokio::test]
async fn insufficient_funds_fail_completion() {
    let emulator = funded(1_000_000);
    let plan = new_tx()
        .pay_to_address(other_address(), Value::lovelace(42_000_000))
        .build()
        .unwrap();
    let err = emulator.complete(plan).await.unwrap_err();
    assert!(matches!(err, WalletError::Completion(_)));
}

#[tokio::test]
async fn declined_signature() {
    let emulator = funded(50_000_000);
    emulator.set_reject_signing(true);
    let plan = new_tx()
        .pay_to_address(other_address(), Value::lovelace(2_000_000))
        .build()
        .unwrap();
    let tx = emulator.complete(plan).await.unwrap();
    let err = emulator.sign(tx).await.unwrap_err();
    assert!(matches!(err, WalletError::SigningRejected(_)));
    assert!(emulator.submitted().is_empty());
}

#[tokio::test]
async fn double_spend_rejected() {
    let emulator = funded(50_000_000);
    let plan = new_tx()
        .pay_to_address(other_address(), Value::lovelace(2_000_000))
        .build()
        .unwrap();
    let signed = emulator.sign(emulator.complete(plan).await.unwrap()).await.unwrap();
    emulator.submit(&signed).await.unwrap();

    let err = emulator.submit(&signed).await.unwrap_err();
    assert!(matches!(err, WalletError::SubmissionRejected(_)));
}

#[tokio::test]
async fn missing_required_signer_rejected() {
    let emulator = funded(50_000_000);
    let plan = new_tx()
        .pay_to_address(other_address(), Value::lovelace(2_000_000))
        .add_signer(KeyHash::new([9; 28]))
        .build()
        .unwrap();
    let signed = emulator.sign(emulator.complete(plan).await.unwrap()).await.unwrap();
    let err = emulator.submit(&signed).await.unwrap_err();
    assert!(matches!(err, WalletError::SubmissionRejected(_)));
}

#[tokio::test]
async fn minted_assets_land_in_change() {
    let emulator = funded(5_000_000);
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
    let unit = AssetUnit::new(policy.hash(), AssetName::from_text("42 Token").unwrap());
    let plan = new_tx()
        .mint_assets(AssetBundle::single(unit.clone(), 42).unwrap(), PlutusData::integer(42))
        .attach_script(policy)
        .build()
        .unwrap();

    let signed = emulator.sign(emulator.complete(plan).await.unwrap()).await.unwrap();
    emulator.submit(&signed).await.unwrap();
    assert_eq!(emulator.balance(&emulator.address()).unwrap().quantity_of(&unit), 42);
}

#[test]
fn emulator_config_from_toml() {
    let config: EmulatorConfig = toml::from_str("network = \"mainnet\"\nmin_fee_a = 1\n").unwrap();
    assert_eq!(config.network, Network::Mainnet);
    assert_eq!(config.min_fee_a, 1);
    assert_eq!(config.min_fee_b, EmulatorConfig::default().min_fee_b);
}
