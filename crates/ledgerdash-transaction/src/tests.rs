//! Tests for the ledgerdash-transaction crate.
//!
//! Covers builder validation, plan equality, balancing in
//! `SignableTransaction::new`, and the body encoding and id.

use ledgerdash_primitives::Hash32;
use ledgerdash_script::{
    derive_address, policy_id, script_credential, Address, Credential, KeyHash, Network, PlutusData, ScriptKind,
    MINT_SPEND,
};

use crate::assets::{AssetBundle, AssetName, AssetUnit};
use crate::input::{OutRef, Utxo};
use crate::metadata::{cip25_nft, CIP25_LABEL};
use crate::output::{TxOutput, Value};
use crate::plan::new_tx;
use crate::transaction::{SignableTransaction, VKeyWitness};
use crate::TransactionError;

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

fn owner() -> KeyHash {
    "9493315cd92eb5d8c4304e67b7e16ae36d61d34502694657811a2c8e".parse().unwrap()
}

fn wallet_address() -> Address {
    derive_address(Network::Preprod, Credential::Key(owner()), None)
}

fn script_address() -> Address {
    let spend = MINT_SPEND.instantiate(ScriptKind::SpendingValidator, &()).unwrap();
    derive_address(Network::Preprod, script_credential(&spend), None)
}

fn utxo(seed: u8, index: u32, address: Address, value: Value) -> Utxo {
    Utxo::new(OutRef::new(Hash32::new([seed; 32]), index), TxOutput::new(address, value))
}

fn token_unit() -> AssetUnit {
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
    AssetUnit::new(policy_id(&policy), AssetName::from_text("42 Token").unwrap())
}

// -----------------------------------------------------------------------
// Builder validation
// -----------------------------------------------------------------------

#[test]
fn mint_plan_carries_bundle_redeemer_and_metadata() {
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
    let id = policy_id(&policy);
    let plan = new_tx()
        .mint_assets(AssetBundle::single(token_unit(), 42).unwrap(), PlutusData::integer(42))
        .attach_script(policy)
        .attach_metadata(
            CIP25_LABEL,
            cip25_nft(&id, "42 Token", "42 Token", "https://avatars.githubusercontent.com/u/1"),
        )
        .build()
        .unwrap();

    assert_eq!(plan.mint().get(&token_unit()), 42);
    assert_eq!(plan.mint_redeemer(&id), Some(&PlutusData::integer(42)));
    assert!(plan.metadata().unwrap().get(CIP25_LABEL).is_some());
    assert_eq!(plan.redeemer_count(), 1);
}

#[test]
fn empty_plan_rejected() {
    assert!(matches!(new_tx().build(), Err(TransactionError::InvalidPlan(_))));
}

#[test]
fn mint_without_policy_rejected() {
    let err = new_tx()
        .mint_assets(AssetBundle::single(token_unit(), 1).unwrap(), PlutusData::integer(42))
        .build()
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidPlan(_)));
}

#[test]
fn policy_attached_with_wrong_kind_rejected() {
    let spend = MINT_SPEND.instantiate(ScriptKind::SpendingValidator, &()).unwrap();
    let err = new_tx()
        .mint_assets(AssetBundle::single(token_unit(), 1).unwrap(), PlutusData::integer(42))
        .attach_script(spend)
        .build()
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidPlan(_)));
}

#[test]
fn conflicting_mint_redeemers_rejected() {
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
    let err = new_tx()
        .mint_assets(AssetBundle::single(token_unit(), 1).unwrap(), PlutusData::integer(42))
        .mint_assets(AssetBundle::single(token_unit(), 1).unwrap(), PlutusData::void())
        .attach_script(policy)
        .build()
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidPlan(_)));
}

#[test]
fn duplicate_inputs_rejected() {
    let u = utxo(1, 0, wallet_address(), Value::lovelace(5_000_000));
    let err = new_tx()
        .collect_from(vec![u.clone(), u], None)
        .build()
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidPlan(_)));
}

#[test]
fn script_inputs_need_redeemer_and_validator() {
    let locked = utxo(2, 0, script_address(), Value::lovelace(42_000_000));
    let spend = MINT_SPEND.instantiate(ScriptKind::SpendingValidator, &()).unwrap();

    let missing_redeemer = new_tx()
        .collect_from(vec![locked.clone()], None)
        .attach_script(spend.clone())
        .build();
    assert!(missing_redeemer.is_err());

    let missing_validator = new_tx()
        .collect_from(vec![locked.clone()], Some(PlutusData::void()))
        .build();
    assert!(missing_validator.is_err());

    let plan = new_tx()
        .collect_from(vec![locked], Some(PlutusData::void()))
        .attach_script(spend)
        .add_signer_address(wallet_address())
        .build()
        .unwrap();
    assert_eq!(plan.required_signers(), &[owner()]);
    assert_eq!(plan.inputs()[0].redeemer, Some(PlutusData::void()));
}

#[test]
fn key_inputs_reject_redeemers() {
    let u = utxo(3, 1, wallet_address(), Value::lovelace(1));
    let err = new_tx()
        .collect_from(vec![u], Some(PlutusData::void()))
        .build()
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidPlan(_)));
}

#[test]
fn script_signer_address_rejected() {
    let err = new_tx()
        .pay_to_address(wallet_address(), Value::lovelace(1))
        .add_signer_address(script_address())
        .build()
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidPlan(_)));
}

#[test]
fn signers_are_deduplicated() {
    let plan = new_tx()
        .pay_to_address(wallet_address(), Value::lovelace(1))
        .add_signer(owner())
        .add_signer_address(wallet_address())
        .build()
        .unwrap();
    assert_eq!(plan.required_signers().len(), 1);
}

#[test]
fn building_twice_gives_equal_plans() {
    let build = || {
        new_tx()
            .pay_to_address(script_address(), Value::lovelace(42_000_000))
            .build()
            .unwrap()
    };
    assert_eq!(build(), build());
}

// -----------------------------------------------------------------------
// Balancing and encoding
// -----------------------------------------------------------------------

#[test]
fn signable_requires_balance() {
    let plan = new_tx()
        .pay_to_address(script_address(), Value::lovelace(42_000_000))
        .build()
        .unwrap();
    let funding = utxo(4, 0, wallet_address(), Value::lovelace(50_000_000));
    let change = TxOutput::new(wallet_address(), Value::lovelace(7_800_000));

    let tx = SignableTransaction::new(plan.clone(), vec![funding.clone()], Some(change.clone()), 200_000).unwrap();
    assert_eq!(tx.fee(), 200_000);
    assert_eq!(tx.inputs().count(), 1);
    assert_eq!(tx.outputs().count(), 2);

    let err = SignableTransaction::new(plan, vec![funding], Some(change), 100_000).unwrap_err();
    assert!(matches!(err, TransactionError::InvalidPlan(_)));
}

#[test]
fn minted_assets_count_as_consumed() {
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
    let plan = new_tx()
        .mint_assets(AssetBundle::single(token_unit(), 42).unwrap(), PlutusData::integer(42))
        .attach_script(policy)
        .build()
        .unwrap();
    let funding = utxo(5, 0, wallet_address(), Value::lovelace(3_000_000));
    let change = TxOutput::new(
        wallet_address(),
        Value::lovelace(2_800_000).with_asset(token_unit(), 42).unwrap(),
    );
    assert!(SignableTransaction::new(plan, vec![funding], Some(change), 200_000).is_ok());
}

#[test]
fn tx_id_is_hash_of_body() {
    let plan = new_tx()
        .pay_to_address(script_address(), Value::lovelace(42_000_000))
        .add_signer(owner())
        .build()
        .unwrap();
    let funding = utxo(6, 2, wallet_address(), Value::lovelace(42_170_000));
    let tx = SignableTransaction::new(plan, vec![funding], None, 170_000).unwrap();

    let body = tx.body_cbor().to_vec();
    // map of 4: inputs, outputs, fee, required signers
    assert_eq!(body[0], 0xa4);
    assert_eq!(
        tx.tx_id(),
        Hash32::new(ledgerdash_primitives::hash::blake2b_256(&body))
    );

    let signed = tx.clone().into_signed(vec![VKeyWitness {
        key_hash: owner(),
        signature: vec![0u8; 64],
    }]);
    assert_eq!(signed.tx_id(), tx.tx_id());
    assert!(signed.is_signed_by(&owner()));
}

#[test]
fn different_fee_changes_tx_id() {
    let plan = new_tx()
        .pay_to_address(script_address(), Value::lovelace(1_000_000))
        .build()
        .unwrap();
    let a = SignableTransaction::new(
        plan.clone(),
        vec![utxo(7, 0, wallet_address(), Value::lovelace(1_200_000))],
        None,
        200_000,
    )
    .unwrap();
    let b = SignableTransaction::new(
        plan,
        vec![utxo(7, 0, wallet_address(), Value::lovelace(1_300_000))],
        None,
        300_000,
    )
    .unwrap();
    assert_ne!(a.tx_id(), b.tx_id());
}

#[test]
fn mint_body_commits_to_metadata_and_mint() {
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
    let id = policy_id(&policy);
    let plan = new_tx()
        .mint_assets(AssetBundle::single(token_unit(), 42).unwrap(), PlutusData::integer(42))
        .attach_script(policy)
        .attach_metadata(
            CIP25_LABEL,
            cip25_nft(&id, "42 Token", "42 Token", "https://avatars.githubusercontent.com/u/1"),
        )
        .build()
        .unwrap();
    let funding = utxo(8, 0, wallet_address(), Value::lovelace(2_000_000));
    let change = TxOutput::new(
        wallet_address(),
        Value::lovelace(1_800_000).with_asset(token_unit(), 42).unwrap(),
    );
    let tx = SignableTransaction::new(plan, vec![funding], Some(change), 200_000).unwrap();

    let body = hex::encode(tx.body_cbor());
    // map of 5: inputs, outputs, fee, auxiliary data hash, mint
    assert!(body.starts_with("a5"));
    assert!(body.contains("0758209ca15e7d28e6bcb67f2fdbaf9e7b33e8df2620f75a555b5bfbbf36707e0aa204"));
    assert!(body.ends_with(&format!("09a1581c{}a148343220546f6b656e182a", id.to_hex())));
}
