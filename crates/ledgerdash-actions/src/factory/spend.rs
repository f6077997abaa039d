//! Deposit to and withdraw from the contract address.

use ledgerdash_script::Address;
use ledgerdash_transaction::{new_tx, TransactionPlan, Utxo, Value};

use super::spend_redeemer;
use crate::config::DepositConfig;
use crate::contract::Contract;
use crate::error::ActionError;

/// Pay `config.lovelace` to the contract address.
///
/// Paying to a script address runs no script, so no redeemer is attached.
pub fn build_deposit_plan(contract: &Contract, config: &DepositConfig) -> Result<TransactionPlan, ActionError> {
    let plan = new_tx()
        .pay_to_address(contract.address, Value::lovelace(config.lovelace))
        .build()?;
    Ok(plan)
}

/// Collect every UTXO at the contract address back to the wallet.
///
/// The validator requires the depositor's co-signature, so the wallet's
/// payment key is added as a required signer.
pub fn build_withdraw_plan(
    contract: &Contract,
    wallet: &Address,
    locked: Vec<Utxo>,
) -> Result<TransactionPlan, ActionError> {
    if locked.is_empty() {
        return Err(ActionError::NoFundsAtContractAddress {
            address: contract.address,
        });
    }
    let plan = new_tx()
        .collect_from(locked, Some(spend_redeemer()))
        .attach_script(contract.spend.clone())
        .add_signer_address(*wallet)
        .build()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::contract_for;
    use crate::error::FailureKind;
    use ledgerdash_script::{derive_address, Credential, KeyHash, Network, PlutusData};
    use ledgerdash_transaction::{OutRef, TxOutput};

    fn owner() -> KeyHash {
        KeyHash::new([7; 28])
    }

    fn wallet() -> Address {
        derive_address(Network::Preprod, Credential::Key(owner()), None)
    }

    #[test]
    fn deposit_is_a_plain_payment() {
        let contract = contract_for(Network::Preprod, owner()).unwrap();
        let plan = build_deposit_plan(&contract, &DepositConfig::default()).unwrap();
        assert_eq!(plan.outputs().len(), 1);
        assert_eq!(plan.outputs()[0].address, contract.address);
        assert_eq!(plan.outputs()[0].value, Value::lovelace(42_000_000));
        assert_eq!(plan.redeemer_count(), 0);
        assert!(plan.scripts().is_empty());
        assert!(plan.inputs().is_empty());
    }

    #[test]
    fn withdraw_needs_locked_funds() {
        let contract = contract_for(Network::Preprod, owner()).unwrap();
        let err = build_withdraw_plan(&contract, &wallet(), vec![]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoFundsAtContractAddress);
    }

    #[test]
    fn withdraw_collects_with_void_redeemer_and_signer() {
        let contract = contract_for(Network::Preprod, owner()).unwrap();
        let locked: Vec<Utxo> = (0..3)
            .map(|i| {
                Utxo::new(
                    OutRef::new(Default::default(), i),
                    TxOutput::new(contract.address, Value::lovelace(42_000_000)),
                )
            })
            .collect();
        let plan = build_withdraw_plan(&contract, &wallet(), locked).unwrap();

        assert_eq!(plan.inputs().len(), 3);
        assert!(plan.inputs().iter().all(|i| i.redeemer == Some(PlutusData::void())));
        assert_eq!(plan.required_signers(), &[owner()]);
        assert_eq!(plan.scripts(), &[contract.spend.clone()]);
        assert!(plan.outputs().is_empty());
    }
}
