//! Script instances and the contract address derived from them.
//!
//! Deposit and withdraw both go through [`contract_for`], so the two legs
//! always parameterize the scripts identically and land on the same address.

use tracing::debug;

use ledgerdash_script::{
    derive_address, payment_credential, script_credential, Address, Credential, InstantiatedScript, KeyHash, Network,
    OwnerParams, ScriptKind, MINT_SPEND, WITHDRAW_PUBLISH,
};

use crate::error::ActionError;

/// The scripts behind one wallet's contract address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    /// MintSpend instance guarding outputs at the address.
    pub spend: InstantiatedScript,
    /// WithdrawPublish instance bound to the owner, used as the stake part.
    pub stake: InstantiatedScript,
    /// Base address: spend payment credential, stake staking credential.
    pub address: Address,
}

/// The MintSpend script as a minting policy.
pub fn mint_policy() -> Result<InstantiatedScript, ActionError> {
    let policy = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &())?;
    debug!(policy_id = %policy.hash(), "instantiated minting policy");
    Ok(policy)
}

/// Derive the contract owned by `owner` on `network`.
pub fn contract_for(network: Network, owner: KeyHash) -> Result<Contract, ActionError> {
    let spend = MINT_SPEND.instantiate(ScriptKind::SpendingValidator, &())?;
    let stake = WITHDRAW_PUBLISH.instantiate(ScriptKind::Validator, &OwnerParams { owner })?;
    let address = derive_address(network, script_credential(&spend), Some(script_credential(&stake)));
    debug!(%network, %owner, %address, "derived contract address");
    Ok(Contract { spend, stake, address })
}

/// Key hash of the wallet's payment credential.
pub fn wallet_owner(address: &Address) -> Result<KeyHash, ActionError> {
    match payment_credential(address)? {
        Credential::Key(hash) => Ok(hash),
        Credential::Script(hash) => Err(ActionError::MalformedAddress(format!(
            "wallet payment credential is a script ({hash})"
        ))),
    }
}
