//! Mint and burn plans for the demo token.

use ledgerdash_script::{Address, InstantiatedScript};
use ledgerdash_transaction::{cip25_nft, new_tx, AssetBundle, AssetName, AssetUnit, TransactionPlan, Utxo};

use super::mint_redeemer;
use crate::config::MintConfig;
use crate::error::ActionError;

/// The asset unit `policy ++ asset_name` controlled by `policy`.
pub fn token_unit(policy: &InstantiatedScript, config: &MintConfig) -> Result<AssetUnit, ActionError> {
    let name = AssetName::from_text(&config.asset_name)?;
    Ok(AssetUnit::new(policy.hash(), name))
}

/// Mint `config.quantity` of the token with its CIP-25 metadata.
///
/// No inputs are planned; the wallet covers fees when completing.
pub fn build_mint_plan(policy: InstantiatedScript, config: &MintConfig) -> Result<TransactionPlan, ActionError> {
    let unit = token_unit(&policy, config)?;
    let metadata = cip25_nft(&unit.policy, &config.asset_name, &config.asset_name, &config.image);
    let plan = new_tx()
        .mint_assets(AssetBundle::single(unit, config.quantity)?, mint_redeemer())
        .attach_script(policy)
        .attach_metadata(config.metadata_label, metadata)
        .build()?;
    Ok(plan)
}

/// Burn `config.quantity` of the token out of `holdings`.
///
/// `holdings` are the wallet UTXOs carrying the token unit. They are all
/// consumed; any surplus returns to the wallet as change.
pub fn build_burn_plan(
    policy: InstantiatedScript,
    config: &MintConfig,
    wallet: &Address,
    holdings: Vec<Utxo>,
) -> Result<TransactionPlan, ActionError> {
    let unit = token_unit(&policy, config)?;
    let held: u128 = holdings.iter().map(|u| u128::from(u.value().quantity_of(&unit))).sum();
    if holdings.is_empty() || held < u128::from(config.quantity.unsigned_abs()) {
        return Err(ActionError::InsufficientAssetUtxo {
            unit,
            address: *wallet,
        });
    }
    let burn = AssetBundle::single(unit, config.quantity)?.negate()?;
    let plan = new_tx()
        .collect_from(holdings, None)
        .mint_assets(burn, mint_redeemer())
        .attach_script(policy)
        .build()?;
    Ok(plan)
}
