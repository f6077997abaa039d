//! Plan factories for the four dashboard actions.
//!
//! Each factory is a pure function from configuration, derived scripts and
//! already-queried chain state to a validated `TransactionPlan`. Nothing here
//! suspends; the chain queries happen before the factory is called.

pub mod mint;
pub mod spend;

use ledgerdash_script::PlutusData;

pub use mint::{build_burn_plan, build_mint_plan, token_unit};
pub use spend::{build_deposit_plan, build_withdraw_plan};

/// Redeemer the deployed policy expects for mint and burn.
pub fn mint_redeemer() -> PlutusData {
    PlutusData::integer(42)
}

/// Redeemer for spending from the contract address, `Constr 0 []`.
pub fn spend_redeemer() -> PlutusData {
    PlutusData::void()
}
