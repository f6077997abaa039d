#![deny(missing_docs)]

//! Ledger dashboard transaction core.
//!
//! Re-exports all ledgerdash components for convenient single-crate usage.

pub use ledgerdash_actions as actions;
pub use ledgerdash_primitives as primitives;
pub use ledgerdash_script as script;
pub use ledgerdash_transaction as transaction;
pub use ledgerdash_wallet as wallet;
