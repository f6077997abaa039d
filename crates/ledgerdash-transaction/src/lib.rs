/// ledgerdash - Transaction plans, values, and metadata.
///
/// Provides asset units and signed asset bundles, output values, UTXO
/// references, CIP-25 metadata, the validating transaction plan builder,
/// and the signable/signed transaction forms with body encoding and ids.

pub mod assets;
pub mod input;
pub mod metadata;
pub mod output;
pub mod plan;
pub mod transaction;

mod error;
pub use error::TransactionError;
pub use assets::{AssetBundle, AssetName, AssetUnit};
pub use input::{OutRef, Utxo};
pub use metadata::{cip25_nft, Metadata, Metadatum, CIP25_LABEL};
pub use output::{TxOutput, Value};
pub use plan::{new_tx, PlannedInput, TransactionPlan, TxBuilder};
pub use transaction::{SignableTransaction, SignedTransaction, TxId, VKeyWitness};

#[cfg(test)]
mod tests;
