//! Output references and unspent outputs.

use std::fmt;
use std::str::FromStr;

use ledgerdash_script::{Address, Credential};

use crate::output::{TxOutput, Value};
use crate::transaction::TxId;
use crate::TransactionError;

/// Reference to an output of a previous transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutRef {
    pub tx_id: TxId,
    pub index: u32,
}

impl OutRef {
    /// Reference output `index` of transaction `tx_id`.
    pub fn new(tx_id: TxId, index: u32) -> Self {
        OutRef { tx_id, index }
    }
}

impl fmt::Display for OutRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tx_id, self.index)
    }
}

impl FromStr for OutRef {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tx_id, index) = s
            .split_once('#')
            .ok_or_else(|| TransactionError::InvalidPlan(format!("'{}' is not txid#index", s)))?;
        let index = index
            .parse()
            .map_err(|_| TransactionError::InvalidPlan(format!("bad output index '{}'", index)))?;
        Ok(OutRef {
            tx_id: tx_id.parse()?,
            index,
        })
    }
}

/// An unspent output as reported by chain state. Read-only input to plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub out_ref: OutRef,
    pub output: TxOutput,
}

impl Utxo {
    pub fn new(out_ref: OutRef, output: TxOutput) -> Self {
        Utxo { out_ref, output }
    }

    /// Address the UTXO is locked at.
    pub fn address(&self) -> &Address {
        &self.output.address
    }

    /// Value the UTXO holds.
    pub fn value(&self) -> &Value {
        &self.output.value
    }

    /// True if spending this output requires a script (and a redeemer).
    pub fn is_script_locked(&self) -> bool {
        matches!(self.output.address.payment(), Some(Credential::Script(_)))
    }
}
