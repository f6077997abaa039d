//! Completed transactions: the balanced body ready for signing, and the
//! signed form handed to a broadcaster.
//!
//! # Body encoding
//!
//! | Key | Field              | Present when          |
//! |-----|--------------------|-----------------------|
//! | 0   | inputs             | always                |
//! | 1   | outputs            | always                |
//! | 2   | fee                | always                |
//! | 7   | auxiliary data hash| metadata attached     |
//! | 9   | mint               | assets minted/burned  |
//! | 14  | required signers   | signers requested     |
//!
//! The transaction id is the Blake2b-256 digest of the encoded body. Both
//! are computed once, when the transaction is balanced.

use minicbor::encode::{Error, Write};
use minicbor::{Encode, Encoder};

use ledgerdash_primitives::cbor;
use ledgerdash_primitives::hash::blake2b_256;
use ledgerdash_primitives::Hash32;
use ledgerdash_script::KeyHash;

use crate::input::{OutRef, Utxo};
use crate::output::{encode_multiasset, TxOutput, Value};
use crate::plan::TransactionPlan;
use crate::TransactionError;

/// Transaction identifier.
pub type TxId = Hash32;

/// A balanced transaction awaiting signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableTransaction {
    plan: TransactionPlan,
    extra_inputs: Vec<Utxo>,
    change: Option<TxOutput>,
    fee: u64,
    body: Vec<u8>,
    id: TxId,
}

impl SignableTransaction {
    /// Combine a plan with the wallet's balancing decisions.
    ///
    /// Fails unless inputs plus mint exactly cover outputs, change and fee.
    pub fn new(
        plan: TransactionPlan,
        extra_inputs: Vec<Utxo>,
        change: Option<TxOutput>,
        fee: u64,
    ) -> Result<Self, TransactionError> {
        let mut tx = SignableTransaction {
            plan,
            extra_inputs,
            change,
            fee,
            body: Vec::new(),
            id: TxId::default(),
        };
        let produced = tx.produced()?;
        let consumed = tx.consumed()?;
        if produced != consumed {
            return Err(TransactionError::InvalidPlan(format!(
                "unbalanced: consumes {:?}, produces {:?}",
                consumed, produced
            )));
        }
        let auxiliary_data_hash = tx.plan.metadata().map(|m| m.hash()).transpose()?;
        let body = cbor::to_vec(&TxBody {
            tx: &tx,
            auxiliary_data_hash,
        })?;
        tx.id = TxId::new(blake2b_256(&body));
        tx.body = body;
        Ok(tx)
    }

    pub fn plan(&self) -> &TransactionPlan {
        &self.plan
    }

    /// Fee in lovelace, fixed at balancing.
    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// Change returned to the wallet, if any was needed.
    pub fn change(&self) -> Option<&TxOutput> {
        self.change.as_ref()
    }

    /// Wallet-selected inputs added on top of the plan's own.
    pub fn extra_inputs(&self) -> &[Utxo] {
        &self.extra_inputs
    }

    /// Every consumed UTXO, plan inputs first.
    pub fn inputs(&self) -> impl Iterator<Item = &Utxo> {
        self.plan
            .inputs()
            .iter()
            .map(|input| &input.utxo)
            .chain(self.extra_inputs.iter())
    }

    /// Every produced output, change last.
    pub fn outputs(&self) -> impl Iterator<Item = &TxOutput> {
        self.plan.outputs().iter().chain(self.change.iter())
    }

    /// Inputs plus minted assets.
    pub fn consumed(&self) -> Result<Value, TransactionError> {
        let inputs = self
            .inputs()
            .try_fold(Value::default(), |acc, utxo| acc.checked_add(utxo.value()))?;
        inputs.apply_mint(self.plan.mint())
    }

    /// Outputs plus fee.
    pub fn produced(&self) -> Result<Value, TransactionError> {
        let outputs = self
            .outputs()
            .try_fold(Value::default(), |acc, output| acc.checked_add(&output.value))?;
        outputs.checked_add(&Value::lovelace(self.fee))
    }

    /// The encoded transaction body.
    pub fn body_cbor(&self) -> &[u8] {
        &self.body
    }

    /// Blake2b-256 of [`SignableTransaction::body_cbor`].
    pub fn tx_id(&self) -> TxId {
        self.id
    }

    /// Attach witnesses, producing the submittable form.
    pub fn into_signed(self, witnesses: Vec<VKeyWitness>) -> SignedTransaction {
        SignedTransaction { tx: self, witnesses }
    }
}

/// Borrowed view of a balanced transaction, in body encoding order.
struct TxBody<'a> {
    tx: &'a SignableTransaction,
    auxiliary_data_hash: Option<Hash32>,
}

impl<C> Encode<C> for TxBody<'_> {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, ctx: &mut C) -> Result<(), Error<W::Error>> {
        let plan = &self.tx.plan;

        let mut fields = 3;
        if self.auxiliary_data_hash.is_some() {
            fields += 1;
        }
        if !plan.mint().is_empty() {
            fields += 1;
        }
        if !plan.required_signers().is_empty() {
            fields += 1;
        }
        e.map(fields)?;

        // inputs form a set on chain, encoded in ascending order
        let mut refs: Vec<OutRef> = self.tx.inputs().map(|utxo| utxo.out_ref).collect();
        refs.sort();
        e.u64(0)?.array(refs.len() as u64)?;
        for out_ref in &refs {
            e.array(2)?;
            out_ref.tx_id.encode(e, ctx)?;
            e.u32(out_ref.index)?;
        }

        let outputs: Vec<&TxOutput> = self.tx.outputs().collect();
        e.u64(1)?.array(outputs.len() as u64)?;
        for output in outputs {
            output.encode(e, ctx)?;
        }

        e.u64(2)?.u64(self.tx.fee)?;

        if let Some(hash) = &self.auxiliary_data_hash {
            e.u64(7)?;
            hash.encode(e, ctx)?;
        }

        if !plan.mint().is_empty() {
            e.u64(9)?;
            encode_multiasset(e, plan.mint().iter().map(|(unit, q)| (unit, i128::from(q))))?;
        }

        if !plan.required_signers().is_empty() {
            e.u64(14)?.array(plan.required_signers().len() as u64)?;
            for signer in plan.required_signers() {
                signer.encode(e, ctx)?;
            }
        }
        Ok(())
    }
}

/// A signature by one payment key over the transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VKeyWitness {
    pub key_hash: KeyHash,
    pub signature: Vec<u8>,
}

/// A transaction with its key witnesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: SignableTransaction,
    witnesses: Vec<VKeyWitness>,
}

impl SignedTransaction {
    pub fn transaction(&self) -> &SignableTransaction {
        &self.tx
    }

    pub fn witnesses(&self) -> &[VKeyWitness] {
        &self.witnesses
    }

    pub fn tx_id(&self) -> TxId {
        self.tx.tx_id()
    }

    /// Whether a witness for `key_hash` is attached.
    pub fn is_signed_by(&self, key_hash: &KeyHash) -> bool {
        self.witnesses.iter().any(|w| &w.key_hash == key_hash)
    }
}
