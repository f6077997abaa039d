//! In-memory ledger emulator.
//!
//! Plays the roles of chain, wallet, and broadcaster at once. It keeps a
//! UTXO set, balances plans with a linear fee and largest-first coin
//! selection, signs on behalf of a single payment key, and validates
//! submissions (unspent inputs, required signatures, value conservation)
//! before applying them. Scripts are not evaluated.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ledgerdash_primitives::hash::blake2b_256;
use ledgerdash_primitives::Hash32;
use ledgerdash_script::{derive_address, Address, Credential, KeyHash, Network};
use ledgerdash_transaction::{
    AssetUnit, OutRef, SignableTransaction, SignedTransaction, TransactionPlan, TxId, TxOutput, Utxo, VKeyWitness,
    Value,
};

use crate::error::WalletError;
use crate::provider::{Broadcaster, ChainQuery, WalletInterface};

const MAX_FEE_ROUNDS: usize = 8;
/// Rough size of one vkey witness (key plus signature plus framing).
const VKEY_WITNESS_SIZE: u64 = 101;
const REDEEMER_SIZE: u64 = 24;

/// Protocol parameters used by the emulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Network the wallet's addresses are derived for.
    pub network: Network,
    /// Fee per transaction byte.
    pub min_fee_a: u64,
    /// Constant fee per transaction.
    pub min_fee_b: u64,
    /// Smallest change output the wallet will create.
    pub min_change_lovelace: u64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            network: Network::Preprod,
            min_fee_a: 44,
            min_fee_b: 155_381,
            min_change_lovelace: 1_000_000,
        }
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    utxos: BTreeMap<OutRef, TxOutput>,
    submitted: Vec<TxId>,
    genesis_counter: u64,
}

/// A single-wallet in-memory ledger.
#[derive(Debug)]
pub struct Emulator {
    config: EmulatorConfig,
    key_hash: KeyHash,
    address: Address,
    state: RefCell<LedgerState>,
    reject_signing: Cell<bool>,
    query_outage: Cell<bool>,
}

impl Emulator {
    /// An emulator whose wallet is the enterprise address of `key_hash`.
    pub fn new(config: EmulatorConfig, key_hash: KeyHash) -> Self {
        let address = derive_address(config.network, Credential::Key(key_hash), None);
        Emulator {
            config,
            key_hash,
            address,
            state: RefCell::new(LedgerState::default()),
            reject_signing: Cell::new(false),
            query_outage: Cell::new(false),
        }
    }

    /// Protocol parameters in use.
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Payment key hash of the emulated wallet.
    pub fn key_hash(&self) -> KeyHash {
        self.key_hash
    }

    /// Create a genesis output of `value` at `address`.
    pub fn fund(&self, address: Address, value: Value) -> OutRef {
        let mut state = self.state.borrow_mut();
        state.genesis_counter += 1;
        let mut seed = b"genesis".to_vec();
        seed.extend_from_slice(&state.genesis_counter.to_be_bytes());
        let out_ref = OutRef::new(Hash32::new(blake2b_256(&seed)), 0);
        state.utxos.insert(out_ref, TxOutput::new(address, value));
        out_ref
    }

    /// Insert an arbitrary UTXO, replacing any existing one with the same reference.
    pub fn add_utxo(&self, utxo: Utxo) {
        self.state.borrow_mut().utxos.insert(utxo.out_ref, utxo.output);
    }

    /// Snapshot of the whole UTXO set.
    pub fn utxos(&self) -> Vec<Utxo> {
        self.state
            .borrow()
            .utxos
            .iter()
            .map(|(out_ref, output)| Utxo::new(*out_ref, output.clone()))
            .collect()
    }

    /// Total value held at `address`.
    pub fn balance(&self, address: &Address) -> Result<Value, WalletError> {
        let state = self.state.borrow();
        let mut total = Value::default();
        for output in state.utxos.values().filter(|o| &o.address == address) {
            total = total.checked_add(&output.value)?;
        }
        Ok(total)
    }

    /// Ids of accepted transactions, in submission order.
    pub fn submitted(&self) -> Vec<TxId> {
        self.state.borrow().submitted.clone()
    }

    /// Make the wallet decline every signing request.
    pub fn set_reject_signing(&self, reject: bool) {
        self.reject_signing.set(reject);
    }

    /// Make chain queries fail as if the node were unreachable.
    pub fn set_query_outage(&self, outage: bool) {
        self.query_outage.set(outage);
    }

    fn query<F>(&self, filter: F) -> Result<Vec<Utxo>, WalletError>
    where
        F: Fn(&TxOutput) -> bool,
    {
        if self.query_outage.get() {
            return Err(WalletError::Query("chain state unavailable".to_string()));
        }
        Ok(self
            .state
            .borrow()
            .utxos
            .iter()
            .filter(|(_, output)| filter(output))
            .map(|(out_ref, output)| Utxo::new(*out_ref, output.clone()))
            .collect())
    }

    fn min_fee(&self, tx: &SignableTransaction) -> Result<u64, WalletError> {
        let plan = tx.plan();
        let signers = 1 + plan.required_signers().len() as u64;
        let scripts: u64 = plan.scripts().iter().map(|s| s.single_cbor().len() as u64).sum();
        let metadata = match plan.metadata() {
            Some(m) => m.to_cbor()?.len() as u64,
            None => 0,
        };
        let size = tx.body_cbor().len() as u64
            + signers * VKEY_WITNESS_SIZE
            + scripts
            + plan.redeemer_count() as u64 * REDEEMER_SIZE
            + metadata;
        Ok(self.config.min_fee_a * size + self.config.min_fee_b)
    }

    /// Pick wallet inputs, largest first, until the plan plus `fee` balances
    /// with either no change or change above the minimum.
    fn select(
        &self,
        plan: &TransactionPlan,
        fee: u64,
        available: &[Utxo],
    ) -> Result<(Vec<Utxo>, Option<TxOutput>), WalletError> {
        let required = plan.output_value()?.checked_add(&Value::lovelace(fee))?;
        let mut inputs = plan.input_value()?;
        let mut selected = Vec::new();
        let mut candidates = available.iter();
        loop {
            if let Ok(change) = inputs
                .apply_mint(plan.mint())
                .and_then(|consumed| consumed.checked_sub(&required))
            {
                if change == Value::default() {
                    return Ok((selected, None));
                }
                if change.lovelace >= self.config.min_change_lovelace {
                    return Ok((selected, Some(TxOutput::new(self.address, change))));
                }
            }
            let next = candidates.next().ok_or_else(|| {
                WalletError::Completion(format!("insufficient funds: need {:?} plus change", required))
            })?;
            inputs = inputs.checked_add(next.value())?;
            selected.push(next.clone());
        }
    }

    fn witness(&self, tx_id: &TxId) -> VKeyWitness {
        let mut preimage = self.key_hash.as_bytes().to_vec();
        preimage.extend_from_slice(tx_id.as_bytes());
        VKeyWitness {
            key_hash: self.key_hash,
            signature: blake2b_256(&preimage).to_vec(),
        }
    }
}

impl ChainQuery for Emulator {
    async fn utxos_at(&self, address: &Address) -> Result<Vec<Utxo>, WalletError> {
        self.query(|output| &output.address == address)
    }

    async fn utxos_at_with_unit(&self, address: &Address, unit: &AssetUnit) -> Result<Vec<Utxo>, WalletError> {
        self.query(|output| &output.address == address && output.value.quantity_of(unit) > 0)
    }
}

impl WalletInterface for Emulator {
    fn address(&self) -> Address {
        self.address
    }

    fn network(&self) -> Network {
        self.config.network
    }

    async fn complete(&self, plan: TransactionPlan) -> Result<SignableTransaction, WalletError> {
        let planned: Vec<OutRef> = plan.inputs().iter().map(|i| i.utxo.out_ref).collect();
        let mut available: Vec<Utxo> = self
            .state
            .borrow()
            .utxos
            .iter()
            .filter(|(out_ref, output)| output.address == self.address && !planned.contains(out_ref))
            .map(|(out_ref, output)| Utxo::new(*out_ref, output.clone()))
            .collect();
        available.sort_by(|a, b| {
            b.value()
                .lovelace
                .cmp(&a.value().lovelace)
                .then_with(|| a.out_ref.cmp(&b.out_ref))
        });

        let mut fee = self.config.min_fee_b;
        for _ in 0..MAX_FEE_ROUNDS {
            let (extra, change) = self.select(&plan, fee, &available)?;
            let tx = SignableTransaction::new(plan.clone(), extra, change, fee)?;
            let required = self.min_fee(&tx)?;
            if required <= fee {
                debug!(fee, inputs = tx.inputs().count(), "completed transaction");
                return Ok(tx);
            }
            fee = required;
        }
        Err(WalletError::Completion("fee did not converge".to_string()))
    }

    async fn sign(&self, tx: SignableTransaction) -> Result<SignedTransaction, WalletError> {
        if self.reject_signing.get() {
            return Err(WalletError::SigningRejected("user declined to sign".to_string()));
        }
        let witness = self.witness(&tx.tx_id());
        Ok(tx.into_signed(vec![witness]))
    }
}

impl Broadcaster for Emulator {
    async fn submit(&self, signed: &SignedTransaction) -> Result<TxId, WalletError> {
        let tx = signed.transaction();
        let tx_id = signed.tx_id();
        let mut state = self.state.borrow_mut();

        for utxo in tx.inputs() {
            match state.utxos.get(&utxo.out_ref) {
                Some(output) if output == &utxo.output => {}
                Some(_) => {
                    return Err(WalletError::SubmissionRejected(format!(
                        "input {} does not match chain state",
                        utxo.out_ref
                    )))
                }
                None => {
                    return Err(WalletError::SubmissionRejected(format!(
                        "input {} is spent or unknown",
                        utxo.out_ref
                    )))
                }
            }
            if let Some(Credential::Key(owner)) = utxo.address().payment() {
                if !signed.is_signed_by(&owner) {
                    return Err(WalletError::SubmissionRejected(format!(
                        "missing signature for input {}",
                        utxo.out_ref
                    )));
                }
            }
        }

        for signer in tx.plan().required_signers() {
            if !signed.is_signed_by(signer) {
                return Err(WalletError::SubmissionRejected(format!("missing required signer {}", signer)));
            }
        }

        if tx.consumed()? != tx.produced()? {
            return Err(WalletError::SubmissionRejected("value not conserved".to_string()));
        }
        if tx.fee() < self.min_fee(tx)? {
            return Err(WalletError::SubmissionRejected(format!("fee {} below minimum", tx.fee())));
        }

        for utxo in tx.inputs() {
            state.utxos.remove(&utxo.out_ref);
        }
        for (index, output) in tx.outputs().enumerate() {
            let index = u32::try_from(index)
                .map_err(|_| WalletError::SubmissionRejected("too many outputs".to_string()))?;
            state.utxos.insert(OutRef::new(tx_id, index), output.clone());
        }
        state.submitted.push(tx_id);
        debug!(%tx_id, "emulator accepted transaction");
        Ok(tx_id)
    }
}
