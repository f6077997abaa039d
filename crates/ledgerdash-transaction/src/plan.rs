//! Transaction plans and the validating builder that assembles them.
//!
//! A plan lists everything an action wants from a transaction (consumed
//! UTXOs, outputs, minted or burned assets, scripts, redeemers, required
//! signers, metadata) but leaves fee balancing and coin selection to the
//! wallet's `complete` step. Plans are immutable once built.

use std::collections::{BTreeMap, BTreeSet};

use ledgerdash_script::{payment_credential, Address, Credential, InstantiatedScript, KeyHash, PlutusData, PolicyId, ScriptKind};

use crate::assets::AssetBundle;
use crate::input::Utxo;
use crate::metadata::{Metadata, Metadatum};
use crate::output::{TxOutput, Value};
use crate::TransactionError;

/// A consumed UTXO and, for script-locked outputs, its redeemer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInput {
    /// The output being consumed.
    pub utxo: Utxo,
    /// Redeemer for a script-locked output, `None` for key-locked ones.
    pub redeemer: Option<PlutusData>,
}

/// A validated, immutable transaction plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPlan {
    inputs: Vec<PlannedInput>,
    outputs: Vec<TxOutput>,
    mint: AssetBundle,
    mint_redeemers: BTreeMap<PolicyId, PlutusData>,
    scripts: Vec<InstantiatedScript>,
    required_signers: Vec<KeyHash>,
    metadata: Option<Metadata>,
}

impl TransactionPlan {
    /// Inputs the plan itself consumes, in the order they were collected.
    ///
    /// Wallet-selected funding inputs are added later, at completion.
    pub fn inputs(&self) -> &[PlannedInput] {
        &self.inputs
    }

    /// Outputs the plan pays to, before any change output.
    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    /// Net minted (positive) and burned (negative) assets.
    pub fn mint(&self) -> &AssetBundle {
        &self.mint
    }

    /// Redeemer supplied for `policy`'s minting script.
    ///
    /// # Arguments
    /// * `policy` - A policy referenced by [`TransactionPlan::mint`].
    ///
    /// # Returns
    /// `None` if the plan mints nothing under `policy`.
    pub fn mint_redeemer(&self, policy: &PolicyId) -> Option<&PlutusData> {
        self.mint_redeemers.get(policy)
    }

    /// Scripts attached for the plan's mints and script inputs.
    pub fn scripts(&self) -> &[InstantiatedScript] {
        &self.scripts
    }

    /// Key hashes whose signatures the transaction must carry, deduplicated.
    pub fn required_signers(&self) -> &[KeyHash] {
        &self.required_signers
    }

    /// Auxiliary metadata, if any was attached.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Number of redeemers the plan carries (mint policies plus script inputs).
    pub fn redeemer_count(&self) -> usize {
        self.mint_redeemers.len() + self.inputs.iter().filter(|i| i.redeemer.is_some()).count()
    }

    /// Sum of the values of all planned inputs.
    pub fn input_value(&self) -> Result<Value, TransactionError> {
        self.inputs
            .iter()
            .try_fold(Value::default(), |acc, input| acc.checked_add(input.utxo.value()))
    }

    /// Sum of the values of all planned outputs.
    pub fn output_value(&self) -> Result<Value, TransactionError> {
        self.outputs
            .iter()
            .try_fold(Value::default(), |acc, output| acc.checked_add(&output.value))
    }
}

/// Start an empty transaction builder.
pub fn new_tx() -> TxBuilder {
    TxBuilder::new()
}

/// Incremental builder for a [`TransactionPlan`].
///
/// Each step only records what was asked for; every consistency check runs
/// in [`TxBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    inputs: Vec<PlannedInput>,
    outputs: Vec<TxOutput>,
    mints: Vec<(AssetBundle, PlutusData)>,
    scripts: Vec<InstantiatedScript>,
    signers: Vec<KeyHash>,
    signer_addresses: Vec<Address>,
    metadata: Vec<(u64, Metadatum)>,
}

impl TxBuilder {
    /// An empty builder. Same as [`new_tx`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint (positive) or burn (negative) `assets`, validated by `redeemer`.
    pub fn mint_assets(mut self, assets: AssetBundle, redeemer: PlutusData) -> Self {
        self.mints.push((assets, redeemer));
        self
    }

    /// Consume `utxos`. Script-locked outputs need a redeemer.
    pub fn collect_from(mut self, utxos: impl IntoIterator<Item = Utxo>, redeemer: Option<PlutusData>) -> Self {
        self.inputs.extend(utxos.into_iter().map(|utxo| PlannedInput {
            utxo,
            redeemer: redeemer.clone(),
        }));
        self
    }

    /// Pay `value` to `address` with no datum.
    ///
    /// # Arguments
    /// * `address` - Recipient, key or script address.
    /// * `value` - Lovelace plus any native assets.
    ///
    /// # Returns
    /// The builder, for chaining.
    pub fn pay_to_address(mut self, address: Address, value: Value) -> Self {
        self.outputs.push(TxOutput::new(address, value));
        self
    }

    /// Add a fully formed output, e.g. one carrying an inline datum.
    pub fn pay_to_output(mut self, output: TxOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Attach a script that a mint or script input of this plan runs.
    ///
    /// `build` rejects plans that mint under a policy, or spend from a script
    /// address, without the matching script attached.
    ///
    /// # Arguments
    /// * `script` - An instantiated minting policy or validator.
    pub fn attach_script(mut self, script: InstantiatedScript) -> Self {
        self.scripts.push(script);
        self
    }

    /// Require a signature from `key_hash`.
    ///
    /// # Arguments
    /// * `key_hash` - Payment key hash; duplicates are dropped by `build`.
    ///
    /// # Returns
    /// The builder, for chaining.
    pub fn add_signer(mut self, key_hash: KeyHash) -> Self {
        self.signers.push(key_hash);
        self
    }

    /// Require a signature from the payment key of `address`.
    pub fn add_signer_address(mut self, address: Address) -> Self {
        self.signer_addresses.push(address);
        self
    }

    /// Attach `value` under metadata `label`.
    ///
    /// Label clashes and oversized strings surface as errors from `build`.
    pub fn attach_metadata(mut self, label: u64, value: Metadatum) -> Self {
        self.metadata.push((label, value));
        self
    }

    /// Validate the recorded steps and produce the plan.
    pub fn build(self) -> Result<TransactionPlan, TransactionError> {
        if self.inputs.is_empty() && self.outputs.is_empty() && self.mints.is_empty() {
            return Err(TransactionError::InvalidPlan("plan has no inputs, outputs or mints".to_string()));
        }

        let mut seen = BTreeSet::new();
        for input in &self.inputs {
            if !seen.insert(input.utxo.out_ref) {
                return Err(TransactionError::InvalidPlan(format!(
                    "input {} collected twice",
                    input.utxo.out_ref
                )));
            }
        }

        let attached = |kind: ScriptKind, hash: &PolicyId| {
            self.scripts.iter().any(|s| s.kind() == kind && &s.hash() == hash)
        };

        let mut mint = AssetBundle::new();
        let mut mint_redeemers: BTreeMap<PolicyId, PlutusData> = BTreeMap::new();
        for (assets, redeemer) in &self.mints {
            if assets.is_empty() {
                return Err(TransactionError::InvalidPlan("empty mint".to_string()));
            }
            for policy in assets.policies() {
                if let Some(existing) = mint_redeemers.get(&policy) {
                    if existing != redeemer {
                        return Err(TransactionError::InvalidPlan(format!(
                            "conflicting redeemers for policy {}",
                            policy
                        )));
                    }
                }
                if !attached(ScriptKind::MintingPolicy, &policy) {
                    return Err(TransactionError::InvalidPlan(format!(
                        "no minting policy attached for {}",
                        policy
                    )));
                }
                mint_redeemers.insert(policy, redeemer.clone());
            }
            mint.merge(assets)?;
        }

        for input in &self.inputs {
            match (input.utxo.address().payment(), &input.redeemer) {
                (Some(Credential::Script(hash)), Some(_)) => {
                    if !attached(ScriptKind::SpendingValidator, &hash) {
                        return Err(TransactionError::InvalidPlan(format!(
                            "no spending validator attached for {}",
                            input.utxo.out_ref
                        )));
                    }
                }
                (Some(Credential::Script(_)), None) => {
                    return Err(TransactionError::InvalidPlan(format!(
                        "script input {} has no redeemer",
                        input.utxo.out_ref
                    )));
                }
                (_, Some(_)) => {
                    return Err(TransactionError::InvalidPlan(format!(
                        "key input {} given a redeemer",
                        input.utxo.out_ref
                    )));
                }
                (_, None) => {}
            }
        }

        let mut required_signers = self.signers;
        for address in &self.signer_addresses {
            match payment_credential(address)? {
                Credential::Key(hash) => required_signers.push(hash),
                Credential::Script(_) => {
                    return Err(TransactionError::InvalidPlan(format!(
                        "signer address {} is script-locked",
                        address
                    )))
                }
            }
        }
        let mut unique = BTreeSet::new();
        required_signers.retain(|hash| unique.insert(*hash));

        let metadata = if self.metadata.is_empty() {
            None
        } else {
            let mut metadata = Metadata::new();
            for (label, value) in self.metadata {
                metadata.insert(label, value)?;
            }
            Some(metadata)
        };

        Ok(TransactionPlan {
            inputs: self.inputs,
            outputs: self.outputs,
            mint,
            mint_redeemers,
            scripts: self.scripts,
            required_signers,
            metadata,
        })
    }
}
