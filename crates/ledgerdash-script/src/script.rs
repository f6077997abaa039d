//! Script instantiation.
//!
//! A template becomes a concrete script by applying its parameters to the
//! program body. Instances are plain values recomputed per use: the withdraw
//! script depends on the calling wallet's key hash, so nothing is cached.

use std::fmt;
use std::marker::PhantomData;

use ledgerdash_primitives::cbor::{decode_bytes, encode_bytes};
use ledgerdash_primitives::hash::blake2b_224;

use crate::credential::{KeyHash, ScriptHash};
use crate::error::ScriptError;
use crate::flat::FlatProgram;
use crate::plutus_data::PlutusData;
use crate::template::{get_template, ScriptRole, ScriptTemplate};

/// Execution semantics version of a Plutus script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlutusVersion {
    V1,
    V2,
    V3,
}

impl PlutusVersion {
    /// Language tag prepended to the script bytes when hashing.
    pub fn tag(self) -> u8 {
        match self {
            PlutusVersion::V1 => 1,
            PlutusVersion::V2 => 2,
            PlutusVersion::V3 => 3,
        }
    }
}

impl fmt::Display for PlutusVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlutusVersion::V1 => f.write_str("PlutusV1"),
            PlutusVersion::V2 => f.write_str("PlutusV2"),
            PlutusVersion::V3 => f.write_str("PlutusV3"),
        }
    }
}

/// How an instantiated script is used in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    MintingPolicy,
    SpendingValidator,
    /// Any other purpose, e.g. a staking credential.
    Validator,
}

/// A template with its parameters applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiatedScript {
    role: ScriptRole,
    kind: ScriptKind,
    version: PlutusVersion,
    single_cbor: Vec<u8>,
}

impl InstantiatedScript {
    /// Template this script was instantiated from.
    pub fn role(&self) -> ScriptRole {
        self.role
    }

    /// Purpose the script was instantiated for.
    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// Plutus language version, which selects the hash tag byte.
    pub fn version(&self) -> PlutusVersion {
        self.version
    }

    /// Script bytes wrapped once, the form that is hashed and witnessed.
    pub fn single_cbor(&self) -> &[u8] {
        &self.single_cbor
    }

    /// Script bytes wrapped twice, the form templates are distributed in.
    pub fn double_cbor(&self) -> Result<Vec<u8>, ScriptError> {
        Ok(encode_bytes(&self.single_cbor)?)
    }

    /// Ledger script hash: `blake2b_224(version_tag || single_cbor)`.
    pub fn hash(&self) -> ScriptHash {
        let mut preimage = Vec::with_capacity(self.single_cbor.len() + 1);
        preimage.push(self.version.tag());
        preimage.extend_from_slice(&self.single_cbor);
        ScriptHash::new(blake2b_224(&preimage))
    }

    /// Reuse the same script bytes for a different purpose.
    pub fn with_kind(mut self, kind: ScriptKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Instantiate a template that takes no parameters.
pub fn identity(template: &ScriptTemplate, kind: ScriptKind) -> Result<InstantiatedScript, ScriptError> {
    apply(template, kind, &[])
}

/// Apply `params` to `template` in declaration order.
///
/// Deterministic: equal inputs always produce byte-identical scripts.
pub fn apply(
    template: &ScriptTemplate,
    kind: ScriptKind,
    params: &[PlutusData],
) -> Result<InstantiatedScript, ScriptError> {
    if params.len() != template.arity() {
        return Err(ScriptError::ParameterArityMismatch {
            expected: template.arity(),
            got: params.len(),
        });
    }

    let single_cbor = if params.is_empty() {
        template.single_cbor()?
    } else {
        let flat = decode_bytes(&template.single_cbor()?)?;
        let program = FlatProgram::parse(&flat)?;
        encode_bytes(&program.apply_data(params)?)?
    };

    Ok(InstantiatedScript {
        role: template.role(),
        kind,
        version: template.version(),
        single_cbor,
    })
}

/// A typed parameter list for one template.
pub trait ScriptParams {
    /// Number of parameters produced by `to_data`.
    const ARITY: usize;

    fn to_data(&self) -> Vec<PlutusData>;
}

impl ScriptParams for () {
    const ARITY: usize = 0;

    fn to_data(&self) -> Vec<PlutusData> {
        Vec::new()
    }
}

/// Parameters of the withdraw/publish validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerParams {
    /// Payment key hash of the depositor allowed to withdraw.
    pub owner: KeyHash,
}

impl ScriptParams for OwnerParams {
    const ARITY: usize = 1;

    fn to_data(&self) -> Vec<PlutusData> {
        vec![PlutusData::from(self.owner)]
    }
}

/// A template role bound to its parameter type.
pub struct TypedTemplate<P> {
    role: ScriptRole,
    _params: PhantomData<fn(&P)>,
}

impl<P: ScriptParams> TypedTemplate<P> {
    /// Typed handle on the template stored for `role`.
    pub const fn new(role: ScriptRole) -> Self {
        TypedTemplate {
            role,
            _params: PhantomData,
        }
    }

    pub fn role(&self) -> ScriptRole {
        self.role
    }

    /// Apply `params` to the stored template.
    ///
    /// # Arguments
    /// * `kind` - Purpose of the resulting script.
    /// * `params` - Typed parameters, converted to Plutus data in order.
    ///
    /// # Returns
    /// The applied script, or `TemplateStore` / `ParameterArityMismatch`.
    pub fn instantiate(&self, kind: ScriptKind, params: &P) -> Result<InstantiatedScript, ScriptError> {
        let template = get_template(self.role)?;
        apply(template, kind, &params.to_data())
    }
}

/// Mint/spend validator, no parameters.
pub const MINT_SPEND: TypedTemplate<()> = TypedTemplate::new(ScriptRole::MintSpend);

/// Withdraw/publish validator, parameterized by the owner's key hash.
pub const WITHDRAW_PUBLISH: TypedTemplate<OwnerParams> = TypedTemplate::new(ScriptRole::WithdrawPublish);
