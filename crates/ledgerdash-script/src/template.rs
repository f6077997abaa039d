//! Script template store.
//!
//! The compiled validators used by the dashboard are fixed byte constants.
//! They are normalized into the double-wrapped CBOR form once, on first
//! access, and shared read-only for the rest of the process.

use std::fmt;
use std::sync::OnceLock;

use ledgerdash_primitives::cbor::{decode_bytes, encode_bytes};

use crate::error::ScriptError;
use crate::script::PlutusVersion;

/// Mint/spend validator, single CBOR-wrapped.
const MINT_SPEND_CBOR: &str = "58ea010100323232323232322533300232323232323253233300930010021323370e6eb40152054375c601a60166ea800c54ccc024cdc3a4004004264646464a66601a600a601c6ea80084c8c94cccccc0540080040040044cdc39bad002481500044c94cccccc0540080040040040044cdc79bae00248810d48656c6c6f2c20576f726c64210014a06022601e6ea8008528a999806180218069baa0071533300f300e375400e2930b0b18079808001180700098059baa00316370e900018041baa001300a300b0023009001300900230070013004375400229309b2b2b9a5573aaae7955cfaba15744ae901";

/// Withdraw/publish validator parameterized by an owner key hash, single CBOR-wrapped.
const WITHDRAW_PUBLISH_CBOR: &str = "5901110101003232323232322322533300432323232323232533300b3370e900200109919198019bac301130123012301230123012301230123012300f3754010016a66601866e1d2000300d375400a2a66601e601c6ea80145261616300f300d37540062a66601666e1d200600213232323233005375860266028602860286028602860286028602860226ea80280354ccc038cdc3a4000601e6ea801c54ccc044c040dd50038a4c2c2c602260240046eb4c040004c034dd50018b1119198008008019129998088008a50132533300f3371e6eb8c04c008010528899801801800980980098051baa001300c300d002300b001300b00230090013006375400229309b2b1bae0015734aae7555cf2ab9f5742ae89";

/// The role a template plays in the dashboard's actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScriptRole {
    /// Minting policy for the demo token, also the contract's spending validator.
    MintSpend,
    /// Staking validator that gates withdrawals on the owner's signature.
    WithdrawPublish,
}

impl ScriptRole {
    /// Every role the store holds a template for.
    pub const ALL: [ScriptRole; 2] = [ScriptRole::MintSpend, ScriptRole::WithdrawPublish];
}

impl fmt::Display for ScriptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptRole::MintSpend => f.write_str("MintSpend"),
            ScriptRole::WithdrawPublish => f.write_str("WithdrawPublish"),
        }
    }
}

/// An immutable compiled validator in double-wrapped CBOR form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    role: ScriptRole,
    version: PlutusVersion,
    arity: usize,
    double_cbor: Vec<u8>,
}

impl ScriptTemplate {
    /// Build a template from script bytes in either single- or double-wrapped form.
    pub fn new(role: ScriptRole, version: PlutusVersion, arity: usize, script: &[u8]) -> Result<Self, ScriptError> {
        let double_cbor = apply_double_cbor_encoding(script)?;
        let flat = decode_bytes(&decode_bytes(&double_cbor)?)?;
        if flat.is_empty() {
            return Err(ScriptError::InvalidScriptEncoding(format!("{} template is empty", role)));
        }
        Ok(ScriptTemplate {
            role,
            version,
            arity,
            double_cbor,
        })
    }

    pub fn role(&self) -> ScriptRole {
        self.role
    }

    /// Execution semantics version every instance of this template carries.
    pub fn version(&self) -> PlutusVersion {
        self.version
    }

    /// Number of parameters the template body expects.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Template bytes as distributed, wrapped in two CBOR byte strings.
    pub fn double_cbor(&self) -> &[u8] {
        &self.double_cbor
    }

    /// The script with one CBOR layer removed, as hashed by the ledger.
    pub fn single_cbor(&self) -> Result<Vec<u8>, ScriptError> {
        Ok(decode_bytes(&self.double_cbor)?)
    }

    /// The raw flat-encoded program.
    pub fn flat_bytes(&self) -> Result<Vec<u8>, ScriptError> {
        Ok(decode_bytes(&self.single_cbor()?)?)
    }
}

/// Normalize script bytes to the double-wrapped CBOR form.
///
/// Bytes already wrapped twice are returned unchanged, bytes wrapped once
/// gain a second layer. Anything that is not a CBOR byte string is rejected.
pub fn apply_double_cbor_encoding(script: &[u8]) -> Result<Vec<u8>, ScriptError> {
    let inner = decode_bytes(script)
        .map_err(|e| ScriptError::InvalidScriptEncoding(format!("not a CBOR byte string: {}", e)))?;
    if decode_bytes(&inner).is_ok() {
        Ok(script.to_vec())
    } else {
        Ok(encode_bytes(script)?)
    }
}

struct TemplateStore {
    mint_spend: ScriptTemplate,
    withdraw_publish: ScriptTemplate,
}

impl TemplateStore {
    fn load() -> Result<Self, ScriptError> {
        let decode = |role: ScriptRole, text: &str| {
            hex::decode(text).map_err(|e| ScriptError::TemplateStore(format!("{} template: {}", role, e)))
        };
        let mint_spend = ScriptTemplate::new(
            ScriptRole::MintSpend,
            PlutusVersion::V3,
            0,
            &decode(ScriptRole::MintSpend, MINT_SPEND_CBOR)?,
        )?;
        let withdraw_publish = ScriptTemplate::new(
            ScriptRole::WithdrawPublish,
            PlutusVersion::V3,
            1,
            &decode(ScriptRole::WithdrawPublish, WITHDRAW_PUBLISH_CBOR)?,
        )?;
        Ok(TemplateStore {
            mint_spend,
            withdraw_publish,
        })
    }

    fn get(&self, role: ScriptRole) -> &ScriptTemplate {
        match role {
            ScriptRole::MintSpend => &self.mint_spend,
            ScriptRole::WithdrawPublish => &self.withdraw_publish,
        }
    }
}

static STORE: OnceLock<Result<TemplateStore, String>> = OnceLock::new();

fn store() -> Result<&'static TemplateStore, ScriptError> {
    STORE
        .get_or_init(|| TemplateStore::load().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| ScriptError::TemplateStore(e.clone()))
}

/// Eagerly initialize the template store, surfacing any deployment error.
///
/// Calling this is optional; `get_template` initializes on first use.
pub fn init_templates() -> Result<(), ScriptError> {
    store().map(|_| ())
}

/// Look up the template for `role`.
pub fn get_template(role: ScriptRole) -> Result<&'static ScriptTemplate, ScriptError> {
    Ok(store()?.get(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_initializes() {
        init_templates().unwrap();
        for role in ScriptRole::ALL {
            let template = get_template(role).unwrap();
            assert_eq!(template.role(), role);
            assert_eq!(template.version(), PlutusVersion::V3);
        }
    }

    #[test]
    fn templates_are_double_wrapped() {
        let mint = get_template(ScriptRole::MintSpend).unwrap();
        assert_eq!(hex::encode(&mint.double_cbor()[..4]), "58ec58ea");
        assert_eq!(mint.arity(), 0);

        let withdraw = get_template(ScriptRole::WithdrawPublish).unwrap();
        assert_eq!(hex::encode(&withdraw.double_cbor()[..4]), "59011459");
        assert_eq!(withdraw.arity(), 1);
    }

    #[test]
    fn double_encoding_is_idempotent() {
        let single = hex::decode(MINT_SPEND_CBOR).unwrap();
        let double = apply_double_cbor_encoding(&single).unwrap();
        assert_eq!(double.len(), single.len() + 2);
        assert_eq!(apply_double_cbor_encoding(&double).unwrap(), double);
    }

    #[test]
    fn double_encoding_rejects_non_bytes() {
        let err = apply_double_cbor_encoding(&[0x01, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidScriptEncoding(_)));
        assert!(apply_double_cbor_encoding(&[]).is_err());
    }

    #[test]
    fn empty_program_is_rejected() {
        let err = ScriptTemplate::new(ScriptRole::MintSpend, PlutusVersion::V3, 0, &[0x41, 0x40]).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidScriptEncoding(_)));
    }
}
