/// ledgerdash - Plutus scripts, credentials, and addresses.
///
/// Provides the fixed script template store, Plutus data encoding, the flat
/// program codec used to apply parameters to a template, credential
/// derivation from scripts and keys, and Shelley address construction with
/// bech32 rendering.

pub mod address;
pub mod bech32;
pub mod credential;
pub mod flat;
pub mod plutus_data;
pub mod script;
pub mod template;

mod error;
pub use error::ScriptError;
pub use address::{derive_address, payment_credential, Address, Network, NetworkId, Pointer, RewardAddress, ShelleyAddress, StakeReference};
pub use credential::{policy_id, script_credential, script_hash_to_credential, Credential, KeyHash, PolicyId, ScriptHash};
pub use plutus_data::PlutusData;
pub use script::{apply, identity, InstantiatedScript, OwnerParams, PlutusVersion, ScriptKind, ScriptParams, TypedTemplate, MINT_SPEND, WITHDRAW_PUBLISH};
pub use template::{apply_double_cbor_encoding, get_template, init_templates, ScriptRole, ScriptTemplate};
