//! Credentials: key hashes and script hashes used to gate ownership.

use std::fmt;

use ledgerdash_primitives::Hash28;

use crate::script::InstantiatedScript;

/// Blake2b-224 hash of a payment or stake verification key.
pub type KeyHash = Hash28;
/// Blake2b-224 hash of a tagged script.
pub type ScriptHash = Hash28;
/// Identifier of a minting policy, equal to its script hash.
pub type PolicyId = Hash28;

/// A payment or staking credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Credential {
    /// Owned by a verification key.
    Key(KeyHash),
    /// Owned by a script.
    Script(ScriptHash),
}

impl Credential {
    /// The 28-byte hash carried by either variant.
    ///
    /// # Returns
    /// The key hash or script hash, without its kind.
    pub fn hash(&self) -> &Hash28 {
        match self {
            Credential::Key(hash) | Credential::Script(hash) => hash,
        }
    }

    /// Whether spending requires running a script.
    pub fn is_script(&self) -> bool {
        matches!(self, Credential::Script(_))
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Key(hash) => write!(f, "key:{}", hash),
            Credential::Script(hash) => write!(f, "script:{}", hash),
        }
    }
}

/// Policy id of a minting script.
pub fn policy_id(script: &InstantiatedScript) -> PolicyId {
    script.hash()
}

/// Script credential for any instantiated script.
pub fn script_credential(script: &InstantiatedScript) -> Credential {
    Credential::Script(script.hash())
}

/// Wrap a bare script hash as a script credential.
///
/// # Arguments
/// * `hash` - Script hash, e.g. a policy id read from chain.
///
/// # Returns
/// `Credential::Script(hash)`.
pub fn script_hash_to_credential(hash: ScriptHash) -> Credential {
    Credential::Script(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{ScriptKind, MINT_SPEND};

    #[test]
    fn policy_id_is_script_hash() {
        let script = MINT_SPEND.instantiate(ScriptKind::MintingPolicy, &()).unwrap();
        assert_eq!(policy_id(&script), script.hash());
        assert_eq!(script_credential(&script), Credential::Script(script.hash()));
    }

    #[test]
    fn discriminator_is_preserved() {
        let hash = Hash28::new([1; 28]);
        assert!(script_hash_to_credential(hash).is_script());
        assert!(!Credential::Key(hash).is_script());
        assert_ne!(Credential::Key(hash), Credential::Script(hash));
        assert_eq!(Credential::Key(hash).hash(), &hash);
    }
}
