//! Native assets: names, units, and signed mint/burn bundles.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ledgerdash_script::PolicyId;

use crate::TransactionError;

/// Maximum length of an asset name in bytes.
pub const MAX_ASSET_NAME_LEN: usize = 32;

const POLICY_HEX_LEN: usize = 56;

/// The name part of an asset, up to 32 raw bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetName(Vec<u8>);

impl AssetName {
    /// Asset name from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - At most 32 bytes; the empty name is allowed.
    ///
    /// # Returns
    /// `InvalidAssetName` if the name is too long.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TransactionError> {
        let bytes = bytes.into();
        if bytes.len() > MAX_ASSET_NAME_LEN {
            return Err(TransactionError::InvalidAssetName(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                MAX_ASSET_NAME_LEN
            )));
        }
        Ok(AssetName(bytes))
    }

    /// Asset name from its UTF-8 text, e.g. `"42 Token"`.
    pub fn from_text(text: &str) -> Result<Self, TransactionError> {
        Self::new(text.as_bytes().to_vec())
    }

    /// Asset name from its hex form, as found after the policy id in a unit.
    ///
    /// # Arguments
    /// * `hex_str` - Even-length hex, at most 64 characters.
    ///
    /// # Returns
    /// `InvalidAssetName` for bad hex or an over-long name.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| TransactionError::InvalidAssetName(e.to_string()))?;
        Self::new(bytes)
    }

    /// The raw name bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex of the name bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// The name as text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => write!(f, "AssetName({:?})", text),
            None => write!(f, "AssetName({})", self.to_hex()),
        }
    }
}

/// A fully qualified asset: policy id followed by asset name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetUnit {
    /// Minting policy the asset lives under.
    pub policy: PolicyId,
    /// Name within the policy.
    pub name: AssetName,
}

impl AssetUnit {
    /// Join a policy id and asset name.
    pub fn new(policy: PolicyId, name: AssetName) -> Self {
        AssetUnit { policy, name }
    }
}

impl fmt::Display for AssetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.policy, self.name)
    }
}

impl FromStr for AssetUnit {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < POLICY_HEX_LEN || !s.is_char_boundary(POLICY_HEX_LEN) {
            return Err(TransactionError::InvalidAssetUnit(format!("'{}' is shorter than a policy id", s)));
        }
        let (policy, name) = s.split_at(POLICY_HEX_LEN);
        let policy = PolicyId::from_hex(policy).map_err(|e| TransactionError::InvalidAssetUnit(e.to_string()))?;
        let name = AssetName::from_hex(name).map_err(|e| TransactionError::InvalidAssetUnit(e.to_string()))?;
        Ok(AssetUnit { policy, name })
    }
}

impl Serialize for AssetUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Signed asset quantities keyed by unit. Positive mints, negative burns.
///
/// Entries whose quantity nets to zero are removed, so a bundle never
/// holds a zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBundle(BTreeMap<AssetUnit, i64>);

impl AssetBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bundle with a single entry. Zero quantities are rejected.
    pub fn single(unit: AssetUnit, quantity: i64) -> Result<Self, TransactionError> {
        if quantity == 0 {
            return Err(TransactionError::ZeroQuantity(unit));
        }
        let mut bundle = Self::new();
        bundle.0.insert(unit, quantity);
        Ok(bundle)
    }

    /// Add `quantity` of `unit`, dropping the entry if it nets to zero.
    pub fn add(&mut self, unit: AssetUnit, quantity: i64) -> Result<(), TransactionError> {
        let current = self.0.get(&unit).copied().unwrap_or(0);
        let next = current.checked_add(quantity).ok_or(TransactionError::ValueOverflow)?;
        if next == 0 {
            self.0.remove(&unit);
        } else {
            self.0.insert(unit, next);
        }
        Ok(())
    }

    /// Combine two bundles entry by entry.
    pub fn merge(&mut self, other: &AssetBundle) -> Result<(), TransactionError> {
        for (unit, quantity) in &other.0 {
            self.add(unit.clone(), *quantity)?;
        }
        Ok(())
    }

    /// Flip every quantity, turning a mint into the matching burn.
    ///
    /// # Returns
    /// `ValueOverflow` if a quantity is `i64::MIN`.
    pub fn negate(&self) -> Result<Self, TransactionError> {
        let mut out = BTreeMap::new();
        for (unit, quantity) in &self.0 {
            out.insert(unit.clone(), quantity.checked_neg().ok_or(TransactionError::ValueOverflow)?);
        }
        Ok(AssetBundle(out))
    }

    /// Net quantity of `unit`, zero if absent.
    pub fn get(&self, unit: &AssetUnit) -> i64 {
        self.0.get(unit).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct units.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries in ascending unit order.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetUnit, i64)> {
        self.0.iter().map(|(unit, quantity)| (unit, *quantity))
    }

    /// Distinct policies referenced by the bundle, in ascending order.
    pub fn policies(&self) -> Vec<PolicyId> {
        let mut policies: Vec<PolicyId> = self.0.keys().map(|unit| unit.policy).collect();
        policies.dedup();
        policies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PolicyId {
        "3f3863bda55b4c054ca8ccb1c5f4c824a8f20c2106347e19c027568e".parse().unwrap()
    }

    #[test]
    fn unit_is_policy_then_name_hex() {
        let unit = AssetUnit::new(policy(), AssetName::from_text("42 Token").unwrap());
        assert_eq!(
            unit.to_string(),
            "3f3863bda55b4c054ca8ccb1c5f4c824a8f20c2106347e19c027568e343220546f6b656e"
        );
        assert_eq!(unit.to_string().parse::<AssetUnit>().unwrap(), unit);
    }

    #[test]
    fn unit_without_name() {
        let unit: AssetUnit = "3f3863bda55b4c054ca8ccb1c5f4c824a8f20c2106347e19c027568e".parse().unwrap();
        assert!(unit.name.as_bytes().is_empty());
        assert!("3f38".parse::<AssetUnit>().is_err());
    }

    #[test]
    fn asset_name_length_limit() {
        assert!(AssetName::new(vec![0u8; 32]).is_ok());
        assert!(matches!(
            AssetName::new(vec![0u8; 33]),
            Err(TransactionError::InvalidAssetName(_))
        ));
    }

    #[test]
    fn bundle_nets_to_zero() {
        let unit = AssetUnit::new(policy(), AssetName::from_text("42 Token").unwrap());
        let mut bundle = AssetBundle::single(unit.clone(), 42).unwrap();
        bundle.merge(&AssetBundle::single(unit.clone(), -42).unwrap()).unwrap();
        assert!(bundle.is_empty());
        assert_eq!(bundle.get(&unit), 0);
    }

    #[test]
    fn zero_quantity_rejected() {
        let unit = AssetUnit::new(policy(), AssetName::default());
        assert!(matches!(AssetBundle::single(unit, 0), Err(TransactionError::ZeroQuantity(_))));
    }

    #[test]
    fn negate_flips_signs() {
        let unit = AssetUnit::new(policy(), AssetName::from_text("a").unwrap());
        let bundle = AssetBundle::single(unit.clone(), 7).unwrap();
        assert_eq!(bundle.negate().unwrap().get(&unit), -7);
        assert_eq!(bundle.policies(), vec![policy()]);
    }
}
