//! Output values and transaction outputs.

use std::collections::BTreeMap;

use minicbor::data::{Int, Tag};
use minicbor::encode::{Error, Write};
use minicbor::{Encode, Encoder};

use ledgerdash_primitives::cbor;
use ledgerdash_script::{Address, PlutusData};

use crate::assets::{AssetBundle, AssetUnit};
use crate::TransactionError;

/// Lovelace plus a non-negative quantity of each native asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    /// Ada amount in lovelace.
    pub lovelace: u64,
    assets: BTreeMap<AssetUnit, u64>,
}

impl Value {
    /// A value holding only lovelace.
    pub fn lovelace(lovelace: u64) -> Self {
        Value {
            lovelace,
            assets: BTreeMap::new(),
        }
    }

    /// Add `quantity` of `unit`. Zero quantities are ignored.
    pub fn with_asset(mut self, unit: AssetUnit, quantity: u64) -> Result<Self, TransactionError> {
        if quantity > 0 {
            let entry = self.assets.entry(unit).or_insert(0);
            *entry = entry.checked_add(quantity).ok_or(TransactionError::ValueOverflow)?;
        }
        Ok(self)
    }

    /// Quantity of `unit` held, zero if absent.
    pub fn quantity_of(&self, unit: &AssetUnit) -> u64 {
        self.assets.get(unit).copied().unwrap_or(0)
    }

    pub fn assets(&self) -> impl Iterator<Item = (&AssetUnit, u64)> {
        self.assets.iter().map(|(unit, quantity)| (unit, *quantity))
    }

    pub fn has_assets(&self) -> bool {
        !self.assets.is_empty()
    }

    /// Sum of two values.
    ///
    /// # Returns
    /// `ValueOverflow` if lovelace or any asset quantity overflows.
    pub fn checked_add(&self, other: &Value) -> Result<Value, TransactionError> {
        let mut out = self.clone();
        out.lovelace = out
            .lovelace
            .checked_add(other.lovelace)
            .ok_or(TransactionError::ValueOverflow)?;
        for (unit, quantity) in other.assets() {
            out = out.with_asset(unit.clone(), quantity)?;
        }
        Ok(out)
    }

    /// Difference of two values.
    ///
    /// # Arguments
    /// * `other` - Must be covered by `self` for lovelace and every asset.
    ///
    /// # Returns
    /// `InsufficientValue` describing the first shortfall found.
    pub fn checked_sub(&self, other: &Value) -> Result<Value, TransactionError> {
        let mut out = self.clone();
        out.lovelace = out.lovelace.checked_sub(other.lovelace).ok_or_else(|| {
            TransactionError::InsufficientValue(format!("{} lovelace short", other.lovelace - self.lovelace))
        })?;
        for (unit, quantity) in other.assets() {
            out.remove_asset(unit, quantity)?;
        }
        Ok(out)
    }

    /// True if every component of `self` is at least that of `other`.
    pub fn covers(&self, other: &Value) -> bool {
        self.lovelace >= other.lovelace && other.assets().all(|(unit, quantity)| self.quantity_of(unit) >= quantity)
    }

    /// Apply a mint/burn bundle: positive entries are added, negative
    /// entries removed.
    pub fn apply_mint(&self, mint: &AssetBundle) -> Result<Value, TransactionError> {
        let mut out = self.clone();
        for (unit, quantity) in mint.iter() {
            if quantity > 0 {
                out = out.with_asset(unit.clone(), quantity.unsigned_abs())?;
            } else {
                out.remove_asset(unit, quantity.unsigned_abs())?;
            }
        }
        Ok(out)
    }

    fn remove_asset(&mut self, unit: &AssetUnit, quantity: u64) -> Result<(), TransactionError> {
        let held = self.quantity_of(unit);
        let left = held
            .checked_sub(quantity)
            .ok_or_else(|| TransactionError::InsufficientValue(format!("{} of {} held, {} needed", held, unit, quantity)))?;
        if left == 0 {
            self.assets.remove(unit);
        } else {
            self.assets.insert(unit.clone(), left);
        }
        Ok(())
    }
}

/// Ledger value encoding: a bare coin, or `[coin, multiasset]`.
impl<C> Encode<C> for Value {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, _ctx: &mut C) -> Result<(), Error<W::Error>> {
        if self.assets.is_empty() {
            e.u64(self.lovelace)?;
            return Ok(());
        }
        e.array(2)?.u64(self.lovelace)?;
        encode_multiasset(e, self.assets.iter().map(|(unit, q)| (unit, i128::from(*q))))
    }
}

/// Encode `policy => { name => quantity }` from entries sorted by unit.
pub(crate) fn encode_multiasset<'a, W: Write>(
    e: &mut Encoder<W>,
    entries: impl Iterator<Item = (&'a AssetUnit, i128)>,
) -> Result<(), Error<W::Error>> {
    let mut grouped: BTreeMap<&[u8], Vec<(&[u8], i128)>> = BTreeMap::new();
    for (unit, quantity) in entries {
        grouped
            .entry(unit.policy.as_bytes().as_slice())
            .or_default()
            .push((unit.name.as_bytes(), quantity));
    }
    e.map(grouped.len() as u64)?;
    for (policy, names) in grouped {
        e.bytes(policy)?.map(names.len() as u64)?;
        for (name, quantity) in names {
            e.bytes(name)?.int(Int::try_from(quantity).map_err(Error::message)?)?;
        }
    }
    Ok(())
}

/// An output: value locked at an address, optionally with an inline datum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub address: Address,
    pub value: Value,
    pub datum: Option<PlutusData>,
}

impl TxOutput {
    /// An output with no datum.
    pub fn new(address: Address, value: Value) -> Self {
        TxOutput {
            address,
            value,
            datum: None,
        }
    }

    /// Attach `datum` inline.
    pub fn with_datum(mut self, datum: PlutusData) -> Self {
        self.datum = Some(datum);
        self
    }

    /// Encoded output, as it appears in the body's output list.
    pub fn to_cbor(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(cbor::to_vec(self)?)
    }
}

/// Post-Alonzo map form: `{0: address, 1: value, ?2: [1, #6.24(datum)]}`.
impl<C> Encode<C> for TxOutput {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, ctx: &mut C) -> Result<(), Error<W::Error>> {
        e.map(if self.datum.is_some() { 3 } else { 2 })?;
        e.u64(0)?.bytes(&self.address.to_bytes())?;
        e.u64(1)?;
        self.value.encode(e, ctx)?;
        if let Some(datum) = &self.datum {
            let inline = minicbor::to_vec(datum).map_err(Error::message)?;
            e.u64(2)?.array(2)?.u64(1)?.tag(Tag::new(24))?.bytes(&inline)?;
        }
        Ok(())
    }
}
