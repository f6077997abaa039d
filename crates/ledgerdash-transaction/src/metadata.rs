//! Transaction metadata and the CIP-25 NFT schema.
//!
//! Metadata is a map from numeric labels to structured values. Text and
//! byte strings are limited to 64 bytes on chain; longer values are split
//! into a list of chunks. Map keys keep insertion order so that the
//! encoding matches what external indexers expect byte for byte.

use std::collections::BTreeMap;

use minicbor::data::Int;
use minicbor::encode::{Error, Write};
use minicbor::{Encode, Encoder};

use ledgerdash_primitives::cbor;
use ledgerdash_primitives::hash::blake2b_256;
use ledgerdash_primitives::Hash32;
use ledgerdash_script::PolicyId;

use crate::TransactionError;

/// Label reserved for CIP-25 NFT metadata.
pub const CIP25_LABEL: u64 = 721;

/// Longest text or byte string allowed in a single metadatum.
pub const MAX_METADATUM_LEN: usize = 64;

/// A structured metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadatum {
    Int(i128),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<Metadatum>),
    Map(Vec<(Metadatum, Metadatum)>),
}

impl Metadatum {
    /// Text value, split into a list of chunks if longer than 64 bytes.
    pub fn text(value: &str) -> Self {
        if value.len() <= MAX_METADATUM_LEN {
            return Metadatum::Text(value.to_string());
        }
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < value.len() {
            let mut end = (start + MAX_METADATUM_LEN).min(value.len());
            while !value.is_char_boundary(end) {
                end -= 1;
            }
            chunks.push(Metadatum::Text(value[start..end].to_string()));
            start = end;
        }
        Metadatum::List(chunks)
    }

    /// Byte value, split into a list of chunks if longer than 64 bytes.
    pub fn bytes(value: &[u8]) -> Self {
        if value.len() <= MAX_METADATUM_LEN {
            return Metadatum::Bytes(value.to_vec());
        }
        Metadatum::List(
            value
                .chunks(MAX_METADATUM_LEN)
                .map(|chunk| Metadatum::Bytes(chunk.to_vec()))
                .collect(),
        )
    }

    /// Map with text keys, in the given order.
    pub fn text_map<'a>(entries: impl IntoIterator<Item = (&'a str, Metadatum)>) -> Self {
        Metadatum::Map(
            entries
                .into_iter()
                .map(|(key, value)| (Metadatum::text(key), value))
                .collect(),
        )
    }

    fn check(&self) -> Result<(), TransactionError> {
        match self {
            Metadatum::Int(value) => {
                let limit = i128::from(u64::MAX);
                if *value > limit || *value < -limit - 1 {
                    return Err(TransactionError::Metadata(format!("integer {} out of range", value)));
                }
                Ok(())
            }
            Metadatum::Bytes(bytes) if bytes.len() > MAX_METADATUM_LEN => Err(TransactionError::Metadata(
                format!("{} byte string exceeds {}", bytes.len(), MAX_METADATUM_LEN),
            )),
            Metadatum::Text(text) if text.len() > MAX_METADATUM_LEN => Err(TransactionError::Metadata(format!(
                "{} byte text exceeds {}",
                text.len(),
                MAX_METADATUM_LEN
            ))),
            Metadatum::Bytes(_) | Metadatum::Text(_) => Ok(()),
            Metadatum::List(items) => items.iter().try_for_each(Metadatum::check),
            Metadatum::Map(entries) => entries.iter().try_for_each(|(k, v)| {
                k.check()?;
                v.check()
            }),
        }
    }
}

impl<C> Encode<C> for Metadatum {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, ctx: &mut C) -> Result<(), Error<W::Error>> {
        match self {
            Metadatum::Int(value) => {
                e.int(Int::try_from(*value).map_err(Error::message)?)?;
            }
            Metadatum::Bytes(bytes) => {
                e.bytes(bytes)?;
            }
            Metadatum::Text(text) => {
                e.str(text)?;
            }
            Metadatum::List(items) => {
                e.array(items.len() as u64)?;
                for item in items {
                    item.encode(e, ctx)?;
                }
            }
            Metadatum::Map(entries) => {
                e.map(entries.len() as u64)?;
                for (key, value) in entries {
                    key.encode(e, ctx)?;
                    value.encode(e, ctx)?;
                }
            }
        }
        Ok(())
    }
}

impl From<i64> for Metadatum {
    fn from(value: i64) -> Self {
        Metadatum::Int(i128::from(value))
    }
}

impl From<&str> for Metadatum {
    fn from(value: &str) -> Self {
        Metadatum::text(value)
    }
}

/// Transaction metadata: labelled values, encoded in ascending label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<u64, Metadatum>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `value` under `label`. Each label may be used once.
    pub fn insert(&mut self, label: u64, value: Metadatum) -> Result<(), TransactionError> {
        value.check()?;
        if self.0.contains_key(&label) {
            return Err(TransactionError::Metadata(format!("label {} attached twice", label)));
        }
        self.0.insert(label, value);
        Ok(())
    }

    /// Value attached under `label`.
    pub fn get(&self, label: u64) -> Option<&Metadatum> {
        self.0.get(&label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encoded metadata map, the preimage of [`Metadata::hash`].
    pub fn to_cbor(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(cbor::to_vec(self)?)
    }

    /// Auxiliary data hash committed to by the transaction body.
    pub fn hash(&self) -> Result<Hash32, TransactionError> {
        Ok(Hash32::new(blake2b_256(&self.to_cbor()?)))
    }
}

impl<C> Encode<C> for Metadata {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, ctx: &mut C) -> Result<(), Error<W::Error>> {
        e.map(self.0.len() as u64)?;
        for (label, value) in &self.0 {
            e.u64(*label)?;
            value.encode(e, ctx)?;
        }
        Ok(())
    }
}

/// CIP-25 v1 payload: `{policy_id: {asset_name: {name, image}}}`.
pub fn cip25_nft(policy: &PolicyId, asset_name: &str, name: &str, image: &str) -> Metadatum {
    let fields = Metadatum::text_map([("name", Metadatum::text(name)), ("image", Metadatum::text(image))]);
    let asset = Metadatum::text_map([(asset_name, fields)]);
    Metadatum::Map(vec![(Metadatum::text(&policy.to_hex()), asset)])
}
