//! Plutus data: the structured value type passed to validators.
//!
//! Redeemers, datums and script parameters are all Plutus data. The CBOR
//! encoding produced here follows the ledger's canonical form so that a
//! parameter applied to a template hashes to the same script the chain sees:
//! - constructors 0..=6 use tags 121..=127, 7..=127 use tags 1280..=1400,
//!   anything larger uses tag 102 with an explicit `[index, fields]` pair
//! - non-empty lists (including constructor fields) are indefinite-length
//! - byte strings longer than 64 bytes are split into 64-byte chunks
//! - integers outside the 64-bit CBOR range become bignums (tags 2 and 3)

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use minicbor::data::{Int, Tag};
use minicbor::encode::{Error, Write};
use minicbor::{Encode, Encoder};

use ledgerdash_primitives::cbor;
use ledgerdash_primitives::Hash;

use crate::error::ScriptError;

/// A Plutus data value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlutusData {
    /// A tagged constructor with positional fields.
    Constr {
        /// Constructor index.
        tag: u64,
        /// Constructor fields in order.
        fields: Vec<PlutusData>,
    },
    /// Key/value pairs in insertion order.
    Map(Vec<(PlutusData, PlutusData)>),
    /// An ordered list.
    List(Vec<PlutusData>),
    /// An arbitrary-precision integer.
    Integer(BigInt),
    /// A byte string.
    Bytes(Vec<u8>),
}

impl PlutusData {
    /// The unit value `Constr 0 []`, used where a validator ignores its redeemer.
    pub fn void() -> Self {
        PlutusData::Constr {
            tag: 0,
            fields: Vec::new(),
        }
    }

    /// Build an integer value.
    pub fn integer(value: i64) -> Self {
        PlutusData::Integer(BigInt::from(value))
    }

    /// Build a byte string value.
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        PlutusData::Bytes(value.into())
    }

    /// Build a constructor value.
    pub fn constr(tag: u64, fields: Vec<PlutusData>) -> Self {
        PlutusData::Constr { tag, fields }
    }

    /// Encode to canonical CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, ScriptError> {
        Ok(cbor::to_vec(self)?)
    }
}

impl<C> Encode<C> for PlutusData {
    fn encode<W: Write>(&self, e: &mut Encoder<W>, ctx: &mut C) -> Result<(), Error<W::Error>> {
        match self {
            PlutusData::Constr { tag, fields } => {
                match *tag {
                    0..=6 => {
                        e.tag(Tag::new(121 + tag))?;
                    }
                    7..=127 => {
                        e.tag(Tag::new(1280 + tag - 7))?;
                    }
                    _ => {
                        e.tag(Tag::new(102))?.array(2)?.u64(*tag)?;
                    }
                }
                encode_list(e, fields, ctx)
            }
            PlutusData::Map(entries) => {
                e.map(entries.len() as u64)?;
                for (k, v) in entries {
                    k.encode(e, ctx)?;
                    v.encode(e, ctx)?;
                }
                Ok(())
            }
            PlutusData::List(items) => encode_list(e, items, ctx),
            PlutusData::Integer(value) => encode_integer(e, value),
            PlutusData::Bytes(bytes) => cbor::bytes_chunked(e, bytes),
        }
    }
}

fn encode_list<C, W: Write>(e: &mut Encoder<W>, items: &[PlutusData], ctx: &mut C) -> Result<(), Error<W::Error>> {
    if items.is_empty() {
        e.array(0)?;
        return Ok(());
    }
    e.begin_array()?;
    for item in items {
        item.encode(e, ctx)?;
    }
    e.end()?;
    Ok(())
}

fn encode_integer<W: Write>(e: &mut Encoder<W>, value: &BigInt) -> Result<(), Error<W::Error>> {
    if let Some(int) = value.to_i128().and_then(|v| Int::try_from(v).ok()) {
        e.int(int)?;
        return Ok(());
    }
    if value.sign() == Sign::Minus {
        // CBOR encodes a negative n as the magnitude -1 - n.
        let magnitude = -value - BigInt::from(1u8);
        cbor::bignum(e, true, &magnitude.to_bytes_be().1)
    } else {
        cbor::bignum(e, false, &value.to_bytes_be().1)
    }
}

impl From<i64> for PlutusData {
    fn from(value: i64) -> Self {
        PlutusData::integer(value)
    }
}

impl From<Vec<u8>> for PlutusData {
    fn from(value: Vec<u8>) -> Self {
        PlutusData::Bytes(value)
    }
}

impl<const N: usize> From<Hash<N>> for PlutusData {
    fn from(value: Hash<N>) -> Self {
        PlutusData::Bytes(value.as_bytes().to_vec())
    }
}
