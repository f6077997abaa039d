//! Canonical CBOR helpers on top of `minicbor`.
//!
//! Ledger types implement [`minicbor::Encode`] themselves. This module adds
//! the parts of the ledger's canonical form that plain minicbor leaves to the
//! caller: byte strings longer than 64 bytes split into 64-byte chunks,
//! bignums, and the byte-string wrapping scripts are distributed in.

use minicbor::data::{Tag, Type};
use minicbor::encode::{Error, Write};
use minicbor::{Decoder, Encode, Encoder};

use crate::PrimitivesError;

/// Maximum chunk length for byte strings the ledger accepts in Plutus data.
pub const BYTES_CHUNK_SIZE: usize = 64;

/// Tag for a non-negative bignum.
pub const TAG_POS_BIGNUM: u64 = 2;
/// Tag for a negative bignum.
pub const TAG_NEG_BIGNUM: u64 = 3;

/// Write a byte string, switching to an indefinite-length string of
/// 64-byte chunks when it is longer than 64 bytes.
///
/// # Arguments
/// * `e` - The encoder to write to.
/// * `bytes` - The payload.
pub fn bytes_chunked<W: Write>(e: &mut Encoder<W>, bytes: &[u8]) -> Result<(), Error<W::Error>> {
    if bytes.len() <= BYTES_CHUNK_SIZE {
        e.bytes(bytes)?;
        return Ok(());
    }
    e.begin_bytes()?;
    for chunk in bytes.chunks(BYTES_CHUNK_SIZE) {
        e.bytes(chunk)?;
    }
    e.end()?;
    Ok(())
}

/// Write a bignum (tag 2 for non-negative, tag 3 for negative).
///
/// # Arguments
/// * `e` - The encoder to write to.
/// * `negative` - Whether the encoded value is `-1 - magnitude`.
/// * `magnitude` - Big-endian magnitude bytes.
pub fn bignum<W: Write>(e: &mut Encoder<W>, negative: bool, magnitude: &[u8]) -> Result<(), Error<W::Error>> {
    let tag = if negative { TAG_NEG_BIGNUM } else { TAG_POS_BIGNUM };
    e.tag(Tag::new(tag))?;
    bytes_chunked(e, magnitude)
}

/// Encode `item` into a fresh buffer.
pub fn to_vec<T: Encode<()>>(item: &T) -> Result<Vec<u8>, PrimitivesError> {
    Ok(minicbor::to_vec(item)?)
}

/// Decode a single top-level CBOR byte string, rejecting trailing data.
///
/// Both definite and chunked (indefinite-length) strings are accepted.
///
/// # Arguments
/// * `data` - The encoded item.
///
/// # Returns
/// The byte-string payload.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>, PrimitivesError> {
    let mut d = Decoder::new(data);
    let payload = match d.datatype()? {
        Type::Bytes => d.bytes()?.to_vec(),
        Type::BytesIndef => {
            let mut out = Vec::new();
            for chunk in d.bytes_iter()? {
                out.extend_from_slice(chunk?);
            }
            out
        }
        other => {
            return Err(PrimitivesError::UnexpectedType {
                expected: "byte string",
                found: format!("{:?}", other),
            })
        }
    };
    match data.len() - d.position() {
        0 => Ok(payload),
        n => Err(PrimitivesError::TrailingBytes(n)),
    }
}

/// Encode `bytes` as a single definite-length CBOR byte string.
pub fn encode_bytes(bytes: &[u8]) -> Result<Vec<u8>, PrimitivesError> {
    let mut e = Encoder::new(Vec::with_capacity(bytes.len() + 9));
    e.bytes(bytes)?;
    Ok(e.into_writer())
}
