//! Hash function primitives and the fixed-size `Hash` type.
//!
//! The ledger uses Blake2b with two digest sizes: 224 bits for key hashes,
//! script hashes and policy ids, and 256 bits for transaction ids and
//! auxiliary data hashes. `Hash<N>` stores either size and renders as
//! lowercase hex in natural byte order.

use std::fmt;
use std::str::FromStr;

use blake2::digest::consts::{U28, U32};
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PrimitivesError;

type Blake2b224 = Blake2b<U28>;
type Blake2b256 = Blake2b<U32>;

/// Compute the Blake2b-224 digest of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 28-byte digest.
pub fn blake2b_224(data: &[u8]) -> [u8; 28] {
    let mut hasher = Blake2b224::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the Blake2b-256 digest of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte digest.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// A fixed-size hash digest.
///
/// Unlike block-explorer conventions on other chains, the bytes are
/// displayed in the order they are stored.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash<const N: usize>([u8; N]);

/// A 28-byte hash (key hash, script hash, policy id).
pub type Hash28 = Hash<28>;

/// A 32-byte hash (transaction id, auxiliary data hash).
pub type Hash32 = Hash<32>;

impl<const N: usize> Hash<N> {
    /// Create a hash from a raw byte array.
    pub const fn new(bytes: [u8; N]) -> Self {
        Hash(bytes)
    }

    /// Create a hash from a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly `N` bytes.
    ///
    /// # Returns
    /// `Ok(Hash)` if the slice has the right length, or an error otherwise.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != N {
            return Err(PrimitivesError::InvalidHashLength {
                expected: N,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; N];
        arr.copy_from_slice(bytes);
        Ok(Hash(arr))
    }

    /// Parse a hash from its hex representation.
    ///
    /// # Arguments
    /// * `hex_str` - Exactly `2 * N` hex characters.
    ///
    /// # Returns
    /// `Ok(Hash)` on success, or an error for invalid hex or a wrong length.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let decoded = hex::decode(hex_str)?;
        Self::from_slice(&decoded)
    }

    /// Access the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Return the digest as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl<const N: usize> Default for Hash<N> {
    fn default() -> Self {
        Hash([0u8; N])
    }
}

impl<const N: usize> AsRef<[u8]> for Hash<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for Hash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Hash(bytes)
    }
}

impl<const N: usize> fmt::Display for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl<const N: usize> fmt::Debug for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash<{}>({})", N, self.to_hex())
    }
}

impl<const N: usize> FromStr for Hash<N> {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

/// Serialize as a hex string in JSON.
impl<const N: usize> Serialize for Hash<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Deserialize from a hex string in JSON.
impl<'de, const N: usize> Deserialize<'de> for Hash<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Encode as a CBOR byte string, the form hashes take in ledger structures.
impl<C, const N: usize> minicbor::Encode<C> for Hash<N> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.bytes(&self.0)?;
        Ok(())
    }
}
