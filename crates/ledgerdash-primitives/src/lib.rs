/// ledgerdash - Hashing, hash types, and binary encoding.
///
/// This crate provides the foundational building blocks shared by the
/// other ledgerdash crates:
/// - Hash functions (Blake2b-224 for credentials and script hashes,
///   Blake2b-256 for transaction ids and metadata hashes)
/// - A fixed-size `Hash<N>` type with hex display and serde support
/// - Helpers for the ledger's canonical CBOR on top of `minicbor`

pub mod hash;
pub mod cbor;

mod error;
pub use error::PrimitivesError;
pub use hash::{Hash, Hash28, Hash32};
