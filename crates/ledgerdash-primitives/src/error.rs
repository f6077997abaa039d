use std::convert::Infallible;

/// Unified error type for all primitives operations.
///
/// Covers errors from hash parsing and CBOR encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength { expected: usize, got: usize },

    #[error("CBOR encoding failed: {0}")]
    Encode(String),

    #[error("CBOR decoding failed: {0}")]
    Decode(#[from] minicbor::decode::Error),

    #[error("unexpected CBOR item: expected {expected}, found {found}")]
    UnexpectedType { expected: &'static str, found: String },

    #[error("trailing {0} bytes after CBOR item")]
    TrailingBytes(usize),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}

impl From<minicbor::encode::Error<Infallible>> for PrimitivesError {
    fn from(e: minicbor::encode::Error<Infallible>) -> Self {
        PrimitivesError::Encode(e.to_string())
    }
}
