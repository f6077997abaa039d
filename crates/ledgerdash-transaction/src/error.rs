use crate::assets::AssetUnit;

/// Error types for transaction construction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Asset names are at most 32 bytes.
    #[error("invalid asset name: {0}")]
    InvalidAssetName(String),

    /// An asset unit string is not a policy id followed by an asset name.
    #[error("invalid asset unit: {0}")]
    InvalidAssetUnit(String),

    /// Asset bundles never carry zero quantities.
    #[error("zero quantity for {0}")]
    ZeroQuantity(AssetUnit),

    /// Arithmetic on lovelace or asset quantities overflowed.
    #[error("value overflow")]
    ValueOverflow,

    /// A value was not large enough to cover a subtraction.
    #[error("insufficient value: {0}")]
    InsufficientValue(String),

    /// The plan failed validation in `build`.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// Metadata could not be encoded.
    #[error("metadata error: {0}")]
    Metadata(String),

    /// An underlying script error (forwarded from `ledgerdash-script`).
    #[error("script error: {0}")]
    Script(#[from] ledgerdash_script::ScriptError),

    /// An underlying primitives error (forwarded from `ledgerdash-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] ledgerdash_primitives::PrimitivesError),
}
