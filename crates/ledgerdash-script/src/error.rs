/// Error types for script, credential and address operations.
///
/// Covers template store initialization, script encoding problems,
/// parameter application failures and address decoding.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The embedded template registry could not be initialized.
    #[error("template store unavailable: {0}")]
    TemplateStore(String),

    /// Script bytes are not in the expected CBOR wrapping.
    #[error("invalid script encoding: {0}")]
    InvalidScriptEncoding(String),

    /// A template was given the wrong number of parameters.
    #[error("parameter arity mismatch: template expects {expected}, got {got}")]
    ParameterArityMismatch {
        /// Number of parameters the template declares.
        expected: usize,
        /// Number of parameters supplied.
        got: usize,
    },

    /// The flat-encoded program could not be decoded.
    #[error("malformed program: {0}")]
    MalformedProgram(String),

    /// A term tag outside the supported term language.
    #[error("unsupported term tag {0}")]
    UnsupportedTerm(u8),

    /// A constant type that cannot appear in a serialized program.
    #[error("unsupported constant type tag {0}")]
    UnsupportedConstantType(u8),

    /// An address is missing the expected part or cannot be decoded.
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    /// A network name that is not mainnet, preprod or preview.
    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    /// Bech32 decoding failed.
    #[error("bech32 error: {0}")]
    Bech32(String),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] ledgerdash_primitives::PrimitivesError),
}
