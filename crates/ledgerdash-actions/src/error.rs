//! Action error types.
//!
//! `ActionError` is the one failure descriptor handed to the error channel.
//! Errors from the lower crates are folded into it so the caller only ever
//! sees the action-level taxonomy.

use ledgerdash_script::{Address, ScriptError};
use ledgerdash_transaction::{AssetUnit, TransactionError};
use ledgerdash_wallet::WalletError;

/// Errors that can occur while building or submitting an action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A script template was given the wrong number of parameters.
    #[error("parameter arity mismatch: expected {expected}, got {got}")]
    ParameterArityMismatch {
        /// Parameters the template declares.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// An address lacks the part an action needs.
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    /// No UTXO at the wallet holds enough of the asset being burned.
    #[error("insufficient UTXOs holding {unit} at {address}")]
    InsufficientAssetUtxo {
        /// Asset being burned.
        unit: AssetUnit,
        /// Wallet address that was searched.
        address: Address,
    },

    /// The contract address holds nothing to withdraw.
    #[error("no funds at contract address {address}")]
    NoFundsAtContractAddress {
        /// The derived contract address.
        address: Address,
    },

    /// A script could not be decoded or instantiated.
    #[error("script instantiation failed: {0}")]
    ScriptInstantiation(String),

    /// The wallet declined to sign.
    #[error("signing rejected: {0}")]
    SigningRejected(String),

    /// The network refused the transaction.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// Fee balancing or coin selection failed.
    #[error("completion failed: {0}")]
    CompletionFailed(String),

    /// Chain state could not be queried.
    #[error("query failed: {0}")]
    Query(String),

    /// The assembled plan failed validation.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}

/// Copyable discriminant of [`ActionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// See [`ActionError::ParameterArityMismatch`].
    ParameterArityMismatch,
    /// See [`ActionError::MalformedAddress`].
    MalformedAddress,
    /// See [`ActionError::InsufficientAssetUtxo`].
    InsufficientAssetUtxo,
    /// See [`ActionError::NoFundsAtContractAddress`].
    NoFundsAtContractAddress,
    /// See [`ActionError::ScriptInstantiation`].
    ScriptInstantiation,
    /// See [`ActionError::SigningRejected`].
    SigningRejected,
    /// See [`ActionError::SubmissionRejected`].
    SubmissionRejected,
    /// See [`ActionError::CompletionFailed`].
    CompletionFailed,
    /// See [`ActionError::Query`].
    Query,
    /// See [`ActionError::InvalidPlan`].
    InvalidPlan,
}

impl ActionError {
    /// The failure category.
    pub fn kind(&self) -> FailureKind {
        match self {
            ActionError::ParameterArityMismatch { .. } => FailureKind::ParameterArityMismatch,
            ActionError::MalformedAddress(_) => FailureKind::MalformedAddress,
            ActionError::InsufficientAssetUtxo { .. } => FailureKind::InsufficientAssetUtxo,
            ActionError::NoFundsAtContractAddress { .. } => FailureKind::NoFundsAtContractAddress,
            ActionError::ScriptInstantiation(_) => FailureKind::ScriptInstantiation,
            ActionError::SigningRejected(_) => FailureKind::SigningRejected,
            ActionError::SubmissionRejected(_) => FailureKind::SubmissionRejected,
            ActionError::CompletionFailed(_) => FailureKind::CompletionFailed,
            ActionError::Query(_) => FailureKind::Query,
            ActionError::InvalidPlan(_) => FailureKind::InvalidPlan,
        }
    }

    /// Whether re-invoking the action may succeed without a code change.
    ///
    /// Retrying always means rebuilding the plan from fresh chain state.
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            FailureKind::ParameterArityMismatch
            | FailureKind::MalformedAddress
            | FailureKind::ScriptInstantiation
            | FailureKind::InvalidPlan => false,
            FailureKind::InsufficientAssetUtxo
            | FailureKind::NoFundsAtContractAddress
            | FailureKind::SigningRejected
            | FailureKind::SubmissionRejected
            | FailureKind::CompletionFailed
            | FailureKind::Query => true,
        }
    }
}

impl From<ScriptError> for ActionError {
    fn from(e: ScriptError) -> Self {
        match e {
            ScriptError::ParameterArityMismatch { expected, got } => ActionError::ParameterArityMismatch { expected, got },
            ScriptError::MalformedAddress(msg) => ActionError::MalformedAddress(msg),
            ScriptError::Bech32(msg) => ActionError::MalformedAddress(msg),
            other => ActionError::ScriptInstantiation(other.to_string()),
        }
    }
}

impl From<TransactionError> for ActionError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::Script(inner) => inner.into(),
            other => ActionError::InvalidPlan(other.to_string()),
        }
    }
}

impl From<WalletError> for ActionError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Completion(msg) => ActionError::CompletionFailed(msg),
            WalletError::SigningRejected(msg) => ActionError::SigningRejected(msg),
            WalletError::SubmissionRejected(msg) => ActionError::SubmissionRejected(msg),
            WalletError::Query(msg) => ActionError::Query(msg),
            // balancing a plan the wallet cannot complete
            WalletError::Transaction(inner) => ActionError::CompletionFailed(inner.to_string()),
            WalletError::Script(inner) => inner.into(),
        }
    }
}

/// Errors loading or validating a [`crate::DashboardConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
