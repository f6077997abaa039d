/// Error types for wallet and ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Fee balancing or coin selection failed.
    #[error("completion failed: {0}")]
    Completion(String),
    /// The wallet declined to sign.
    #[error("signing rejected: {0}")]
    SigningRejected(String),
    /// The ledger refused the transaction.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),
    /// Chain state could not be queried.
    #[error("query failed: {0}")]
    Query(String),
    /// Error from the transaction crate.
    #[error("transaction error: {0}")]
    Transaction(#[from] ledgerdash_transaction::TransactionError),
    /// Error from the script crate.
    #[error("script error: {0}")]
    Script(#[from] ledgerdash_script::ScriptError),
}
