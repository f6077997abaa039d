//! Interfaces to the ledger library the action pipeline depends on.
//!
//! Every call is a suspension point. Futures are not required to be `Send`:
//! an action runs as one sequential pipeline on a single task.

use std::future::Future;

use ledgerdash_script::{Address, Network};
use ledgerdash_transaction::{AssetUnit, SignableTransaction, SignedTransaction, TransactionPlan, TxId, Utxo};

use crate::error::WalletError;

/// Read access to chain state.
pub trait ChainQuery {
    /// All unspent outputs locked at `address`.
    fn utxos_at(&self, address: &Address) -> impl Future<Output = Result<Vec<Utxo>, WalletError>>;

    /// Unspent outputs at `address` holding a non-zero quantity of `unit`.
    fn utxos_at_with_unit(
        &self,
        address: &Address,
        unit: &AssetUnit,
    ) -> impl Future<Output = Result<Vec<Utxo>, WalletError>>;
}

/// The active wallet.
pub trait WalletInterface {
    /// The wallet's own address, used for change and as the default signer.
    fn address(&self) -> Address;

    /// Network the wallet operates on.
    fn network(&self) -> Network;

    /// Balance fees and select additional inputs for `plan`.
    fn complete(&self, plan: TransactionPlan) -> impl Future<Output = Result<SignableTransaction, WalletError>>;

    /// Sign with the wallet's keys. May be declined.
    fn sign(&self, tx: SignableTransaction) -> impl Future<Output = Result<SignedTransaction, WalletError>>;
}

/// Submission to the network.
pub trait Broadcaster {
    /// Broadcast `tx`.
    ///
    /// # Returns
    /// The id of the accepted transaction.
    fn submit(&self, tx: &SignedTransaction) -> impl Future<Output = Result<TxId, WalletError>>;
}

/// Everything one action needs from its environment.
pub trait LedgerContext: ChainQuery + WalletInterface + Broadcaster {}

impl<T: ChainQuery + WalletInterface + Broadcaster> LedgerContext for T {}
