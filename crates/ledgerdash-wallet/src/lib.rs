/// ledgerdash - Ledger collaborators.
///
/// Defines the chain query, wallet, and broadcaster interfaces the action
/// pipeline drives, and an in-memory `Emulator` that implements all three
/// for tests and local runs.

mod error;
pub use error::WalletError;

pub mod provider;
pub mod emulator;

pub use emulator::{Emulator, EmulatorConfig};
pub use provider::{Broadcaster, ChainQuery, LedgerContext, WalletInterface};
