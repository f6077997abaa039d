#![deny(missing_docs)]
//! Ledger dashboard actions.
//!
//! Four actions drive the dashboard: minting and burning a demo token, and
//! depositing to and withdrawing from a script-locked contract address.
//! Each action is built as a pure transaction plan, then completed, signed
//! and submitted through the ledger collaborators. Every failure is funnelled
//! into a single error channel.

pub mod action;
pub mod config;
pub mod contract;
pub mod dashboard;
pub mod error;
pub mod factory;
pub mod pipeline;

pub use action::{Action, ActionGroup, UnknownAction};
pub use config::{DashboardConfig, DepositConfig, MintConfig};
pub use contract::{contract_for, mint_policy, wallet_owner, Contract};
pub use dashboard::{ActionObserver, Dashboard};
pub use error::{ActionError, ConfigError, FailureKind};
pub use pipeline::submit_plan;
