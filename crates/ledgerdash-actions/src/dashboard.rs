//! The dashboard front-end.
//!
//! A [`Dashboard`] owns the ledger collaborators and the configuration. Each
//! action is derived, planned and submitted from scratch on every call; the
//! only state shared between calls is the script template store.

use tracing::{info, warn};

use ledgerdash_script::Address;
use ledgerdash_transaction::{TransactionPlan, TxId};
use ledgerdash_wallet::LedgerContext;

use crate::action::Action;
use crate::config::DashboardConfig;
use crate::contract::{contract_for, mint_policy, wallet_owner, Contract};
use crate::error::{ActionError, ConfigError};
use crate::factory::{build_burn_plan, build_deposit_plan, build_mint_plan, build_withdraw_plan, token_unit};
use crate::pipeline::submit_plan;

/// Receives the outcome of every invoked action.
pub trait ActionObserver {
    /// The action's transaction was accepted.
    fn on_success(&mut self, action: Action, tx_id: TxId);

    /// The action failed at some step.
    fn on_error(&mut self, action: Action, error: ActionError);
}

/// Entry point for the four actions.
#[derive(Debug)]
pub struct Dashboard<L> {
    ledger: L,
    config: DashboardConfig,
}

impl<L: LedgerContext> Dashboard<L> {
    /// A dashboard over `ledger`, after validating `config`.
    pub fn new(ledger: L, config: DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { ledger, config })
    }

    /// The ledger collaborators.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The active configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The contract owned by the active wallet.
    pub fn contract(&self) -> Result<Contract, ActionError> {
        let owner = wallet_owner(&self.ledger.address())?;
        contract_for(self.ledger.network(), owner)
    }

    /// Address that deposits are sent to and withdrawals collect from.
    pub fn contract_address(&self) -> Result<Address, ActionError> {
        Ok(self.contract()?.address)
    }

    /// Build the plan for `action` without submitting it.
    ///
    /// Burn and withdraw query the chain first.
    pub async fn plan(&self, action: Action) -> Result<TransactionPlan, ActionError> {
        match action {
            Action::Mint => build_mint_plan(mint_policy()?, &self.config.mint),
            Action::Burn => {
                let policy = mint_policy()?;
                let unit = token_unit(&policy, &self.config.mint)?;
                let wallet = self.ledger.address();
                let holdings = self.ledger.utxos_at_with_unit(&wallet, &unit).await?;
                build_burn_plan(policy, &self.config.mint, &wallet, holdings)
            }
            Action::Deposit => build_deposit_plan(&self.contract()?, &self.config.deposit),
            Action::Withdraw => {
                let contract = self.contract()?;
                let locked = self.ledger.utxos_at(&contract.address).await?;
                build_withdraw_plan(&contract, &self.ledger.address(), locked)
            }
        }
    }

    /// Plan and submit `action`.
    pub async fn run(&self, action: Action) -> Result<TxId, ActionError> {
        let result = async {
            let plan = self.plan(action).await?;
            submit_plan(&self.ledger, plan).await
        }
        .await;
        match &result {
            Ok(tx_id) => info!(%action, %tx_id, "action submitted"),
            Err(e) => warn!(%action, kind = ?e.kind(), retryable = e.is_retryable(), "action failed: {e}"),
        }
        result
    }

    /// Run `action` and report the outcome to `observer`.
    pub async fn invoke(&self, action: Action, observer: &mut impl ActionObserver) {
        match self.run(action).await {
            Ok(tx_id) => observer.on_success(action, tx_id),
            Err(e) => observer.on_error(action, e),
        }
    }
}
