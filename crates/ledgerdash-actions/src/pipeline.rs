//! Complete, sign and submit a plan.

use tracing::debug;

use ledgerdash_transaction::{TransactionPlan, TxId};
use ledgerdash_wallet::LedgerContext;

use crate::error::ActionError;

/// Run `plan` through the wallet and broadcaster.
///
/// Steps run strictly in order. A failure in `complete` or `sign` leaves no
/// on-chain effect, so the caller can rebuild the plan and retry.
pub async fn submit_plan<L: LedgerContext>(ledger: &L, plan: TransactionPlan) -> Result<TxId, ActionError> {
    let tx = ledger.complete(plan).await?;
    debug!(fee = tx.fee(), inputs = tx.inputs().count(), "plan completed");

    let signed = ledger.sign(tx).await?;
    debug!(tx_id = %signed.tx_id(), "transaction signed");

    let tx_id = ledger.submit(&signed).await?;
    Ok(tx_id)
}
