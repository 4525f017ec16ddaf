//! # Block Filter
//!
//! Selects the token-carrying transactions of a block.

use crate::domain::{DagError, TxId};
use crate::ports::TokenClassifier;
use tracing::trace;

/// Keep the txids the classifier reports as token-carrying, in block order.
///
/// Classifier failures propagate unchanged.
pub async fn filter_slp_txs<K>(classifier: &K, txids: &[TxId]) -> Result<Vec<TxId>, DagError>
where
    K: TokenClassifier + ?Sized,
{
    let mut kept = Vec::new();
    for txid in txids {
        if classifier.get_token_info(txid).await?.is_some() {
            trace!(txid = %txid, "Token transaction");
            kept.push(*txid);
        }
    }
    Ok(kept)
}
