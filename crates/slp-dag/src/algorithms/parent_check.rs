//! # Immediate-Parent Check
//!
//! Quick triage while a block is still being scanned: does the transaction
//! have a valid token ancestor within a few hops?

use super::crawler::{crawl_from_record, DepthBound};
use crate::domain::{AncestryChain, DagError, ParentCheck, TxId};
use crate::ports::RecordStore;
use tracing::debug;

/// Run a hop-bounded crawl from `txid` using the token id on its own record.
///
/// Same store lookups and edge rules as a full crawl. Ancestors beyond
/// `hops` count as unresolved, so the check only proves validity when a
/// genesis or a validated ancestor is close by.
pub async fn has_valid_parent<S>(store: &S, txid: TxId, hops: usize) -> Result<ParentCheck, DagError>
where
    S: RecordStore + ?Sized,
{
    if txid.is_zero() {
        return Err(DagError::InvalidArgument(
            "txid required to check parent".to_string(),
        ));
    }

    let record = store.fetch(&txid).await?;
    let Some(token_id) = record.token_id else {
        debug!(txid = %txid, "No token id, no parent to check");
        return Ok(ParentCheck {
            has_parent: false,
            dag: Vec::new(),
        });
    };
    if token_id.is_zero() {
        return Err(DagError::InvalidArgument(
            "tokenId required to check parent".to_string(),
        ));
    }

    let result = crawl_from_record(
        store,
        record,
        token_id,
        AncestryChain::new(),
        DepthBound::hops(hops),
    )
    .await?;

    Ok(ParentCheck {
        has_parent: result.is_valid,
        dag: result.dag,
    })
}
