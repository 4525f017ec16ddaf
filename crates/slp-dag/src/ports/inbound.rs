//! Inbound Ports (Driving Ports / API)

use crate::application::DagStats;
use crate::domain::{AncestryResult, DagError, ParentCheck, StitchOutcome, TokenId, TxId};
use async_trait::async_trait;

/// Primary token ancestry validation API.
#[async_trait]
pub trait DagValidationApi: Send + Sync {
    /// Prove or disprove the token lineage of `txid` for `token_id`.
    ///
    /// Returns the ancestry chain discovered, oldest first, ending with `txid`.
    async fn crawl_dag(&self, txid: TxId, token_id: TokenId)
        -> Result<AncestryResult, DagError>;

    /// Shallow check: does `txid` have a resolvable valid token parent
    /// within the configured hop bound.
    async fn has_valid_parent(
        &self,
        txid: TxId,
        block_height: u64,
    ) -> Result<ParentCheck, DagError>;

    /// One stitching pass of unresolved ids onto ordered chains.
    async fn forward_dag(
        &self,
        ordered_chains: Vec<Vec<TxId>>,
        unresolved: Vec<TxId>,
    ) -> Result<StitchOutcome, DagError>;

    /// Keep only token-carrying txids, preserving block order.
    async fn filter_slp_txs(&self, txids: &[TxId]) -> Result<Vec<TxId>, DagError>;

    /// Counters since the service was created.
    fn get_stats(&self) -> DagStats;
}
