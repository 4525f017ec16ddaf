//! Error types for token ancestry validation
//!
//! Benign invalidity (type mismatch, no genesis reached, negative memoized
//! verdict) is never an error; it is an `AncestryResult` with `is_valid: false`.

use super::value_objects::{TokenId, TxId};
use thiserror::Error;

/// All errors surfaced by the crawler, parent check, stitcher and block filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError {
    /// Missing or malformed identifier.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Record store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A parent claims a different token id than the one being crawled.
    #[error(
        "TokenID does not match. Given token ID {expected} does not match token ID {} in parent TXID {parent}",
        display_token(.found)
    )]
    InvalidLineage {
        expected: TokenId,
        found: Option<TokenId>,
        parent: TxId,
    },

    /// Ancestry deeper than the configured ceiling.
    #[error("Crawl depth limit {limit} exceeded at {txid}")]
    DepthExceeded { txid: TxId, limit: usize },

    /// Token classifier failure, propagated unchanged.
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Record store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Transaction not found: {txid}")]
    NotFound { txid: TxId },

    #[error("I/O error: {message}")]
    Io { message: String },
}

/// Token classifier error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ClassifierError(pub String);

fn display_token(id: &Option<TokenId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| "<none>".to_string())
}

impl DagError {
    /// True for a store not-found failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DagError::Store(StoreError::NotFound { .. }))
    }
}
