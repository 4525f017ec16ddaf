//! Outbound Ports (Driven Ports / SPI)
//!
//! Record store tiers and the token classifier. Every store read is a
//! suspension point; nothing else in a crawl performs I/O.

use crate::domain::{ClassifierError, StoreError, TokenInfo, TransactionRecord, TxId};
use async_trait::async_trait;

/// Fast cache of recently seen transaction records.
///
/// May hold records that are not yet durably confirmed.
#[async_trait]
pub trait TransactionCache: Send + Sync {
    /// Get a record, or `StoreError::NotFound`.
    async fn get(&self, txid: &TxId) -> Result<TransactionRecord, StoreError>;
}

/// Canonical store of previously validated, confirmed transactions.
#[async_trait]
pub trait ValidatedTxStore: Send + Sync {
    /// Get a record, or `StoreError::NotFound`.
    async fn get(&self, txid: &TxId) -> Result<TransactionRecord, StoreError>;
}

/// The single lookup abstraction the algorithms read through.
///
/// Implementations own the tier fallback policy.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cache-first read of a transaction under examination, falling back to
    /// the canonical store on a cache miss.
    async fn fetch(&self, txid: &TxId) -> Result<TransactionRecord, StoreError>;

    /// Parent lookup: canonical store first, cache on any canonical failure.
    async fn resolve_parent(&self, txid: &TxId) -> Result<TransactionRecord, StoreError>;
}

/// Decides whether a transaction carries a token at all.
#[async_trait]
pub trait TokenClassifier: Send + Sync {
    /// `Some` for token-carrying transactions, `None` otherwise.
    async fn get_token_info(&self, txid: &TxId) -> Result<Option<TokenInfo>, ClassifierError>;
}
