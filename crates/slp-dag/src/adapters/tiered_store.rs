use crate::domain::{StoreError, TransactionRecord, TxId};
use crate::ports::{RecordStore, TransactionCache, ValidatedTxStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Two-tier record store: a fast cache in front of the canonical store.
pub struct TieredRecordStore<C: TransactionCache, S: ValidatedTxStore> {
    cache: Arc<C>,
    canonical: Arc<S>,
    cache_fallbacks: AtomicU64,
}

impl<C: TransactionCache, S: ValidatedTxStore> TieredRecordStore<C, S> {
    pub fn new(cache: Arc<C>, canonical: Arc<S>) -> Self {
        Self {
            cache,
            canonical,
            cache_fallbacks: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    pub fn canonical(&self) -> &Arc<S> {
        &self.canonical
    }

    /// Parent lookups the canonical store could not answer.
    pub fn cache_fallbacks(&self) -> u64 {
        self.cache_fallbacks.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<C: TransactionCache, S: ValidatedTxStore> RecordStore for TieredRecordStore<C, S> {
    async fn fetch(&self, txid: &TxId) -> Result<TransactionRecord, StoreError> {
        match self.cache.get(txid).await {
            Ok(record) => Ok(record),
            Err(e) => {
                trace!(txid = %txid, error = %e, "Cache miss, trying canonical store");
                self.canonical.get(txid).await
            }
        }
    }

    async fn resolve_parent(&self, txid: &TxId) -> Result<TransactionRecord, StoreError> {
        match self.canonical.get(txid).await {
            Ok(record) => Ok(record),
            Err(e) => {
                trace!(txid = %txid, error = %e, "Canonical lookup failed, trying cache");
                self.cache_fallbacks.fetch_add(1, Ordering::Relaxed);
                self.cache.get(txid).await
            }
        }
    }
}
