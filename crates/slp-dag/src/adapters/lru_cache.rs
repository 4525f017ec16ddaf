use crate::domain::{StoreError, TransactionRecord, TxId};
use crate::ports::TransactionCache;
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(n) => n,
    None => unreachable!(),
};

/// Bounded cache of recently decoded transaction records.
pub struct LruTransactionCache {
    records: Mutex<LruCache<TxId, TransactionRecord>>,
}

impl LruTransactionCache {
    /// A zero capacity falls back to a small default.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            records: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Insert or refresh a record. Returns the evicted record, if any.
    pub fn insert(&self, record: TransactionRecord) -> Option<TransactionRecord> {
        let txid = record.txid;
        match self.records.lock().push(txid, record) {
            // Same key means the entry was refreshed in place.
            Some((evicted_txid, evicted)) if evicted_txid != txid => Some(evicted),
            _ => None,
        }
    }

    pub fn contains(&self, txid: &TxId) -> bool {
        self.records.lock().contains(txid)
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.records.lock().cap().get()
    }
}

#[async_trait]
impl TransactionCache for LruTransactionCache {
    async fn get(&self, txid: &TxId) -> Result<TransactionRecord, StoreError> {
        self.records
            .lock()
            .get(txid)
            .cloned()
            .ok_or(StoreError::NotFound { txid: *txid })
    }
}
