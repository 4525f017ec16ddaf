use crate::domain::{StoreError, TransactionRecord, TxId, Verdict};
use crate::ports::ValidatedTxStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory canonical store of validated transactions.
///
/// `persist` is the indexer's write path; the crawler only reads.
pub struct MemoryValidatedStore {
    records: RwLock<HashMap<TxId, TransactionRecord>>,
}

impl MemoryValidatedStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Persist a record with its final verdict.
    ///
    /// Verdicts are write-once: a record that already carries a decided
    /// verdict is left untouched and `false` is returned.
    pub fn persist(&self, record: TransactionRecord) -> bool {
        let mut records = self.records.write();
        if records
            .get(&record.txid)
            .is_some_and(|existing| existing.is_valid_slp.is_decided())
        {
            return false;
        }
        records.insert(record.txid, record);
        true
    }

    pub fn verdict(&self, txid: &TxId) -> Verdict {
        self.records
            .read()
            .get(txid)
            .map(|record| record.is_valid_slp)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for MemoryValidatedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ValidatedTxStore for MemoryValidatedStore {
    async fn get(&self, txid: &TxId) -> Result<TransactionRecord, StoreError> {
        self.records
            .read()
            .get(txid)
            .cloned()
            .ok_or(StoreError::NotFound { txid: *txid })
    }
}
