use crate::domain::{
    InputRef, OutputRef, StoreError, TokenId, TokenType, TransactionRecord, TxId, Verdict,
};
use crate::ports::RecordStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

pub fn id(n: u8) -> TxId {
    TxId([n; 32])
}

/// Genesis record: its txid is the token id.
pub fn genesis(token_id: TokenId, token_type: TokenType) -> TransactionRecord {
    TransactionRecord::token(token_id, token_id, token_type)
        .with_input(InputRef::new(id(0xEE), 0))
        .with_output(OutputRef::new(0))
        .with_output(OutputRef::new(1).with_tokens(token_id, 1_000))
}

/// Send spending output 1 of each parent.
pub fn send(txid: TxId, token_id: TokenId, parents: &[TxId]) -> TransactionRecord {
    send_typed(txid, token_id, TokenType::Fungible, parents)
}

pub fn send_typed(
    txid: TxId,
    token_id: TokenId,
    token_type: TokenType,
    parents: &[TxId],
) -> TransactionRecord {
    let mut record = TransactionRecord::token(txid, token_id, token_type)
        .with_output(OutputRef::new(0))
        .with_output(OutputRef::new(1).with_tokens(token_id, 100));
    for parent in parents {
        record = record.with_input(InputRef::new(*parent, 1).with_tokens(token_id, 100));
    }
    record
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Fetch(TxId),
    Canonical(TxId),
    Cache(TxId),
}

/// Two-tier store with a lookup log.
#[derive(Default)]
pub struct ScriptedStore {
    pub canonical: HashMap<TxId, TransactionRecord>,
    pub cache: HashMap<TxId, TransactionRecord>,
    pub lookups: Mutex<Vec<Lookup>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(mut self, record: TransactionRecord) -> Self {
        self.cache.insert(record.txid, record);
        self
    }

    pub fn confirmed(mut self, record: TransactionRecord, verdict: Verdict) -> Self {
        self.canonical
            .insert(record.txid, record.with_verdict(verdict));
        self
    }

    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().clone()
    }

    fn cache_get(&self, txid: &TxId) -> Result<TransactionRecord, StoreError> {
        self.lookups.lock().push(Lookup::Cache(*txid));
        self.cache
            .get(txid)
            .cloned()
            .ok_or(StoreError::NotFound { txid: *txid })
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn fetch(&self, txid: &TxId) -> Result<TransactionRecord, StoreError> {
        self.lookups.lock().push(Lookup::Fetch(*txid));
        self.cache
            .get(txid)
            .or_else(|| self.canonical.get(txid))
            .cloned()
            .ok_or(StoreError::NotFound { txid: *txid })
    }

    async fn resolve_parent(&self, txid: &TxId) -> Result<TransactionRecord, StoreError> {
        self.lookups.lock().push(Lookup::Canonical(*txid));
        match self.canonical.get(txid) {
            Some(record) => Ok(record.clone()),
            None => self.cache_get(txid),
        }
    }
}
