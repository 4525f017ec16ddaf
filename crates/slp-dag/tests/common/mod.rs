//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use slp_dag::{
    ClassifierError, DagConfig, DagValidationService, InputRef, LruTransactionCache,
    MemoryValidatedStore, OutputRef, RecordTokenClassifier, TieredRecordStore, TokenClassifier,
    TokenId, TokenInfo, TokenType, TransactionRecord, TxId, Verdict,
};
use std::sync::Arc;

pub type Store = TieredRecordStore<LruTransactionCache, MemoryValidatedStore>;

pub fn id(n: u8) -> TxId {
    TxId([n; 32])
}

pub fn genesis(token_id: TokenId, token_type: TokenType) -> TransactionRecord {
    TransactionRecord::token(token_id, token_id, token_type)
        .with_input(InputRef::new(id(0xEE), 0))
        .with_output(OutputRef::new(0))
        .with_output(OutputRef::new(1).with_tokens(token_id, 1_000))
}

/// Token send spending output 1 of each parent.
pub fn send(txid: TxId, token_id: TokenId, token_type: TokenType, parents: &[TxId]) -> TransactionRecord {
    let mut record = TransactionRecord::token(txid, token_id, token_type)
        .with_output(OutputRef::new(0))
        .with_output(OutputRef::new(1).with_tokens(token_id, 100));
    for parent in parents {
        record = record.with_input(InputRef::new(*parent, 1).with_tokens(token_id, 100));
    }
    record
}

/// In-memory two-tier store with handles to both tiers.
pub struct Ledger {
    pub cache: Arc<LruTransactionCache>,
    pub canonical: Arc<MemoryValidatedStore>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(LruTransactionCache::new(16_384)),
            canonical: Arc::new(MemoryValidatedStore::new()),
        }
    }

    pub fn cached(self, record: TransactionRecord) -> Self {
        self.cache.insert(record);
        self
    }

    pub fn confirmed(self, record: TransactionRecord, verdict: Verdict) -> Self {
        self.canonical.persist(record.with_verdict(verdict));
        self
    }

    /// Genesis plus `len` chained sends `id(1)..=id(len)` in the cache.
    pub fn linear(token_id: TokenId, len: u8) -> Self {
        let mut ledger = Self::new().cached(genesis(token_id, TokenType::Fungible));
        let mut prev = token_id;
        for n in 1..=len {
            ledger = ledger.cached(send(id(n), token_id, TokenType::Fungible, &[prev]));
            prev = id(n);
        }
        ledger
    }

    pub fn service(&self) -> DagValidationService<Store, RecordTokenClassifier<Store>> {
        self.service_with(DagConfig::for_testing())
    }

    pub fn service_with(
        &self,
        config: DagConfig,
    ) -> DagValidationService<Store, RecordTokenClassifier<Store>> {
        let store = Arc::new(TieredRecordStore::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.canonical),
        ));
        let classifier = Arc::new(RecordTokenClassifier::new(Arc::clone(&store)));
        DagValidationService::new(config, store, classifier)
    }
}

/// Classifier answering from a fixed list of verdicts, in call order.
pub struct ScriptedClassifier {
    answers: Mutex<Vec<Result<bool, String>>>,
    pub calls: Mutex<Vec<TxId>>,
}

impl ScriptedClassifier {
    pub fn new(answers: Vec<Result<bool, String>>) -> Self {
        let mut answers = answers;
        answers.reverse();
        Self {
            answers: Mutex::new(answers),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TokenClassifier for ScriptedClassifier {
    async fn get_token_info(&self, txid: &TxId) -> Result<Option<TokenInfo>, ClassifierError> {
        self.calls.lock().push(*txid);
        match self.answers.lock().pop() {
            Some(Ok(true)) => Ok(Some(TokenInfo {
                token_id: *txid,
                token_type: Some(TokenType::Fungible),
            })),
            Some(Ok(false)) | None => Ok(None),
            Some(Err(message)) => Err(ClassifierError(message)),
        }
    }
}

pub fn scripted_service(
    ledger: &Ledger,
    classifier: ScriptedClassifier,
) -> DagValidationService<Store, ScriptedClassifier> {
    let store = Arc::new(TieredRecordStore::new(
        Arc::clone(&ledger.cache),
        Arc::clone(&ledger.canonical),
    ));
    DagValidationService::new(DagConfig::for_testing(), store, Arc::new(classifier))
}
