use crate::domain::{ClassifierError, StoreError, TokenInfo, TxId};
use crate::ports::{RecordStore, TokenClassifier};
use async_trait::async_trait;
use std::sync::Arc;

/// Classifies a transaction by the token id on its decoded record.
///
/// Reads cache-first with canonical fallback. Transactions unknown to both
/// tiers are not token-carrying; other store failures are reported as
/// classifier errors.
pub struct RecordTokenClassifier<R: RecordStore> {
    store: Arc<R>,
}

impl<R: RecordStore> RecordTokenClassifier<R> {
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<R: RecordStore> TokenClassifier for RecordTokenClassifier<R> {
    async fn get_token_info(&self, txid: &TxId) -> Result<Option<TokenInfo>, ClassifierError> {
        match self.store.fetch(txid).await {
            Ok(record) => Ok(record.token_id.map(|token_id| TokenInfo {
                token_id,
                token_type: record.token_type,
            })),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(ClassifierError(e.to_string())),
        }
    }
}
