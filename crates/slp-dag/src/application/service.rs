//! # DAG Validation Service
//!
//! Application service wiring the algorithms to the outbound ports.
//! Concurrent crawls of the same transaction and token share one in-flight
//! computation.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, info_span, Instrument};

use crate::algorithms::{self, DepthBound};
use crate::config::DagConfig;
use crate::domain::{
    AncestryChain, AncestryResult, DagError, ParentCheck, StitchOutcome, TokenId, TxId, Verdict,
};
use crate::ports::{DagValidationApi, RecordStore, TokenClassifier};

type CrawlKey = (TxId, TokenId);
type SharedCrawl = Arc<OnceCell<Result<AncestryResult, DagError>>>;

/// Counters since the service was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagStats {
    /// `crawl_dag` calls, coalesced or not.
    pub crawl_requests: u64,
    /// Crawls actually run against the store.
    pub crawls_executed: u64,
    pub parent_checks: u64,
    pub stitch_passes: u64,
    /// Transactions kept by the block filter.
    pub filtered_txs: u64,
}

#[derive(Default)]
struct Counters {
    crawl_requests: AtomicU64,
    crawls_executed: AtomicU64,
    parent_checks: AtomicU64,
    stitch_passes: AtomicU64,
    filtered_txs: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    fn snapshot(&self) -> DagStats {
        DagStats {
            crawl_requests: self.crawl_requests.load(Ordering::Relaxed),
            crawls_executed: self.crawls_executed.load(Ordering::Relaxed),
            parent_checks: self.parent_checks.load(Ordering::Relaxed),
            stitch_passes: self.stitch_passes.load(Ordering::Relaxed),
            filtered_txs: self.filtered_txs.load(Ordering::Relaxed),
        }
    }
}

/// Token ancestry validation service.
pub struct DagValidationService<S: RecordStore, K: TokenClassifier> {
    config: DagConfig,
    store: Arc<S>,
    classifier: Arc<K>,
    in_flight: Mutex<HashMap<CrawlKey, InFlight>>,
    counters: Counters,
}

impl<S: RecordStore, K: TokenClassifier> DagValidationService<S, K> {
    pub fn new(config: DagConfig, store: Arc<S>, classifier: Arc<K>) -> Self {
        Self {
            config,
            store,
            classifier,
            in_flight: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &DagConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Internal: run one full crawl against the store.
    async fn run_crawl(&self, txid: TxId, token_id: TokenId) -> Result<AncestryResult, DagError> {
        Counters::bump(&self.counters.crawls_executed, 1);
        algorithms::crawl_dag(
            self.store.as_ref(),
            txid,
            token_id,
            AncestryChain::new(),
            Verdict::Unresolved,
            DepthBound::ceiling(self.config.max_crawl_depth),
        )
        .await
    }

    /// Internal: join or start the shared crawl for `key`.
    async fn coalesced_crawl(&self, key: CrawlKey) -> Result<AncestryResult, DagError> {
        let waiter = Waiter::join(&self.in_flight, key);
        let result = waiter
            .cell
            .get_or_init(|| self.run_crawl(key.0, key.1))
            .await
            .clone();
        drop(waiter);
        result
    }
}

/// A shared crawl and the number of callers awaiting it.
struct InFlight {
    cell: SharedCrawl,
    waiters: usize,
}

/// One caller's hold on an in-flight crawl.
///
/// Dropping it, on completion or cancellation, removes the entry once the
/// crawl has resolved or no caller is left waiting.
struct Waiter<'a> {
    in_flight: &'a Mutex<HashMap<CrawlKey, InFlight>>,
    key: CrawlKey,
    cell: SharedCrawl,
}

impl<'a> Waiter<'a> {
    fn join(in_flight: &'a Mutex<HashMap<CrawlKey, InFlight>>, key: CrawlKey) -> Self {
        let mut map = in_flight.lock();
        let entry = map.entry(key).or_insert_with(|| InFlight {
            cell: SharedCrawl::default(),
            waiters: 0,
        });
        entry.waiters += 1;
        Self {
            in_flight,
            key,
            cell: Arc::clone(&entry.cell),
        }
    }
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        let mut map = self.in_flight.lock();
        let Entry::Occupied(mut entry) = map.entry(self.key) else {
            return;
        };
        // Already replaced by a later crawl of the same key.
        if !Arc::ptr_eq(&entry.get().cell, &self.cell) {
            return;
        }

        let shared = entry.get_mut();
        shared.waiters -= 1;
        // Later callers must see fresh store state.
        if shared.waiters == 0 || self.cell.initialized() {
            entry.remove();
        }
    }
}

#[async_trait]
impl<S: RecordStore, K: TokenClassifier> DagValidationApi for DagValidationService<S, K> {
    async fn crawl_dag(
        &self,
        txid: TxId,
        token_id: TokenId,
    ) -> Result<AncestryResult, DagError> {
        Counters::bump(&self.counters.crawl_requests, 1);
        let span = info_span!("crawl_dag", txid = %txid, token_id = %token_id);

        async move {
            let result = if self.config.coalesce_crawls {
                self.coalesced_crawl((txid, token_id)).await
            } else {
                self.run_crawl(txid, token_id).await
            };

            if let Ok(ancestry) = &result {
                info!(
                    is_valid = ancestry.is_valid,
                    dag_len = ancestry.dag.len(),
                    "Ancestry resolved"
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn has_valid_parent(
        &self,
        txid: TxId,
        block_height: u64,
    ) -> Result<ParentCheck, DagError> {
        Counters::bump(&self.counters.parent_checks, 1);
        let span = info_span!("has_valid_parent", txid = %txid, block_height);

        async move {
            let check = algorithms::has_valid_parent(
                self.store.as_ref(),
                txid,
                self.config.parent_check_hops,
            )
            .await?;
            info!(has_parent = check.has_parent, "Parent check complete");
            Ok(check)
        }
        .instrument(span)
        .await
    }

    async fn forward_dag(
        &self,
        ordered_chains: Vec<Vec<TxId>>,
        unresolved: Vec<TxId>,
    ) -> Result<StitchOutcome, DagError> {
        Counters::bump(&self.counters.stitch_passes, 1);
        algorithms::forward_dag(self.store.as_ref(), ordered_chains, unresolved).await
    }

    async fn filter_slp_txs(&self, txids: &[TxId]) -> Result<Vec<TxId>, DagError> {
        let kept = algorithms::filter_slp_txs(self.classifier.as_ref(), txids).await?;
        Counters::bump(&self.counters.filtered_txs, kept.len() as u64);
        info!(scanned = txids.len(), kept = kept.len(), "Block filtered");
        Ok(kept)
    }

    fn get_stats(&self) -> DagStats {
        self.counters.snapshot()
    }
}
