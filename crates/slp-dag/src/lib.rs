//! # SLP DAG Validation
//!
//! Token ancestry validation for SLP transactions.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A token output is valid only if every token-carrying input it spends
//! traces back, through same-token same-type transactions, to the token's
//! genesis. This crate proves or disproves that lineage by walking the
//! transaction ancestry DAG, reusing verdicts already memoized in the
//! canonical store.
//!
//! ## Operations
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | `crawl_dag` | Full ancestry crawl to genesis or a validated ancestor |
//! | `has_valid_parent` | Hop-bounded crawl for quick triage |
//! | `forward_dag` | Stitch out-of-order ids onto ordered ancestry chains |
//! | `filter_slp_txs` | Keep the token-carrying txids of a block |
//!
//! ## Module Structure
//!
//! ```text
//! slp-dag/
//! ├── domain/          # TxId, Verdict, TransactionRecord, AncestryChain, errors
//! ├── algorithms/      # Crawler, parent check, stitcher, block filter
//! ├── ports/           # API trait (inbound) + store/classifier traits (outbound)
//! ├── adapters/        # Tiered store, in-memory canonical store, LRU cache
//! ├── application/     # DagValidationService, crawl coalescing, stats
//! ├── config.rs        # DagConfig
//! └── telemetry.rs     # tracing-subscriber setup
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports
pub use adapters::{
    LruTransactionCache, MemoryValidatedStore, RecordTokenClassifier, TieredRecordStore,
};
pub use algorithms::{DepthBound, DepthPolicy};
pub use application::{DagStats, DagValidationService};
pub use config::{ConfigError, DagConfig};
pub use domain::{
    AncestryChain, AncestryResult, ClassifierError, DagError, InputRef, OutputRef, ParentCheck,
    StitchOutcome, StoreError, TokenId, TokenInfo, TokenType, TransactionRecord, TxId, Verdict,
};
pub use ports::{DagValidationApi, RecordStore, TokenClassifier, TransactionCache, ValidatedTxStore};
pub use telemetry::{init_tracing, TelemetryConfig, TelemetryError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
