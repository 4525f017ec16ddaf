//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementations of the outbound store and classifier ports.

mod classifier;
mod lru_cache;
mod memory;
mod tiered_store;

pub use classifier::RecordTokenClassifier;
pub use lru_cache::LruTransactionCache;
pub use memory::MemoryValidatedStore;
pub use tiered_store::TieredRecordStore;
