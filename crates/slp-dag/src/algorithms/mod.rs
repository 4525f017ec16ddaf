//! # Algorithms Module
//!
//! Ancestry crawl, immediate-parent check, chain stitching and block
//! filtering. Store and classifier access goes through the outbound ports.

pub mod block_filter;
pub mod crawler;
pub mod parent_check;
pub mod stitcher;

pub use block_filter::filter_slp_txs;
pub use crawler::{crawl_dag, crawl_from_record, DepthBound, DepthPolicy};
pub use parent_check::has_valid_parent;
pub use stitcher::forward_dag;
