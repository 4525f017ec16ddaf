//! Domain invariants for ancestry chains
//!
//! The crawler and stitcher check the first two as debug assertions on
//! their results; tests check all three.

use super::value_objects::{TokenId, TxId};
use std::collections::HashSet;

/// A txid appears at most once in an ancestry dag.
pub fn invariant_no_duplicates(dag: &[TxId]) -> bool {
    let mut seen = HashSet::with_capacity(dag.len());
    dag.iter().all(|id| seen.insert(*id))
}

/// No txid is placed in two stitched chains at once.
pub fn invariant_disjoint_chains(chains: &[Vec<TxId>]) -> bool {
    let mut seen = HashSet::new();
    chains.iter().flatten().all(|id| seen.insert(*id))
}

/// A valid dag rooted at genesis starts with the token id and ends with the
/// crawled transaction.
pub fn invariant_rooted_at_genesis(dag: &[TxId], token_id: &TokenId, txid: &TxId) -> bool {
    dag.first() == Some(token_id) && dag.last() == Some(txid)
}
