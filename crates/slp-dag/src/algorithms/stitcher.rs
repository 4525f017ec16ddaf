//! # Chain Stitcher
//!
//! While a block is scanned in arbitrary order, ancestry edges turn up
//! piecemeal. A stitching pass moves unresolved ids onto the ends of the
//! ordered chains they adjoin and joins chains that meet end to start.
//! Callers repeat the pass until it reports no progress.

use crate::domain::invariants::invariant_disjoint_chains;
use crate::domain::{DagError, StitchOutcome, TransactionRecord, TxId};
use crate::ports::RecordStore;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Records read during one pass.
struct RecordMemo<'a, S: ?Sized> {
    store: &'a S,
    records: HashMap<TxId, TransactionRecord>,
}

impl<'a, S> RecordMemo<'a, S>
where
    S: RecordStore + ?Sized,
{
    fn new(store: &'a S) -> Self {
        Self {
            store,
            records: HashMap::new(),
        }
    }

    async fn get(&mut self, txid: &TxId) -> Result<&TransactionRecord, DagError> {
        match self.records.entry(*txid) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let record = self.store.fetch(txid).await?;
                Ok(entry.insert(record))
            }
        }
    }
}

/// One stitching pass over `ordered_chains` and `unresolved`.
pub async fn forward_dag<S>(
    store: &S,
    mut ordered_chains: Vec<Vec<TxId>>,
    unresolved: Vec<TxId>,
) -> Result<StitchOutcome, DagError>
where
    S: RecordStore + ?Sized,
{
    let disjoint_input = cfg!(debug_assertions) && invariant_disjoint_chains(&ordered_chains);
    let mut placed: HashSet<TxId> = ordered_chains.iter().flatten().copied().collect();
    let mut candidates = Vec::with_capacity(unresolved.len());
    let mut seen = HashSet::new();
    for txid in unresolved {
        if !placed.contains(&txid) && seen.insert(txid) {
            candidates.push(txid);
        }
    }

    let mut memo = RecordMemo::new(store);
    let mut success = false;
    let mut remaining = Vec::new();

    for candidate in candidates {
        let parents: HashSet<TxId> = memo
            .get(&candidate)
            .await?
            .vin
            .iter()
            .map(|input| input.txid)
            .collect();

        if attach(&mut memo, &mut ordered_chains, candidate, &parents).await? {
            placed.insert(candidate);
            success = true;
        } else {
            remaining.push(candidate);
        }
    }

    let merged = merge_chains(&mut memo, &mut ordered_chains).await?;
    success |= merged > 0;
    debug_assert!(!disjoint_input || invariant_disjoint_chains(&ordered_chains));

    debug!(
        chains = ordered_chains.len(),
        unresolved = remaining.len(),
        merged,
        success,
        "Stitching pass complete"
    );

    Ok(StitchOutcome {
        success,
        ordered_chains,
        unresolved: remaining,
    })
}

/// Attach `candidate` to the first chain it adjoins. Back attachment wins
/// over front attachment.
async fn attach<S>(
    memo: &mut RecordMemo<'_, S>,
    chains: &mut [Vec<TxId>],
    candidate: TxId,
    parents: &HashSet<TxId>,
) -> Result<bool, DagError>
where
    S: RecordStore + ?Sized,
{
    for chain in chains.iter_mut() {
        let (Some(&head), Some(&tail)) = (chain.first(), chain.last()) else {
            continue;
        };

        if parents.contains(&tail) {
            trace!(txid = %candidate, tail = %tail, "Attached after chain tail");
            chain.push(candidate);
            return Ok(true);
        }

        if memo.get(&head).await?.spends_from(&candidate) {
            trace!(txid = %candidate, head = %head, "Attached before chain head");
            chain.insert(0, candidate);
            return Ok(true);
        }
    }
    Ok(false)
}

/// Join chains whose head spends from another chain's tail. Returns the
/// number of merges.
async fn merge_chains<S>(
    memo: &mut RecordMemo<'_, S>,
    chains: &mut Vec<Vec<TxId>>,
) -> Result<usize, DagError>
where
    S: RecordStore + ?Sized,
{
    let mut merges = 0;
    'scan: loop {
        for later in 0..chains.len() {
            let Some(&head) = chains[later].first() else {
                continue;
            };
            let head_record = memo.get(&head).await?;
            let earlier = chains.iter().enumerate().position(|(i, chain)| {
                i != later && chain.last().is_some_and(|tail| head_record.spends_from(tail))
            });

            if let Some(earlier) = earlier {
                let tail_part = chains.remove(later);
                let earlier = if earlier > later { earlier - 1 } else { earlier };
                chains[earlier].extend(tail_part);
                merges += 1;
                continue 'scan;
            }
        }
        return Ok(merges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StoreError, TokenType};
    use crate::test_utils::{genesis, id, send, ScriptedStore};

    fn linear_store(token: TxId, len: u8) -> ScriptedStore {
        let mut store = ScriptedStore::new().cached(genesis(token, TokenType::Fungible));
        let mut prev = token;
        for n in 1..=len {
            store = store.cached(send(id(n), token, &[prev]));
            prev = id(n);
        }
        store
    }

    #[tokio::test]
    async fn test_extends_chain_end() {
        let token = id(0x10);
        let store = linear_store(token, 5)
            .cached(send(id(0x30), token, &[id(0x31)]))
            .cached(send(id(0x31), token, &[id(0x32)]))
            .cached(send(id(0x32), token, &[]));

        let chains = vec![vec![id(1), id(2), id(3), id(4)]];
        let unresolved = vec![id(0x30), id(5), id(0x32)];

        let outcome = forward_dag(&store, chains, unresolved).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.ordered_chains, vec![vec![id(1), id(2), id(3), id(4), id(5)]]);
        assert_eq!(outcome.unresolved, vec![id(0x30), id(0x32)]);
    }

    #[tokio::test]
    async fn test_prepends_parent_of_chain_head() {
        let token = id(0x10);
        let store = linear_store(token, 4);

        let outcome = forward_dag(&store, vec![vec![id(3), id(4)]], vec![id(2)])
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.ordered_chains, vec![vec![id(2), id(3), id(4)]]);
        assert!(outcome.unresolved.is_empty());
    }

    #[tokio::test]
    async fn test_merges_adjoining_chains() {
        let token = id(0x10);
        let store = linear_store(token, 6);

        let chains = vec![vec![id(4), id(5), id(6)], vec![id(1), id(2)]];
        let outcome = forward_dag(&store, chains, vec![id(3)]).await.unwrap();

        assert!(outcome.success);
        assert_eq!(
            outcome.ordered_chains,
            vec![vec![id(1), id(2), id(3), id(4), id(5), id(6)]]
        );
        assert!(outcome.unresolved.is_empty());
    }

    #[tokio::test]
    async fn test_reaches_fixed_point() {
        let token = id(0x10);
        let store = linear_store(token, 6).cached(send(id(0x30), token, &[]));

        let mut chains = vec![vec![id(1)]];
        let mut unresolved = vec![id(5), id(0x30), id(3), id(2), id(4)];
        let mut passes = 0;
        loop {
            let outcome = forward_dag(&store, chains.clone(), unresolved.clone())
                .await
                .unwrap();
            passes += 1;
            if !outcome.success {
                assert_eq!(outcome.ordered_chains, chains);
                assert_eq!(outcome.unresolved, unresolved);
                break;
            }
            chains = outcome.ordered_chains;
            unresolved = outcome.unresolved;
            assert!(invariant_disjoint_chains(&chains));
        }

        assert!(passes <= 5);
        assert_eq!(chains, vec![vec![id(1), id(2), id(3), id(4), id(5)]]);
        assert_eq!(unresolved, vec![id(0x30)]);
    }

    #[tokio::test]
    async fn test_already_placed_and_repeated_ids_dropped() {
        let token = id(0x10);
        let store = linear_store(token, 4);

        let outcome = forward_dag(
            &store,
            vec![vec![id(1), id(2)]],
            vec![id(2), id(4), id(4)],
        )
        .await
        .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.ordered_chains, vec![vec![id(1), id(2)]]);
        assert_eq!(outcome.unresolved, vec![id(4)]);
    }

    #[tokio::test]
    async fn test_empty_chains_are_skipped() {
        let token = id(0x10);
        let store = linear_store(token, 2);

        let outcome = forward_dag(&store, vec![vec![], vec![id(1)]], vec![id(2)])
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.ordered_chains, vec![vec![], vec![id(1), id(2)]]);
    }

    #[tokio::test]
    async fn test_unknown_candidate_propagates_not_found() {
        let token = id(0x10);
        let store = linear_store(token, 2);

        let err = forward_dag(&store, vec![vec![id(1)]], vec![id(0x50)])
            .await
            .unwrap_err();

        assert_eq!(err, DagError::Store(StoreError::NotFound { txid: id(0x50) }));
    }

    #[tokio::test]
    async fn test_overlapping_input_chains_pass_through() {
        let token = id(0x10);
        let store = linear_store(token, 3);

        let chains = vec![vec![id(1), id(2)], vec![id(2), id(3)]];
        let outcome = forward_dag(&store, chains.clone(), vec![]).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.ordered_chains, chains);
    }
}
