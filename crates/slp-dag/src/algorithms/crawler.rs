//! Ancestry Crawler
//!
//! Proves or disproves the token lineage of a transaction by walking its
//! lineage inputs back to the token's genesis, or to an ancestor that already
//! carries a memoized verdict.
//!
//! The walk runs on an explicit frame stack instead of async recursion. Each
//! frame is one transaction under examination; when a frame returns, it is
//! popped and its verdict becomes the running terminal state of the frame
//! below it, which then continues with its remaining inputs.

use crate::domain::invariants::invariant_no_duplicates;
use crate::domain::{
    AncestryChain, AncestryResult, DagError, InputRef, TokenId, TransactionRecord, TxId, Verdict,
};
use crate::ports::RecordStore;
use tracing::{debug, trace, warn};

/// What happens when a crawl would descend past its depth limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthPolicy {
    /// Fail with `DagError::DepthExceeded`.
    Fail,
    /// Treat the unexplored parent as unresolved.
    Unresolved,
}

/// Depth limit of a crawl. The root transaction is depth 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthBound {
    pub limit: usize,
    pub on_exceed: DepthPolicy,
}

impl DepthBound {
    /// Hard ceiling against malformed, unboundedly deep input.
    pub fn ceiling(limit: usize) -> Self {
        Self {
            limit,
            on_exceed: DepthPolicy::Fail,
        }
    }

    /// Inspect at most `hops` generations of parents.
    pub fn hops(hops: usize) -> Self {
        Self {
            limit: hops,
            on_exceed: DepthPolicy::Unresolved,
        }
    }
}

/// One transaction under examination.
struct Frame {
    record: TransactionRecord,
    next_input: usize,
    depth: usize,
}

impl Frame {
    fn new(record: TransactionRecord, depth: usize) -> Self {
        Self {
            record,
            next_input: 0,
            depth,
        }
    }

    /// Advance to the next input that is part of the token lineage graph.
    fn next_lineage_input(&mut self) -> Option<InputRef> {
        while let Some(input) = self.record.vin.get(self.next_input) {
            self.next_input += 1;
            if self.record.is_lineage_input(input) {
                return Some(input.clone());
            }
        }
        None
    }
}

/// Result of evaluating one parent/child edge.
enum Step {
    /// The current frame returns this verdict.
    Return(Verdict),
    /// The parent is unvalidated and not genesis; examine it.
    Descend(TransactionRecord),
}

/// Crawl the ancestry of `txid` for `token_id`.
///
/// `chain` may carry ids from an earlier crawl; `terminal` short-circuits the
/// call when already decided.
pub async fn crawl_dag<S>(
    store: &S,
    txid: TxId,
    token_id: TokenId,
    chain: AncestryChain,
    terminal: Verdict,
    bound: DepthBound,
) -> Result<AncestryResult, DagError>
where
    S: RecordStore + ?Sized,
{
    check_arguments(&txid, &token_id)?;

    if terminal.is_decided() {
        return Ok(AncestryResult::new(terminal, chain));
    }

    let record = store.fetch(&txid).await?;
    crawl_from_record(store, record, token_id, chain, bound).await
}

/// Crawl starting from an already fetched root record.
pub async fn crawl_from_record<S>(
    store: &S,
    root: TransactionRecord,
    token_id: TokenId,
    mut chain: AncestryChain,
    bound: DepthBound,
) -> Result<AncestryResult, DagError>
where
    S: RecordStore + ?Sized,
{
    debug!(txid = %root.txid, token_id = %token_id, "Crawling DAG");

    chain.push_front_unique(root.txid);
    let mut stack = vec![Frame::new(root, 0)];
    let mut terminal = Verdict::Unresolved;

    while let Some(frame) = stack.last_mut() {
        let returned = match frame.next_lineage_input() {
            None => Some(terminal.settle()),
            Some(input) => match evaluate_edge(store, &frame.record, &input, &token_id, &mut chain)
                .await?
            {
                Step::Return(verdict) => Some(verdict),
                Step::Descend(_) if terminal.is_decided() => {
                    // The child would return the decided verdict unchanged.
                    None
                }
                Step::Descend(parent) => {
                    let depth = frame.depth + 1;
                    if depth >= bound.limit {
                        match bound.on_exceed {
                            DepthPolicy::Fail => {
                                warn!(txid = %parent.txid, limit = bound.limit, "Crawl depth limit exceeded");
                                return Err(DagError::DepthExceeded {
                                    txid: parent.txid,
                                    limit: bound.limit,
                                });
                            }
                            DepthPolicy::Unresolved => {
                                trace!(txid = %parent.txid, depth, "Hop bound reached, parent left unresolved");
                                None
                            }
                        }
                    } else {
                        chain.push_front_unique(parent.txid);
                        stack.push(Frame::new(parent, depth));
                        None
                    }
                }
            },
        };

        if let Some(verdict) = returned {
            stack.pop();
            terminal = verdict;
        }
    }

    let result = AncestryResult::new(terminal, chain);
    debug_assert!(invariant_no_duplicates(&result.dag));

    debug!(
        token_id = %token_id,
        is_valid = result.is_valid,
        dag_len = result.dag.len(),
        "DAG crawl complete"
    );

    Ok(result)
}

/// Apply the edge rules to one lineage input of `child`.
async fn evaluate_edge<S>(
    store: &S,
    child: &TransactionRecord,
    input: &InputRef,
    token_id: &TokenId,
    chain: &mut AncestryChain,
) -> Result<Step, DagError>
where
    S: RecordStore + ?Sized,
{
    let parent = store.resolve_parent(&input.txid).await?;

    // Mixing NFT and fungible lineages breaks the chain.
    if parent.token_type != child.token_type {
        trace!(child = %child.txid, parent = %parent.txid, "Token type mismatch");
        return Ok(Step::Return(Verdict::Invalid));
    }

    match parent.is_valid_slp {
        Verdict::Valid => {
            if input.is_token_or_baton() && parent.has_output(input.vout) {
                trace!(parent = %parent.txid, "Parent already validated");
                chain.push_front_unique(parent.txid);
                return Ok(Step::Return(Verdict::Valid));
            }
        }
        Verdict::Invalid => {
            trace!(parent = %parent.txid, "Parent already invalidated");
            return Ok(Step::Return(Verdict::Invalid));
        }
        Verdict::Unresolved => {}
    }

    if parent.token_id != Some(*token_id) {
        warn!(
            expected = %token_id,
            parent = %parent.txid,
            "Outputs of one token spent as inputs of another"
        );
        return Err(DagError::InvalidLineage {
            expected: *token_id,
            found: parent.token_id,
            parent: parent.txid,
        });
    }

    if parent.is_genesis_of(token_id) {
        trace!(genesis = %parent.txid, "Genesis reached");
        chain.push_front_unique(parent.txid);
        return Ok(Step::Return(Verdict::Valid));
    }

    Ok(Step::Descend(parent))
}

fn check_arguments(txid: &TxId, token_id: &TokenId) -> Result<(), DagError> {
    if txid.is_zero() {
        return Err(DagError::InvalidArgument(
            "txid required to crawl DAG".to_string(),
        ));
    }
    if token_id.is_zero() {
        return Err(DagError::InvalidArgument(
            "tokenId required to crawl DAG".to_string(),
        ));
    }
    Ok(())
}
