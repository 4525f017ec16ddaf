//! Core entities for token ancestry validation
//!
//! Transaction records as produced by upstream decoding, the ancestry chain
//! accumulated by a crawl, and the result shapes of each operation.

use super::value_objects::{TokenId, TokenType, TxId, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Reference from a transaction input to the parent output it spends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRef {
    /// Parent transaction id
    pub txid: TxId,
    /// Parent output index
    pub vout: u32,
    /// Token quantity carried (zero if not a token input)
    #[serde(default)]
    pub token_qty: u64,
    /// Input authorizes minting instead of carrying quantity
    #[serde(default)]
    pub is_mint_baton: bool,
    /// Token id this input claims
    #[serde(default)]
    pub token_id: Option<TokenId>,
}

impl InputRef {
    pub fn new(txid: TxId, vout: u32) -> Self {
        Self {
            txid,
            vout,
            token_qty: 0,
            is_mint_baton: false,
            token_id: None,
        }
    }

    pub fn with_tokens(mut self, token_id: TokenId, qty: u64) -> Self {
        self.token_id = Some(token_id);
        self.token_qty = qty;
        self
    }

    pub fn with_mint_baton(mut self, token_id: TokenId) -> Self {
        self.token_id = Some(token_id);
        self.is_mint_baton = true;
        self
    }

    /// Carries quantity or is a mint baton.
    pub fn is_token_or_baton(&self) -> bool {
        self.token_qty > 0 || self.is_mint_baton
    }
}

/// Transaction output with its token attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRef {
    pub n: u32,
    #[serde(default)]
    pub token_qty: u64,
    #[serde(default)]
    pub is_mint_baton: bool,
    #[serde(default)]
    pub token_id: Option<TokenId>,
}

impl OutputRef {
    pub fn new(n: u32) -> Self {
        Self {
            n,
            token_qty: 0,
            is_mint_baton: false,
            token_id: None,
        }
    }

    pub fn with_tokens(mut self, token_id: TokenId, qty: u64) -> Self {
        self.token_id = Some(token_id);
        self.token_qty = qty;
        self
    }
}

/// A transaction as the crawler sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub txid: TxId,
    /// Token lineage this transaction claims (absent for non-token txs)
    #[serde(default)]
    pub token_id: Option<TokenId>,
    #[serde(default)]
    pub token_type: Option<TokenType>,
    #[serde(default)]
    pub vin: Vec<InputRef>,
    #[serde(default)]
    pub vout: Vec<OutputRef>,
    /// Memoized validation verdict; write-once, never set by the crawler
    #[serde(default)]
    pub is_valid_slp: Verdict,
    #[serde(default)]
    pub block_height: Option<u64>,
}

impl TransactionRecord {
    /// A token transaction with no inputs or outputs yet.
    pub fn token(txid: TxId, token_id: TokenId, token_type: TokenType) -> Self {
        Self {
            txid,
            token_id: Some(token_id),
            token_type: Some(token_type),
            vin: Vec::new(),
            vout: Vec::new(),
            is_valid_slp: Verdict::Unresolved,
            block_height: None,
        }
    }

    /// A plain ledger transaction carrying no token.
    pub fn plain(txid: TxId) -> Self {
        Self {
            txid,
            token_id: None,
            token_type: None,
            vin: Vec::new(),
            vout: Vec::new(),
            is_valid_slp: Verdict::Unresolved,
            block_height: None,
        }
    }

    pub fn with_input(mut self, input: InputRef) -> Self {
        self.vin.push(input);
        self
    }

    pub fn with_output(mut self, output: OutputRef) -> Self {
        self.vout.push(output);
        self
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.is_valid_slp = verdict;
        self
    }

    /// True if `input` belongs to this transaction's token lineage graph.
    ///
    /// Skips inputs with neither quantity nor baton, and inputs claiming a
    /// different token id than the record. A mint baton has zero quantity
    /// but is still a lineage edge.
    pub fn is_lineage_input(&self, input: &InputRef) -> bool {
        input.is_token_or_baton() && input.token_id == self.token_id
    }

    /// True if output `n` exists.
    pub fn has_output(&self, n: u32) -> bool {
        self.vout.iter().any(|out| out.n == n)
    }

    /// True if any input spends an output of `parent`.
    pub fn spends_from(&self, parent: &TxId) -> bool {
        self.vin.iter().any(|input| input.txid == *parent)
    }

    /// Genesis convention: the transaction id doubles as the token id.
    pub fn is_genesis_of(&self, token_id: &TokenId) -> bool {
        self.txid == *token_id
    }
}

/// Ordered ancestry buffer, oldest first.
///
/// Owned by exactly one crawl; every insertion is dedup-guarded.
#[derive(Clone, Debug, Default)]
pub struct AncestryChain {
    order: VecDeque<TxId>,
    members: HashSet<TxId>,
}

impl AncestryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a chain from an existing oldest-first list, dropping repeats.
    pub fn from_ids(ids: impl IntoIterator<Item = TxId>) -> Self {
        let mut chain = Self::new();
        for id in ids {
            if chain.members.insert(id) {
                chain.order.push_back(id);
            }
        }
        chain
    }

    /// Prepend `txid` unless already present. Returns true if inserted.
    pub fn push_front_unique(&mut self, txid: TxId) -> bool {
        if !self.members.insert(txid) {
            return false;
        }
        self.order.push_front(txid);
        true
    }

    pub fn into_vec(self) -> Vec<TxId> {
        self.order.into()
    }
}

/// Outcome of a full ancestry crawl.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestryResult {
    pub is_valid: bool,
    /// Ancestors oldest-first, ending with the crawled transaction
    pub dag: Vec<TxId>,
}

impl AncestryResult {
    pub fn new(verdict: Verdict, chain: AncestryChain) -> Self {
        Self {
            is_valid: verdict.is_valid(),
            dag: chain.into_vec(),
        }
    }
}

/// Outcome of the immediate-parent check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentCheck {
    pub has_parent: bool,
    pub dag: Vec<TxId>,
}

/// Outcome of one stitching pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StitchOutcome {
    /// At least one attachment or merge happened
    pub success: bool,
    pub ordered_chains: Vec<Vec<TxId>>,
    pub unresolved: Vec<TxId>,
}

/// Token details reported by the classifier for a token-carrying tx.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub token_id: TokenId,
    pub token_type: Option<TokenType>,
}
