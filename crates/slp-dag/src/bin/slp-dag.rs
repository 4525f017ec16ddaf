//! slp-dag: token ancestry validation over a JSON record set.
//!
//! Loads transaction records into the in-memory cache and canonical store,
//! runs one operation and prints its result as JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use slp_dag::{
    init_tracing, DagConfig, DagValidationApi, DagValidationService, LruTransactionCache,
    MemoryValidatedStore, RecordTokenClassifier, TelemetryConfig, TieredRecordStore,
    TransactionRecord, TxId,
};

/// slp-dag: SLP token ancestry validation
#[derive(Parser, Debug)]
#[command(name = "slp-dag")]
#[command(about = "Validate SLP token lineage against a JSON record set")]
struct Args {
    /// JSON file with `canonical` and `cache` record arrays
    #[arg(short, long)]
    records: PathBuf,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a transaction's ancestry to genesis
    Crawl {
        txid: TxId,
        token_id: TxId,
    },
    /// Hop-bounded check for a valid token parent
    Parent {
        txid: TxId,
        #[arg(long, default_value = "0")]
        block_height: u64,
    },
    /// Keep the token-carrying txids, in order
    Filter {
        #[arg(required = true)]
        txids: Vec<TxId>,
    },
    /// Stitch unresolved ids onto ordered chains
    Stitch {
        /// JSON file with `orderedChains` and `unresolved`
        input: PathBuf,
        /// Repeat passes until nothing attaches
        #[arg(long)]
        until_fixed: bool,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RecordSet {
    #[serde(default)]
    canonical: Vec<TransactionRecord>,
    #[serde(default)]
    cache: Vec<TransactionRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct StitchInput {
    ordered_chains: Vec<Vec<TxId>>,
    unresolved: Vec<TxId>,
}

type Store = TieredRecordStore<LruTransactionCache, MemoryValidatedStore>;
type Service = DagValidationService<Store, RecordTokenClassifier<Store>>;

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn build_service(config: DagConfig, records: RecordSet) -> Service {
    let capacity = config.cache_capacity.max(records.cache.len());
    let cache = Arc::new(LruTransactionCache::new(capacity));
    for record in records.cache {
        cache.insert(record);
    }

    let canonical = Arc::new(MemoryValidatedStore::new());
    for record in records.canonical {
        canonical.persist(record);
    }

    tracing::info!(
        cached = cache.len(),
        canonical = canonical.len(),
        "Record tiers loaded"
    );

    let store = Arc::new(TieredRecordStore::new(cache, canonical));
    let classifier = Arc::new(RecordTokenClassifier::new(Arc::clone(&store)));
    DagValidationService::new(config, store, classifier)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&TelemetryConfig::from_env()).context("initializing tracing")?;

    let config = match &args.config {
        Some(path) => DagConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DagConfig::default(),
    };
    let records: RecordSet = read_json(&args.records)?;
    let service = build_service(config, records);

    match args.command {
        Command::Crawl { txid, token_id } => {
            print_json(&service.crawl_dag(txid, token_id).await?)?;
        }
        Command::Parent { txid, block_height } => {
            print_json(&service.has_valid_parent(txid, block_height).await?)?;
        }
        Command::Filter { txids } => {
            print_json(&service.filter_slp_txs(&txids).await?)?;
        }
        Command::Stitch { input, until_fixed } => {
            let StitchInput {
                ordered_chains,
                unresolved,
            } = read_json(&input)?;
            let mut outcome = service.forward_dag(ordered_chains, unresolved).await?;
            while until_fixed && outcome.success {
                outcome = service
                    .forward_dag(outcome.ordered_chains, outcome.unresolved)
                    .await?;
            }
            print_json(&outcome)?;
        }
    }

    tracing::debug!(stats = ?service.get_stats(), "Done");
    Ok(())
}
