//! # Block Scan Tests
//!
//! Block filtering and out-of-order chain stitching through the service.

mod common;

use common::{genesis, id, scripted_service, send, Ledger, ScriptedClassifier};
use slp_dag::domain::invariants::invariant_disjoint_chains;
use slp_dag::{DagError, DagValidationApi, TokenType, TransactionRecord};

// =============================================================================
// BLOCK FILTER
// =============================================================================

#[tokio::test]
async fn test_filter_keeps_only_classified_tx() {
    let ledger = Ledger::new();
    let classifier = ScriptedClassifier::new(vec![
        Ok(false),
        Ok(false),
        Ok(false),
        Ok(false),
        Ok(true),
    ]);
    let service = scripted_service(&ledger, classifier);
    let block: Vec<_> = (1..=5).map(id).collect();

    let kept = service.filter_slp_txs(&block).await.unwrap();

    assert_eq!(kept, vec![id(5)]);
    assert_eq!(service.get_stats().filtered_txs, 1);
}

#[tokio::test]
async fn test_filter_propagates_classifier_error_unchanged() {
    let ledger = Ledger::new();
    let classifier = ScriptedClassifier::new(vec![Ok(true), Err("test error".to_string())]);
    let service = scripted_service(&ledger, classifier);

    let err = service
        .filter_slp_txs(&[id(1), id(2), id(3)])
        .await
        .unwrap_err();

    assert!(matches!(err, DagError::Classifier(_)));
    assert_eq!(err.to_string(), "test error");
}

#[tokio::test]
async fn test_record_classifier_filters_block_in_order() {
    let token = id(0xA0);
    let ledger = Ledger::linear(token, 2)
        .cached(TransactionRecord::plain(id(0x30)))
        .cached(TransactionRecord::plain(id(0x31)));
    let service = ledger.service();

    let block = [id(0x30), id(2), id(0x31), token, id(1), id(0x99)];
    let kept = service.filter_slp_txs(&block).await.unwrap();

    assert_eq!(kept, vec![id(2), token, id(1)]);
}

// =============================================================================
// CHAIN STITCHING
// =============================================================================

#[tokio::test]
async fn test_stitch_extends_four_chain_to_five() {
    let token = id(0xA0);
    let ledger = Ledger::linear(token, 5)
        .cached(send(id(0x40), token, TokenType::Fungible, &[id(0x41)]))
        .cached(send(id(0x50), token, TokenType::Fungible, &[id(0x51)]));
    let service = ledger.service();

    let outcome = service
        .forward_dag(
            vec![vec![id(1), id(2), id(3), id(4)]],
            vec![id(0x40), id(5), id(0x50)],
        )
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.ordered_chains.len(), 1);
    assert_eq!(outcome.ordered_chains[0].len(), 5);
    assert_eq!(outcome.ordered_chains[0].last(), Some(&id(5)));
    assert_eq!(outcome.unresolved.len(), 2);
}

#[tokio::test]
async fn test_stitch_converges_to_fixed_point() {
    let token = id(0xA0);
    let ledger = Ledger::linear(token, 8).cached(genesis(id(0xB0), TokenType::Fungible));
    let service = ledger.service();

    let mut chains = vec![vec![id(4)], vec![id(8)]];
    let mut unresolved = vec![id(7), id(0xB0), id(2), id(6), id(1), id(5), id(3)];

    for _ in 0..10 {
        let outcome = service
            .forward_dag(chains.clone(), unresolved.clone())
            .await
            .unwrap();
        assert!(invariant_disjoint_chains(&outcome.ordered_chains));
        if !outcome.success {
            break;
        }
        chains = outcome.ordered_chains;
        unresolved = outcome.unresolved;
    }

    assert_eq!(chains, vec![(1..=8).map(id).collect::<Vec<_>>()]);
    assert_eq!(unresolved, vec![id(0xB0)]);

    // Once converged, a further pass changes nothing.
    let again = service
        .forward_dag(chains.clone(), unresolved.clone())
        .await
        .unwrap();
    assert!(!again.success);
    assert_eq!(again.ordered_chains, chains);
    assert_eq!(again.unresolved, unresolved);
}

#[tokio::test]
async fn test_stitch_never_duplicates_placed_ids() {
    let token = id(0xA0);
    let ledger = Ledger::linear(token, 4);
    let service = ledger.service();

    let outcome = service
        .forward_dag(vec![vec![id(1), id(2)]], vec![id(2), id(3), id(3), id(1)])
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.ordered_chains, vec![vec![id(1), id(2), id(3)]]);
    assert!(outcome.unresolved.is_empty());
}
