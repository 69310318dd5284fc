//! # Chain Replacement and Event Flow
//!
//! Longest-chain replacement and the events every outcome produces, observed
//! through the bus the gateways subscribe to.

use super::support::Harness;
use pc_01_ledger::{now_timestamp, BlockValidator, LedgerApi, LedgerConfig, PoWMiner, ReplacePolicy};
use shared_bus::{ChainEvent, EventFilter};
use shared_types::Block;

fn extend(mut chain: Vec<Block>, readings: &[i64], difficulty: u32) -> Vec<Block> {
    let miner = PoWMiner::new(difficulty);
    for &bpm in readings {
        let tail = chain.last().unwrap().clone();
        chain.push(miner.mine(&tail, bpm, now_timestamp()).unwrap());
    }
    chain
}

#[tokio::test]
async fn test_submit_publishes_append() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;
    let mut events = harness.bus.subscribe(EventFilter::all());

    let outcome = harness.ledger.submit(66).await.unwrap();
    assert!(outcome.is_accepted());

    match events.recv().await {
        Some(ChainEvent::BlockAppended(block)) => assert_eq!(&block, outcome.block()),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_longer_chain_wins() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;
    let mut events = harness.bus.subscribe(EventFilter::chain_changes());

    let longer = extend(harness.ledger.blocks().await, &[70, 71, 72], 1);
    let tail_hash = longer[3].hash.clone();
    assert!(harness.ledger.replace(longer.clone()).await);
    assert_eq!(harness.ledger.blocks().await, longer);

    match events.recv().await {
        Some(ChainEvent::ChainReplaced { length, tail_hash: hash }) => {
            assert_eq!(length, 4);
            assert_eq!(hash, tail_hash);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // Submissions continue on top of the installed chain.
    let outcome = harness.ledger.submit(73).await.unwrap();
    assert_eq!(outcome.block().index, 4);
    assert_eq!(outcome.block().prev_hash, tail_hash);
}

#[tokio::test]
async fn test_equal_or_shorter_chain_refused() {
    let harness = Harness::new(LedgerConfig::plain()).await;
    harness.ledger.submit(80).await.unwrap();
    let mut events = harness.bus.subscribe(EventFilter::chain_changes());

    let current = harness.ledger.blocks().await;
    assert!(!harness.ledger.replace(current.clone()).await);
    assert!(!harness.ledger.replace(current[..1].to_vec()).await);
    assert!(!harness.ledger.replace(Vec::new()).await);

    assert_eq!(harness.ledger.blocks().await, current);
    assert!(events.try_recv().unwrap().is_none());
}

#[tokio::test]
async fn test_length_only_accepts_forged_history() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;

    let mut forged = extend(harness.ledger.blocks().await, &[60, 61], 1);
    forged[1].bpm = 200;
    assert!(BlockValidator::validate_chain(&forged).is_err());

    assert!(harness.ledger.replace(forged).await);
    assert_eq!(harness.ledger.blocks().await[1].bpm, 200);
}

#[tokio::test]
async fn test_validated_policy_refuses_forged_history() {
    let config = LedgerConfig {
        replace_policy: ReplacePolicy::Validated,
        ..LedgerConfig::proof_of_work(1)
    };
    let harness = Harness::new(config).await;
    let mut events = harness.bus.subscribe(EventFilter::chain_changes());

    let honest = extend(harness.ledger.blocks().await, &[60, 61], 1);
    let mut forged = honest.clone();
    forged[1].bpm = 200;

    assert!(!harness.ledger.replace(forged).await);
    assert!(events.try_recv().unwrap().is_none());
    assert_eq!(harness.ledger.len(), 1);

    assert!(harness.ledger.replace(honest).await);
    assert_eq!(harness.ledger.len(), 3);
}
