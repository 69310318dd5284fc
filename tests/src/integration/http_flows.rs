//! # HTTP Gateway Flows
//!
//! `POST /` mines and appends, `GET /` returns the whole chain. Requests go
//! over real sockets to exercise body limits, timeouts and content types.

use super::support::{get, post, Harness};
use futures::future::join_all;
use node_runtime::{NodeConfig, NodeRuntime};
use pc_01_ledger::{BlockValidator, GuardMode, LedgerConfig};
use pc_02_api_gateway::{GatewayConfig, RejectionStatus};
use shared_types::{Block, GENESIS_PREV_HASH};
use std::time::Duration;

fn decode_chain(body: &str) -> Vec<Block> {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_node_post_then_get() {
    let config = NodeConfig::new("127.0.0.1:0".parse().unwrap());
    let runtime = NodeRuntime::new(config).unwrap();
    let addr = runtime.start().await.unwrap();

    let genesis = decode_chain(&get(addr).await.body).remove(0);
    assert_eq!(genesis.prev_hash, GENESIS_PREV_HASH);

    let reply = post(addr, r#"{"BPM": 72}"#).await;
    assert_eq!(reply.status, 201);
    let block: Block = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(block.index, 1);
    assert_eq!(block.bpm, 72);
    assert_eq!(block.prev_hash, genesis.hash);
    assert_eq!(block.difficulty, Some(1));
    assert!(block.hash.starts_with('0'));

    let reply = get(addr).await;
    assert_eq!(reply.status, 200);
    assert!(reply.body.starts_with("[\n {\n  \"Index\": 0,"));
    let chain = decode_chain(&reply.body);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[1], block);
    assert!(BlockValidator::validate_chain(&chain).is_ok());

    runtime.shutdown().await;
}

#[tokio::test]
async fn test_malformed_body_answers_zero_message() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;
    let addr = harness.spawn_http(GatewayConfig::default()).await;

    for body in ["not json", "", r#"{"BPM": "sixty"}"#] {
        let reply = post(addr, body).await;
        assert_eq!(reply.status, 400, "body {body:?}");
        assert_eq!(reply.json(), serde_json::json!({ "BPM": 0 }));
    }
    assert_eq!(harness.ledger.len(), 1);

    harness.stop();
}

#[tokio::test]
async fn test_lenient_submission_decoding() {
    let harness = Harness::new(LedgerConfig::plain()).await;
    let addr = harness.spawn_http(GatewayConfig::default()).await;

    let reply = post(addr, r#"{"bpm": 90} and then some"#).await;
    assert_eq!(reply.status, 201);
    assert_eq!(reply.json()["BPM"], 90);

    let reply = post(addr, "{}").await;
    assert_eq!(reply.status, 201);
    assert_eq!(reply.json()["BPM"], 0);

    assert_eq!(harness.ledger.len(), 3);
    harness.stop();
}

#[tokio::test]
async fn test_plain_records_omit_work_fields() {
    let harness = Harness::new(LedgerConfig::plain()).await;
    let addr = harness.spawn_http(GatewayConfig::default()).await;

    let reply = post(addr, r#"{"BPM": 61}"#).await;
    assert_eq!(reply.status, 201);
    let record = reply.json();
    assert!(record.get("Nonce").is_none());
    assert!(record.get("Difficulty").is_none());
    assert_eq!(record["Index"], 1);

    harness.stop();
}

#[tokio::test]
async fn test_serialized_concurrent_posts_all_land() {
    let config = LedgerConfig {
        guard: GuardMode::Serialized,
        ..LedgerConfig::proof_of_work(1)
    };
    let harness = Harness::new(config).await;
    let addr = harness.spawn_http(GatewayConfig::default()).await;

    let replies = join_all((0..8).map(|bpm| async move {
        post(addr, &format!(r#"{{"BPM": {bpm}}}"#)).await
    }))
    .await;
    assert!(replies.iter().all(|reply| reply.status == 201));

    let chain = decode_chain(&get(addr).await.body);
    assert_eq!(chain.len(), 9);
    assert!(BlockValidator::validate_chain(&chain).is_ok());

    harness.stop();
}

#[tokio::test]
async fn test_conflict_status_accounts_for_every_submission() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;
    let gateway = GatewayConfig {
        rejection_status: RejectionStatus::Conflict,
        ..GatewayConfig::default()
    };
    let addr = harness.spawn_http(gateway).await;

    let replies = join_all((0..8).map(|bpm| async move {
        post(addr, &format!(r#"{{"BPM": {bpm}}}"#)).await
    }))
    .await;

    assert!(replies.iter().all(|r| r.status == 201 || r.status == 409));
    let accepted = replies.iter().filter(|r| r.status == 201).count();
    assert!(accepted >= 1);

    let chain = decode_chain(&get(addr).await.body);
    assert_eq!(chain.len(), accepted + 1);
    assert!(BlockValidator::validate_chain(&chain).is_ok());

    harness.stop();
}

#[tokio::test]
async fn test_mining_deadline_answers_503() {
    let config = LedgerConfig {
        mining_deadline: Some(Duration::from_millis(50)),
        ..LedgerConfig::proof_of_work(64)
    };
    let harness = Harness::new(config).await;
    let addr = harness.spawn_http(GatewayConfig::default()).await;

    let reply = post(addr, r#"{"BPM": 70}"#).await;
    assert_eq!(reply.status, 503);
    assert_eq!(harness.ledger.len(), 1);

    harness.stop();
}
