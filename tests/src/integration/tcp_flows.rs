//! # Line Gateway Flows
//!
//! Peers read a prompt, send one reading per line and receive the whole chain
//! whenever it changes, whoever changed it.

use super::support::{post, Harness, LinePeer};
use pc_01_ledger::{now_timestamp, LedgerApi, LedgerConfig, PoWMiner};
use pc_02_api_gateway::GatewayConfig;
use pc_03_line_gateway::{LineGatewayConfig, PROMPT, REPROMPT};
use std::time::Duration;

#[tokio::test]
async fn test_submit_line_broadcasts_and_reprompts() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;
    let addr = harness.spawn_tcp(LineGatewayConfig::default()).await;

    let mut peer = LinePeer::connect(addr).await;
    peer.expect_all(&[PROMPT]).await;

    peer.send_line("75").await;
    let seen = peer.expect_all(&["\"BPM\": 75", REPROMPT]).await;
    assert!(seen.contains("\"Index\": 1"));
    assert_eq!(harness.ledger.len(), 2);

    harness.stop();
}

#[tokio::test]
async fn test_non_integer_line_is_skipped() {
    let harness = Harness::new(LedgerConfig::plain()).await;
    let addr = harness.spawn_tcp(LineGatewayConfig::default()).await;

    let mut peer = LinePeer::connect(addr).await;
    peer.expect_all(&[PROMPT]).await;

    peer.send_line("abc").await;
    peer.send_line("61").await;
    peer.expect_all(&["\"BPM\": 61"]).await;

    let blocks = harness.ledger.blocks().await;
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].bpm, 61);

    harness.stop();
}

#[tokio::test]
async fn test_http_submission_reaches_tcp_peer() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;
    let http_addr = harness.spawn_http(GatewayConfig::default()).await;
    let tcp_addr = harness.spawn_tcp(LineGatewayConfig::default()).await;

    let mut peer = LinePeer::connect(tcp_addr).await;
    peer.expect_all(&[PROMPT]).await;

    let reply = post(http_addr, r#"{"BPM": 88}"#).await;
    assert_eq!(reply.status, 201);
    let hash = reply.json()["Hash"].as_str().unwrap().to_string();

    peer.expect_all(&["\"BPM\": 88", hash.as_str()]).await;

    harness.stop();
}

#[tokio::test]
async fn test_every_peer_sees_each_append() {
    let harness = Harness::new(LedgerConfig::plain()).await;
    let addr = harness.spawn_tcp(LineGatewayConfig::default()).await;

    let mut alice = LinePeer::connect(addr).await;
    let mut bob = LinePeer::connect(addr).await;
    alice.expect_all(&[PROMPT]).await;
    bob.expect_all(&[PROMPT]).await;

    alice.send_line("64").await;
    alice.expect_all(&["\"BPM\": 64"]).await;
    bob.expect_all(&["\"BPM\": 64"]).await;

    bob.send_line("65").await;
    alice.expect_all(&["\"BPM\": 65"]).await;
    bob.expect_all(&["\"BPM\": 65"]).await;

    harness.stop();
}

#[tokio::test]
async fn test_replacement_is_pushed_to_peers() {
    let harness = Harness::new(LedgerConfig::proof_of_work(1)).await;
    let addr = harness.spawn_tcp(LineGatewayConfig::default()).await;

    let mut peer = LinePeer::connect(addr).await;
    peer.expect_all(&[PROMPT]).await;

    let mut longer = harness.ledger.blocks().await;
    let miner = PoWMiner::new(1);
    for bpm in [58, 59] {
        let tail = longer.last().unwrap().clone();
        longer.push(miner.mine(&tail, bpm, now_timestamp()).unwrap());
    }
    let tail_hash = longer.last().unwrap().hash.clone();

    assert!(harness.ledger.replace(longer).await);
    peer.expect_all(&["\"BPM\": 59", tail_hash.as_str()]).await;

    harness.stop();
}

#[tokio::test]
async fn test_periodic_push_is_compact() {
    let harness = Harness::new(LedgerConfig::plain()).await;
    let config = LineGatewayConfig {
        push_interval: Duration::from_millis(200),
        ..LineGatewayConfig::default()
    };
    let addr = harness.spawn_tcp(config).await;

    let mut peer = LinePeer::connect(addr).await;
    peer.expect_all(&[PROMPT]).await;
    peer.expect_all(&["[{\"Index\":0,"]).await;

    harness.stop();
}

#[tokio::test]
async fn test_shutdown_closes_peers() {
    let harness = Harness::new(LedgerConfig::plain()).await;
    let addr = harness.spawn_tcp(LineGatewayConfig::default()).await;

    let mut peer = LinePeer::connect(addr).await;
    peer.expect_all(&[PROMPT]).await;

    harness.stop();
    peer.expect_eof().await;
}
