//! # Pulse-Chain Ledger Benchmarks
//!
//! | Area | What is measured |
//! |------|------------------|
//! | Hashing | One record digest |
//! | Mining | Nonce search per difficulty |
//! | Validation | Whole-chain validation by length |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pc_01_ledger::domain::{create_genesis_block, generate_block};
use pc_01_ledger::utils::calculate_hash;
use pc_01_ledger::{BlockValidator, PoWMiner};
use shared_types::Block;
use std::time::Duration;

const TIMESTAMP: &str = "2024-01-01 00:00:00 +0000";

fn plain_chain(len: usize) -> Vec<Block> {
    let mut chain = vec![create_genesis_block(TIMESTAMP, None)];
    for bpm in 1..len as i64 {
        let next = generate_block(&chain[chain.len() - 1], bpm, TIMESTAMP);
        chain.push(next);
    }
    chain
}

fn bench_hashing(c: &mut Criterion) {
    let genesis = create_genesis_block(TIMESTAMP, Some(1));
    let block = PoWMiner::new(0).candidate(&genesis, 72, TIMESTAMP);

    c.bench_function("hashing/calculate_hash", |b| {
        b.iter(|| calculate_hash(black_box(&block)))
    });
}

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("mining");
    group.measurement_time(Duration::from_secs(10));

    for difficulty in [1u32, 2, 3] {
        let genesis = create_genesis_block(TIMESTAMP, Some(difficulty));
        let miner = PoWMiner::new(difficulty);
        group.bench_with_input(
            BenchmarkId::new("difficulty", difficulty),
            &difficulty,
            |b, _| {
                let mut bpm = 0;
                b.iter(|| {
                    bpm += 1;
                    miner.mine(black_box(&genesis), bpm, TIMESTAMP)
                })
            },
        );
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    for len in [100usize, 1_000, 10_000] {
        let chain = plain_chain(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("validate_chain", len), &chain, |b, chain| {
            b.iter(|| BlockValidator::validate_chain(black_box(chain)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hashing, bench_mining, bench_validation);
criterion_main!(benches);
