//! # dPID Registry Benchmarks
//!
//! Throughput of the synchronous state machine, without the async service
//! wrapper:
//!
//! | Operation | Expected cost |
//! |-----------|---------------|
//! | mint_alias | O(1) |
//! | put_entry | O(1) amortized, one oracle call per gate token |
//! | import_legacy_batch | O(n) in batch size |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dpid_registry::ports::{DiscardTreasury, NoTokens};
use dpid_registry::{
    ContentObjectId, ContentPointer, Dpid, InitParams, LegacyRecord, Principal, Registry,
};

const ADMIN: Principal = Principal([0xAD; 20]);
const USER: Principal = Principal([0x01; 20]);

fn registry(first_dpid: u64) -> Registry {
    let mut registry = Registry::new(Arc::new(NoTokens), Arc::new(DiscardTreasury));
    registry
        .initialize(
            ADMIN,
            InitParams {
                first_dpid,
                namespace_fee: 0,
                entry_fee: 0,
            },
        )
        .expect("initialize");
    registry
}

fn bench_mint(c: &mut Criterion) {
    let mut group = c.benchmark_group("alias-registry");

    group.bench_function("mint_alias", |b| {
        let mut registry = registry(0);
        b.iter(|| black_box(registry.mint_alias(ContentPointer::new("bafy")).is_ok()))
    });

    group.finish();
}

fn bench_put_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifier-allocator");

    group.bench_function("put_entry_open_namespace", |b| {
        let mut registry = registry(0);
        registry
            .register_namespace(USER, "lab", None, 0)
            .expect("register");
        b.iter(|| {
            black_box(
                registry
                    .put_entry(USER, "lab", ContentPointer::new("bafy"), 0)
                    .is_ok(),
            )
        })
    });

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("legacy-migration");

    for size in [10u64, 100, 1_000] {
        let records: Vec<LegacyRecord> = (0..size)
            .map(|i| LegacyRecord {
                from: USER,
                content_object_id: ContentObjectId::new(format!("obj-{}", i % 16)),
                dpid: Dpid(i % 64),
                timestamp: i,
                content_pointer: ContentPointer::new(format!("ptr-{i}")),
            })
            .collect();

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("import_batch", size), &records, |b, records| {
            b.iter(|| {
                let mut registry = registry(1_000_000);
                black_box(registry.import_legacy_batch(ADMIN, records, "").is_ok())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mint, bench_put_entry, bench_import);
criterion_main!(benches);
