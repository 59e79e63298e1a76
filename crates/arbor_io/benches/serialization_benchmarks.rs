//! Benchmarks for Arbor store serialization (MessagePack).
//!
//! Run with: `cargo bench --package arbor_io`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use arbor_foundation::DataType;
use arbor_io::{from_bytes, to_bytes};
use arbor_store::DataStore;

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates a store with `count` allocated views spread over a few groups.
fn create_store_with_views(count: usize, elements: usize) -> DataStore {
    let mut store = DataStore::new();
    let root = store.root();
    for i in 0..count {
        let view = store
            .create_view_and_allocate(root, &format!("block{}/field{i}", i % 8), DataType::float64(elements))
            .unwrap();
        let values: Vec<f64> = (0..elements).map(|n| n as f64).collect();
        store.set_view_data(view, &values).unwrap();
    }
    store
}

// =============================================================================
// Serialization Benchmarks
// =============================================================================

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for count in [10, 100, 1000] {
        let store = create_store_with_views(count, 64);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("views", count), &store, |b, store| {
            b.iter(|| black_box(to_bytes(store).unwrap()));
        });
    }

    group.finish();
}

fn bench_deserialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize");

    for count in [10, 100, 1000] {
        let bytes = to_bytes(&create_store_with_views(count, 64)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("views", count), &bytes, |b, bytes| {
            b.iter(|| black_box(from_bytes(bytes).unwrap()));
        });
    }

    group.finish();
}

fn bench_large_buffers(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_buffers");

    for elements in [1_000, 100_000] {
        let store = create_store_with_views(4, elements);
        group.throughput(Throughput::Bytes((4 * elements * 8) as u64));
        group.bench_with_input(BenchmarkId::new("roundtrip", elements), &store, |b, store| {
            b.iter(|| black_box(from_bytes(&to_bytes(store).unwrap()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_serialize, bench_deserialize, bench_large_buffers);
criterion_main!(benches);
