use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use wpilog_indexer::{Indexer, IndexerOptions};

const RECORDS: u64 = 500_000;

/// A log shaped like a robot session: one control record per entry, then
/// interleaved 8-byte samples.
fn synthetic_log(records: u64) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"WPILOG");
    data.extend_from_slice(&0x0100u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    for entry in 1..=20u8 {
        data.extend_from_slice(&[0x00, 0, 17, 0, 0]);
        data.push(entry);
        data.extend_from_slice(&[0u8; 15]);
    }

    for i in 0..records {
        let entry = (i % 20) as u8 + 1;
        let timestamp = i * 20_000;
        // 1 byte id, 1 byte size, 5 byte timestamp
        data.extend_from_slice(&[0x40, entry, 8]);
        data.extend_from_slice(&timestamp.to_le_bytes()[..5]);
        data.extend_from_slice(&(i as f64).to_le_bytes());
    }
    data
}

fn bench_indexing(c: &mut Criterion) {
    let data = synthetic_log(RECORDS);
    let index = Indexer::new().run(&data);
    assert_eq!(index.record_count() as u64, RECORDS + 20);
    assert!((index.max_timestamp() - ((RECORDS - 1) * 20_000) as f64 / 1e6).abs() < 1e-6);

    let mut group = c.benchmark_group("index");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(20);

    group.bench_function("default_capacity", |b| {
        let indexer = Indexer::new();
        b.iter(|| black_box(indexer.run(black_box(&data))));
    });

    group.bench_function("presized", |b| {
        let indexer = Indexer::with_options(IndexerOptions {
            initial_capacity: RECORDS as usize + 20,
            max_capacity: usize::MAX,
        });
        b.iter_batched(
            || &data,
            |data| black_box(indexer.run(data)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_indexing);
criterion_main!(benches);
