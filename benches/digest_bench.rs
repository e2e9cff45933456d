//! Benchmarks for md5arena.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use md5arena::{CancelSignal, Engine, digest_blocking, digest_read};

fn sample(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i * 7 + 13) as u8).collect()
}

fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
        let data = sample(size);
        let chunks: Vec<&[u8]> = data.chunks(64 * 1024).collect();

        group.throughput(Throughput::Bytes(size as u64));

        // Warm engine, arena already grown
        group.bench_with_input(
            format!("reused_{}kb", size / 1024),
            &chunks,
            |b, chunks| {
                let mut engine = Engine::new().unwrap();
                let cancel = CancelSignal::new();
                b.iter(|| {
                    let view = digest_blocking(black_box(chunks), &mut engine, &cancel).unwrap();
                    black_box(view.to_digest())
                });
            },
        );

        // Fresh engine per digest
        group.bench_with_input(
            format!("fresh_{}kb", size / 1024),
            &chunks,
            |b, chunks| {
                let cancel = CancelSignal::new();
                b.iter(|| {
                    let mut engine = Engine::new().unwrap();
                    let view = digest_blocking(black_box(chunks), &mut engine, &cancel).unwrap();
                    black_box(view.to_digest())
                });
            },
        );
    }

    group.finish();
}

fn bench_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_sizes");
    let size = 1024 * 1024; // 1 MB
    let data = sample(size);

    group.throughput(Throughput::Bytes(size as u64));
    for chunk_size in [64, 4 * 1024, 64 * 1024, 1024 * 1024] {
        let chunks: Vec<&[u8]> = data.chunks(chunk_size).collect();
        group.bench_function(format!("chunk_{}b", chunk_size), |b| {
            let mut engine = Engine::new().unwrap();
            let cancel = CancelSignal::new();
            b.iter(|| {
                let view = digest_blocking(black_box(&chunks), &mut engine, &cancel).unwrap();
                black_box(view.to_digest())
            });
        });
    }

    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    use md5::{Digest, Md5};

    let mut group = c.benchmark_group("streaming");
    let size = 1024 * 1024; // 1 MB
    let data = sample(size);

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("reader", |b| {
        let mut engine = Engine::new().unwrap();
        let cancel = CancelSignal::new();
        b.iter(|| {
            let cursor = std::io::Cursor::new(black_box(&data));
            let view = digest_read(cursor, &mut engine, &cancel).unwrap();
            black_box(view.to_digest())
        });
    });

    // Baseline
    group.bench_function("md-5", |b| {
        b.iter(|| black_box(Md5::digest(black_box(&data))));
    });

    group.finish();
}

criterion_group!(benches, bench_digest, bench_chunk_sizes, bench_streaming);
criterion_main!(benches);
