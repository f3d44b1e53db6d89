//! Benchmarks for file ingest
//!
//! Compares the sequential and parallel paths over synthetic FASTA/FASTQ
//! of increasing size.
//!
//! Run with: cargo bench --bench ingest

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;
use traceon::Cache;

fn synthetic_fasta(records: usize) -> Vec<u8> {
    let mut contents = Vec::new();
    for i in 0..records {
        let seq = "ACGTACGTGGCCATTA".repeat(i % 8 + 1);
        contents.extend_from_slice(format!(">seq{i}\n{seq}\n").as_bytes());
    }
    contents
}

fn synthetic_fastq(records: usize) -> Vec<u8> {
    let mut contents = Vec::new();
    for i in 0..records {
        let seq = "GATTACAGATTACA".repeat(i % 6 + 1);
        let qual = "J".repeat(seq.len());
        contents.extend_from_slice(format!("@read{i}\n{seq}\n+\n{qual}\n").as_bytes());
    }
    contents
}

fn write_temp(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    File::create(&path).unwrap().write_all(contents).unwrap();
    path
}

fn bench_fasta_ingest(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("fasta_ingest");

    for records in [1_000, 10_000, 100_000].iter() {
        let contents = synthetic_fasta(*records);
        let path = write_temp(&dir, &format!("bench_{records}.fa"), &contents);

        group.throughput(Throughput::Bytes(contents.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(records), records, |b, _| {
            b.iter(|| {
                let cache = Cache::new();
                cache.load(black_box(&path)).unwrap();
                cache.len()
            })
        });
    }
    group.finish();
}

fn bench_fastq_ingest(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("fastq_ingest");

    for records in [1_000, 10_000, 100_000].iter() {
        let contents = synthetic_fastq(*records);
        let path = write_temp(&dir, &format!("bench_{records}.fq"), &contents);

        group.throughput(Throughput::Bytes(contents.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(records), records, |b, _| {
            b.iter(|| {
                let cache = Cache::new();
                cache.load(black_box(&path)).unwrap();
                cache.len()
            })
        });
    }
    group.finish();
}

fn bench_snapshot_roundtrip(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let contents = synthetic_fastq(50_000);
    let input = write_temp(&dir, "snapshot_source.fq", &contents);
    let snapshot = dir.path().join("bench.trc");

    let cache = Cache::new();
    cache.load(&input).unwrap();

    c.bench_function("snapshot_save", |b| {
        b.iter(|| cache.save(black_box(&snapshot)).unwrap())
    });

    cache.save(&snapshot).unwrap();
    c.bench_function("snapshot_restore", |b| {
        b.iter(|| {
            let fresh = Cache::new();
            fresh.restore(black_box(&snapshot)).unwrap();
            fresh.len()
        })
    });
}

criterion_group!(
    benches,
    bench_fasta_ingest,
    bench_fastq_ingest,
    bench_snapshot_roundtrip
);
criterion_main!(benches);
