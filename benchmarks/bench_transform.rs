use std::hint::black_box;
use std::io::{self, Cursor};

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use fqtrim::transform::{RecordTrimmer, SideSink, TrimEnd};
use fqtrim::TrimPolicy;

const READS: usize = 10_000;

fn fastq_input() -> Vec<u8> {
    let mut data = Vec::with_capacity(READS * 330);
    for i in 0..READS {
        data.extend_from_slice(format!("@read{i} 1:N:0:ACGT\n").as_bytes());
        data.extend(b"ACGTTGCA".iter().cycle().take(150));
        data.extend_from_slice(b"\n+\n");
        data.extend(b"IIIIHHHH".iter().cycle().take(150));
        data.push(b'\n');
    }
    data
}

fn bench_trim_primary_only(c: &mut Criterion) {
    let input = fastq_input();
    let trimmer = RecordTrimmer::new(TrimPolicy::new(10, 20, false).unwrap());

    let mut group = c.benchmark_group("transform");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("primary_only", |b| {
        b.iter(|| {
            let mut sides: Vec<SideSink<io::Sink>> = Vec::new();
            black_box(
                trimmer
                    .trim(&mut Cursor::new(black_box(&input)), &mut io::sink(), &mut sides)
                    .unwrap(),
            );
        });
    });
    group.finish();
}

fn bench_trim_with_side_outputs(c: &mut Criterion) {
    let input = fastq_input();
    let trimmer = RecordTrimmer::new(TrimPolicy::new(10, 20, true).unwrap());

    let mut group = c.benchmark_group("transform");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("keep_both_ends", |b| {
        b.iter(|| {
            let mut sides = vec![
                SideSink::new(TrimEnd::Leading, io::sink()),
                SideSink::new(TrimEnd::Trailing, io::sink()),
            ];
            black_box(
                trimmer
                    .trim(&mut Cursor::new(black_box(&input)), &mut io::sink(), &mut sides)
                    .unwrap(),
            );
        });
    });
    group.finish();
}

criterion_group!(benches, bench_trim_primary_only, bench_trim_with_side_outputs);
criterion_main!(benches);
