use std::hint::black_box;

use bencher::request_heads;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use httpd_core::codec::{normalize, parse_request};

fn benchmark_parse_request(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("parse_request");

    for case in request_heads() {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let input = case.file().content().as_bytes();
            b.iter(|| {
                let request = parse_request(black_box(input)).expect("input should be a valid request head");
                black_box(request);
            });
        });
    }

    group.finish();
}

fn benchmark_parse_and_normalize(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("parse_and_normalize");

    for case in request_heads() {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let input = case.file().content().as_bytes();
            b.iter(|| {
                let request = parse_request(black_box(input)).expect("input should be a valid request head");
                black_box(normalize(request));
            });
        });
    }

    group.finish();
}

criterion_group!(parser, benchmark_parse_request, benchmark_parse_and_normalize);
criterion_main!(parser);
