//! Benchmarks for metadata normalization
//!
//! Normalization runs on every emitted record, so it should stay cheap for
//! the common shapes: plain mappings, a single error, and long error chains
//! that get cut at the depth bound.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nebula_logger::{ErrorMeta, Fields, Metadata, fields, normalize};
use serde_json::json;
use std::hint::black_box;

fn chain(len: usize) -> ErrorMeta {
    let mut error = ErrorMeta::new(format!("level {len}"));
    for i in (1..len).rev() {
        error = ErrorMeta::new(format!("level {i}"))
            .with_stack(vec![format!("handler_{i} (src/orders.rs:{i}:1)")])
            .with_inner(error);
    }
    error
}

fn bench_plain(c: &mut Criterion) {
    c.bench_function("normalize_plain_value", |b| {
        b.iter(|| {
            let meta = Metadata::from(json!({"orderId": 42, "items": ["a", "b"], "total": 9.5}));
            black_box(normalize(black_box(meta)))
        })
    });

    c.bench_function("normalize_fields", |b| {
        b.iter(|| {
            let meta: Metadata = fields!(order_id = 42, customer = "c-17", express = true).into();
            black_box(normalize(black_box(meta)))
        })
    });
}

fn bench_errors(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_error_chain");
    for len in [1usize, 3, 100] {
        let error = chain(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &error, |b, error| {
            b.iter(|| black_box(normalize(Metadata::Error(error.clone()))))
        });
    }
    group.finish();

    c.bench_function("normalize_error_in_fields", |b| {
        let meta: Metadata = Fields::new()
            .with("context", "checkout")
            .with_error("cause", chain(3))
            .into();
        b.iter(|| black_box(normalize(meta.clone())))
    });
}

criterion_group!(benches, bench_plain, bench_errors);
criterion_main!(benches);
