//! Log-call throughput: filtered calls vs. calls that build and write a record.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use portolan_log::{fields, log_debug, LoggerConfig, RingBufferSink, Severity};
use serde_json::json;

fn bench_logger(c: &mut Criterion) {
    let ring = Arc::new(RingBufferSink::new(1024));
    let logger = LoggerConfig::builder("bench")
        .standard_serializers()
        .stream(ring, Severity::Info)
        .build()
        .expect("bench logger")
        .child(fields! { component = "bench" });

    let req = json!({
        "method": "GET",
        "url": "/vl2/00:11:22:33:44:55",
        "headers": {"host": "portolan"},
        "body": "ignored"
    });

    c.bench_function("filtered_debug_macro", |b| {
        b.iter(|| log_debug!(logger, "filtered", req = req, n = black_box(1)))
    });

    c.bench_function("written_info_with_req", |b| {
        b.iter(|| logger.info("written", fields! { req = req, n = black_box(1) }))
    });
}

criterion_group!(benches, bench_logger);
criterion_main!(benches);
