//! Diagnostic stream decoding benchmarks.
//!
//! Measures legacy and JSON protocol decoding over streams of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use boa_harness::protocol::{parse_diagnostics, ProtocolMode};

fn legacy_stream(buffers: usize, blame: bool) -> String {
    let mut out = String::from("Possible buffer overruns on - \n---\n");
    if blame {
        out.push('\n');
        for i in 0..buffers {
            out.push_str(&format!("buf{i} file.c:{i}\n"));
            out.push_str(&format!("  - Addition [file.c:{}]\n", i + 1));
            out.push_str(&format!("  - unknown function call memcpy [file.c:{}]\n", i + 2));
        }
        out.push_str("---\n");
    }
    for i in 0..buffers {
        out.push_str(&format!("buf{i} file.c:{i}\n"));
    }
    out.push_str("---\n");
    out
}

fn json_stream(buffers: usize) -> String {
    let mut out = String::new();
    for i in 0..buffers {
        out.push_str(&format!(
            concat!(
                "{{\"kind\":\"blame\",\"name\":\"buf{}\",",
                "\"reason\":\"Addition\",\"instruction\":\"file.c:{}\"}}\n",
            ),
            i,
            i + 1
        ));
        out.push_str(&format!(
            "{{\"kind\":\"finding\",\"name\":\"buf{i}\",\"location\":\"file.c:{i}\"}}\n"
        ));
    }
    out.push_str("{\"kind\":\"end\"}\n");
    out
}

fn bench_legacy(c: &mut Criterion) {
    let mut group = c.benchmark_group("legacy_decode");

    for count in [10, 100, 1000] {
        for blame in [false, true] {
            let stream = legacy_stream(count, blame);
            let label = if blame { "blame" } else { "plain" };

            group.throughput(Throughput::Bytes(stream.len() as u64));
            group.bench_with_input(BenchmarkId::new(label, count), &stream, |b, s| {
                b.iter(|| parse_diagnostics(black_box(s), ProtocolMode::Legacy, blame))
            });
        }
    }

    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_decode");

    for count in [10, 100, 1000] {
        let stream = json_stream(count);

        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::new("blame", count), &stream, |b, s| {
            b.iter(|| parse_diagnostics(black_box(s), ProtocolMode::Json, true))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_legacy, bench_json);
criterion_main!(benches);
