use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hwev_decoder::EventDecoder;
use hwev_tests::{encode_envelope, large_envelope, sample_envelope};

fn bench_decode_small(c: &mut Criterion) {
    let bytes = encode_envelope(&sample_envelope(7));
    let decoder = EventDecoder::default();

    c.bench_function("decode_small", |b| {
        b.iter(|| decoder.envelope_from_slice(&bytes).unwrap());
    });
}

fn bench_decode_payload_sizes(c: &mut Criterion) {
    let decoder = EventDecoder::default();
    let mut group = c.benchmark_group("decode_payload_size");

    for size in [64usize, 1024, 16 * 1024, 256 * 1024] {
        let bytes = encode_envelope(&large_envelope(size));
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| decoder.envelope_from_slice(bytes).unwrap());
        });
    }

    group.finish();
}

fn bench_pooled_vs_fresh(c: &mut Criterion) {
    let bytes = encode_envelope(&sample_envelope(7));
    let pooled = EventDecoder::default();

    let mut group = c.benchmark_group("decode_pooling");

    group.bench_function("pooled", |b| {
        b.iter(|| pooled.envelope_from_slice(&bytes).unwrap());
    });

    group.bench_function("fresh", |b| {
        b.iter(|| EventDecoder::default().envelope_from_slice(&bytes).unwrap());
    });

    group.finish();
}

fn bench_decode_bare_payload(c: &mut Criterion) {
    let bytes = br#"{"version":"v2","data":{"reading":21.5,"unit":"C","samples":[1,2,3,4,5,6,7,8]}}"#;
    let decoder = EventDecoder::default();

    c.bench_function("decode_bare_payload", |b| {
        b.iter(|| decoder.payload_from_slice(bytes).unwrap());
    });
}

criterion_group!(
    benches,
    bench_decode_small,
    bench_decode_payload_sizes,
    bench_pooled_vs_fresh,
    bench_decode_bare_payload
);
criterion_main!(benches);
