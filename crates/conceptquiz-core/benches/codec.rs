use criterion::{black_box, criterion_group, criterion_main, Criterion};

use conceptquiz_core::query::{decode, encode, Cursor, QueryParams};

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let small = QueryParams::new()
        .with("node", "/c/en/cat")
        .with("rel", "/r/CapableOf")
        .with("limit", 50)
        .with("offset", 0);

    let large: QueryParams = (0..50).map(|i| (format!("key{i}"), format!("/c/en/value_{i}"))).collect();
    let large_encoded = encode(&large);

    group.bench_function("encode_small", |b| b.iter(|| encode(black_box(&small))));

    group.bench_function("encode_large", |b| b.iter(|| encode(black_box(&large))));

    group.bench_function("decode_large", |b| {
        b.iter(|| decode(black_box(&large_encoded)))
    });

    group.bench_function("next_page_cursor", |b| {
        b.iter(|| {
            Cursor::from_next_page(black_box(
                "/query?node=/c/en/cat&rel=/r/CapableOf&offset=50&limit=50",
            ))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
