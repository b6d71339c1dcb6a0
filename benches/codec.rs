use bintag::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::convert::TryFrom;

/// A medium tree shaped like real payloads: a map of scalars, strings,
/// packed arrays and a list of nested maps.
fn sample_tree() -> Node {
    let mut root = VecMap::new();
    root.put_i32("version", 3);
    root.put_i64("seed", 0x5DEECE66D);
    root.put_str("name", "overworld");
    root.put_byte_array("blob", Bytes::from(vec![0xAB; 4096]));
    root.put_int_array("heights", (0..1024).collect());
    root.put_long_array("hashes", (0..256).map(|i| i * 0x9E3779B9).collect());

    let entries = (0..64)
        .map(|i| {
            let mut entry = VecMap::new();
            entry.put_i32("id", i);
            entry.put_f64("x", f64::from(i) * 1.5);
            entry.put_f64("y", 64.0);
            entry.put_str("tag", "entity");
            Node::Map(entry)
        })
        .collect::<Vec<_>>();
    root.put_list("entities", List::try_from(entries).unwrap());

    Node::Map(root)
}

fn bench_encode(c: &mut Criterion) {
    let node = sample_tree();
    c.bench_function("encode_full", |b| {
        b.iter(|| encode_full(black_box(Some(&node))).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode_full(Some(&sample_tree())).unwrap();
    c.bench_function("decode_full/protocol", |b| {
        b.iter(|| {
            let mut limiter = Limiter::protocol();
            decode_full(black_box(&bytes), &mut limiter).unwrap()
        })
    });
    c.bench_function("decode_full/unlimited", |b| {
        b.iter(|| {
            let mut limiter = Limiter::unlimited();
            decode_full(black_box(&bytes), &mut limiter).unwrap()
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
