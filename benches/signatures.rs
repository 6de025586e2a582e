//! Benchmarks for metadata decoding and signature synthesis.
//!
//! Covers the stages between an encoded string array and finished JVM signatures:
//! - String pool decoding (packed and UTF-8 mode)
//! - Stream decoding of a class record
//! - Method, constructor and field signature synthesis
//! - Batch collection of all member signatures

extern crate kmsig;

use criterion::{criterion_group, criterion_main, Criterion};
use kmsig::{
    encoding::decode_bytes,
    metadata::{
        read_class_data,
        signatures::{jvm_method_signature, MemberSignatures, SignatureSynthesizer},
    },
};
use std::hint::black_box;

const STRINGS: [&str; 8] = [
    "com/example/Point",
    "x",
    "kotlin/Int",
    "kotlin/Double",
    "distanceTo",
    "other",
    "kotlin/collections/List",
    "kotlin/String",
];

/// A class with one constructor, `distanceTo(Point): Double` and `x: Int`
#[rustfmt::skip]
const CLASS_STREAM: [u8; 42] = [
    0x00,                                           // empty string table header
    0x18, 0x00,                                     // fq_name = 0
    0x42, 0x08,                                     // constructor {
        0x12, 0x06, 0x10, 0x01, 0x1A, 0x02, 0x30, 0x02, //   value_parameter { name = 1, type { class_name = 2 } }
                                                    // }
    0x4A, 0x0E,                                     // function {
        0x10, 0x04,                                 //   name = 4
        0x1A, 0x02, 0x30, 0x03,                     //   return_type { class_name = 3 }
        0x32, 0x06, 0x10, 0x05, 0x1A, 0x02, 0x30, 0x00, //   value_parameter { name = 5, type { class_name = 0 } }
                                                    // }
    0x52, 0x0B,                                     // property {
        0x10, 0x01,                                 //   name = 1
        0x1A, 0x02, 0x30, 0x02,                     //   return_type { class_name = 2 }
        0xA2, 0x06, 0x02, 0x0A, 0x00,               //   property_signature { field { } }
                                                    // }
];

/// Encode bytes in UTF-8 mode: marker followed by one character per byte
fn utf8_mode(bytes: &[u8]) -> Vec<String> {
    vec![std::iter::once('\u{0}')
        .chain(bytes.iter().map(|byte| char::from(*byte)))
        .collect()]
}

/// Encode bytes with 8-to-7 packing
fn packed(bytes: &[u8]) -> Vec<String> {
    let mut units = Vec::new();
    let mut accumulator = 0u32;
    let mut bits = 0;
    for byte in bytes {
        accumulator |= u32::from(*byte) << bits;
        bits += 8;
        while bits >= 7 {
            units.push(accumulator & 0x7F);
            accumulator >>= 7;
            bits -= 7;
        }
    }
    if bits > 0 {
        units.push(accumulator & 0x7F);
    }

    vec![units
        .into_iter()
        .filter_map(|unit| char::from_u32((unit + 1) & 0x7F))
        .collect()]
}

/// Benchmark decoding a 4 KiB packed string array.
fn bench_decode_packed(c: &mut Criterion) {
    let bytes: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
    let encoded = packed(&bytes);

    c.bench_function("decode_bytes_packed_4k", |b| {
        b.iter(|| {
            let decoded = decode_bytes(black_box(&encoded)).unwrap();
            black_box(decoded)
        });
    });
}

/// Benchmark decoding a 4 KiB UTF-8 mode string array.
fn bench_decode_utf8(c: &mut Criterion) {
    let bytes: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
    let encoded = utf8_mode(&bytes);

    c.bench_function("decode_bytes_utf8_4k", |b| {
        b.iter(|| {
            let decoded = decode_bytes(black_box(&encoded)).unwrap();
            black_box(decoded)
        });
    });
}

/// Benchmark decoding a small class record including its name table.
fn bench_read_class(c: &mut Criterion) {
    c.bench_function("read_class_data", |b| {
        b.iter(|| {
            let class = read_class_data(black_box(&CLASS_STREAM), &STRINGS).unwrap();
            black_box(class.class.function.len())
        });
    });
}

/// Benchmark synthesizing one method signature from decoded metadata.
/// Signature: distanceTo(Lcom/example/Point;)D
fn bench_method_signature(c: &mut Criterion) {
    let class = read_class_data(&CLASS_STREAM, &STRINGS).unwrap();
    let table = class.type_table();
    let function = &class.class.function[0];

    c.bench_function("jvm_method_signature", |b| {
        b.iter(|| {
            let signature =
                jvm_method_signature(black_box(function), &class.names, &table).unwrap();
            black_box(signature)
        });
    });
}

/// Benchmark collecting every member signature of a class.
fn bench_collect(c: &mut Criterion) {
    let class = read_class_data(&CLASS_STREAM, &STRINGS).unwrap();
    let synthesizer = SignatureSynthesizer::new();

    c.bench_function("member_signatures_collect", |b| {
        b.iter(|| {
            let signatures = MemberSignatures::collect(&synthesizer, black_box(&class)).unwrap();
            black_box(signatures)
        });
    });
}

/// Benchmark the whole pipeline from encoded strings to all signatures.
fn bench_end_to_end(c: &mut Criterion) {
    let encoded = packed(&CLASS_STREAM);
    let synthesizer = SignatureSynthesizer::new();

    c.bench_function("end_to_end_packed", |b| {
        b.iter(|| {
            let bytes = decode_bytes(black_box(&encoded)).unwrap();
            let class = read_class_data(&bytes, &STRINGS).unwrap();
            let signatures = MemberSignatures::collect(&synthesizer, &class).unwrap();
            black_box(signatures.len())
        });
    });
}

criterion_group!(
    benches,
    bench_decode_packed,
    bench_decode_utf8,
    bench_read_class,
    bench_method_signature,
    bench_collect,
    bench_end_to_end,
);
criterion_main!(benches);
