//! Benchmarks for resilient decoding of collections and key conversion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use resilient_codable::collections::{LosslessArray, LossyArray, LossyDictionary};
use resilient_codable::de;
use resilient_codable::{to_snake_case, DecoderOptions, KeyDecodingStrategy, Value};

// ============================================================================
// Document Helpers
// ============================================================================

/// An array of integers where every `bad_every`th element is a string.
fn integer_array(len: usize, bad_every: usize) -> Value {
    let items = (0..len)
        .map(|i| {
            if bad_every > 0 && i % bad_every == 0 {
                Value::from("not a number")
            } else {
                Value::Integer(i as i64)
            }
        })
        .collect();
    Value::Array(items)
}

fn camel_case_document(fields: usize) -> Value {
    let map = (0..fields)
        .map(|i| (format!("fieldNumber{}Value", i), Value::Integer(i as i64)))
        .collect();
    Value::Object(map)
}

// ============================================================================
// Collection Benchmarks
// ============================================================================

fn bench_lossy_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("lossy_array");
    let reporting = DecoderOptions::default().with_resilient_error_reporting(true);

    for len in [100usize, 1000] {
        let clean = integer_array(len, 0);
        let dirty = integer_array(len, 10);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("clean", len), &clean, |b, doc| {
            b.iter(|| de::decode::<LossyArray<i64>>(black_box(doc)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("dirty", len), &dirty, |b, doc| {
            b.iter(|| de::decode::<LossyArray<i64>>(black_box(doc)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("dirty_reporting", len), &dirty, |b, doc| {
            b.iter(|| {
                de::decode_with_report::<LossyArray<i64>>(black_box(doc), &reporting).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_lossless_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("lossless_array");

    for len in [100usize, 1000] {
        let mixed = integer_array(len, 3);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("mixed", len), &mixed, |b, doc| {
            b.iter(|| de::decode::<LosslessArray<String>>(black_box(doc)).unwrap())
        });
    }

    group.finish();
}

fn bench_lossy_dictionary(c: &mut Criterion) {
    let mut group = c.benchmark_group("lossy_dictionary");
    let doc = camel_case_document(200);
    let options = DecoderOptions::default()
        .with_key_decoding_strategy(KeyDecodingStrategy::ConvertFromCamelCase);

    group.throughput(Throughput::Elements(200));
    group.bench_function("200_entries/camel_case", |b| {
        b.iter(|| {
            de::decode_with_options::<LossyDictionary<String, i64>>(black_box(&doc), &options)
                .unwrap()
        })
    });

    group.finish();
}

// ============================================================================
// Key Conversion Benchmarks
// ============================================================================

fn bench_snake_case(c: &mut Criterion) {
    let mut group = c.benchmark_group("snake_case");

    for key in ["id", "userProfileImageURL", "__leadingAndTrailing__"] {
        group.bench_with_input(BenchmarkId::from_parameter(key), key, |b, key| {
            b.iter(|| to_snake_case(black_box(key)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lossy_array,
    bench_lossless_array,
    bench_lossy_dictionary,
    bench_snake_case,
);

criterion_main!(benches);
