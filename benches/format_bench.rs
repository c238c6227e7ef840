//! Benchmarks for itemforge template and record operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use itemforge::attribute::{Attribute, StringAttribute, StringOptions};
use itemforge::format::{apply_format, find_composite_attributes};
use itemforge::{Data, Profile, Record, Schema, Value};

fn format_benchmarks(c: &mut Criterion) {
    let template = "{tenant}#{region}#{service}#{id}";
    let mut data = Data::new();
    data.insert("tenant".to_string(), Value::from("acme"));
    data.insert("region".to_string(), Value::from("eu-west-1"));
    data.insert("service".to_string(), Value::from("billing"));
    data.insert("id".to_string(), Value::from("01ARZ3NDEKTSV4RRFFQ69G5FAV"));

    c.bench_function("find_composite_attributes", |b| {
        b.iter(|| find_composite_attributes(black_box(template)))
    });

    c.bench_function("apply_format", |b| {
        b.iter(|| apply_format(black_box(template), black_box(&data)))
    });
}

fn record_benchmarks(c: &mut Criterion) {
    let profile = Profile::default();
    let mut data = Data::new();
    data.insert("tenant".to_string(), Value::from("acme"));
    data.insert("id".to_string(), Value::from("42"));
    data.insert("name".to_string(), Value::from("Ada"));

    c.bench_function("record_construction", |b| {
        b.iter(|| {
            let schema = Schema::new(vec![
                Attribute::String(StringAttribute::new(
                    "pk",
                    StringOptions::new().partition_key(true).format("{tenant}#{id}"),
                    profile,
                )),
                Attribute::String(StringAttribute::new("name", StringOptions::new(), profile)),
            ])
            .unwrap();
            Record::new("users", schema, black_box(&data)).unwrap()
        })
    });
}

criterion_group!(benches, format_benchmarks, record_benchmarks);
criterion_main!(benches);
