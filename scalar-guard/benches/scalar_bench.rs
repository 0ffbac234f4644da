//! Benchmarks for option compilation and value validation
//!
//! Compilation happens once per scalar at schema build time; validation runs
//! for every incoming literal and outgoing value.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use scalar_guard::core::{compile, ConstraintOptions, Kind};
use scalar_guard::scalar::{self, LiteralNode};
use scalar_guard::value::Value;
use std::hint::black_box;

fn string_options() -> ConstraintOptions {
    ConstraintOptions::try_from(serde_json::json!({
        "min": [2, "utf8"],
        "max": 32,
        "alphanum": true,
        "lowercase": true,
        "whatever": true,
    }))
    .unwrap()
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    let options = string_options();
    group.bench_function("string", |b| {
        b.iter(|| compile(Kind::String, black_box(&options)))
    });

    let options = ConstraintOptions::try_from(serde_json::json!({
        "integer": true,
        "min": 0,
        "max": 150,
        "precision": 0,
    }))
    .unwrap();
    group.bench_function("number", |b| {
        b.iter(|| compile(Kind::Number, black_box(&options)))
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let rule = compile(Kind::String, &string_options());
    for input in ["roger", "Roger42", "@@@"] {
        group.bench_with_input(BenchmarkId::new("string", input), input, |b, input| {
            b.iter(|| rule.validate(black_box(Value::from(input))))
        });
    }

    let rule = compile(
        Kind::Date,
        &ConstraintOptions::new().with("max", "now"),
    );
    group.bench_function("date_iso", |b| {
        b.iter(|| rule.validate(black_box(Value::from("2020-01-01T00:00:00Z"))))
    });

    let rule = compile(Kind::Array, &ConstraintOptions::new().with("unique", true));
    let items: Vec<Value> = (0..100).map(Value::from).collect();
    group.bench_function("array_unique_100", |b| {
        b.iter_batched(
            || Value::List(items.clone()),
            |list| rule.validate(list),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_adapter(c: &mut Criterion) {
    let name = scalar::string(&string_options());

    c.bench_function("adapter_parse_literal", |b| {
        b.iter_batched(
            || LiteralNode::value("Roger42"),
            |mut node| name.parse_literal(&mut node),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("adapter_serialize", |b| {
        b.iter(|| name.serialize(black_box(Value::from(42))))
    });
}

criterion_group!(benches, bench_compile, bench_validate, bench_adapter);
criterion_main!(benches);
