// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for the length converter.
//!
//! Measures the performance of:
//! - Parsing and converting raw input
//! - Formatting results with trailing zeros trimmed

use criterion::{criterion_group, criterion_main, Criterion};
use pocket_suite::converter::{convert_input, format_value, LengthUnit};
use std::hint::black_box;

fn bench_convert_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    group.bench_function("convert_input_all_pairs", |b| {
        b.iter(|| {
            for from in LengthUnit::ALL {
                for to in LengthUnit::ALL {
                    black_box(convert_input(black_box("1234.5678"), from, to).ok());
                }
            }
        });
    });

    group.finish();
}

fn bench_format_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    group.bench_function("format_value", |b| {
        b.iter(|| black_box(format_value(black_box(1.0 / 3.0))));
    });

    group.finish();
}

criterion_group!(benches, bench_convert_input, bench_format_value);
criterion_main!(benches);
