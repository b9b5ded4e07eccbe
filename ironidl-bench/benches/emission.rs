//! Emission benchmarks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ironidl_bench::{array_module, record_chain, wide_interface};
use ironidl_codegen::{GeneratorConfig, generate};
use std::hint::black_box;

fn benchmark_record_chain(c: &mut Criterion) {
    let config = GeneratorConfig::new();
    let mut group = c.benchmark_group("record_chain");
    for size in [8, 64, 256] {
        let Ok(ast) = record_chain(size) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &ast, |b, ast| {
            b.iter(|| generate(black_box(ast), &config))
        });
    }
    group.finish();
}

fn benchmark_arrays(c: &mut Criterion) {
    let config = GeneratorConfig::new();
    let Ok(fixed) = array_module(&[16, 16, 4], true) else {
        return;
    };
    let Ok(variable) = array_module(&[16, 16, 4], false) else {
        return;
    };

    c.bench_function("array_fixed_element", |b| {
        b.iter(|| generate(black_box(&fixed), &config))
    });

    c.bench_function("array_variable_element", |b| {
        b.iter(|| generate(black_box(&variable), &config))
    });
}

fn benchmark_interface(c: &mut Criterion) {
    let config = GeneratorConfig::new();
    let Ok(ast) = wide_interface(100) else {
        return;
    };

    c.bench_function("interface_100_operations", |b| {
        b.iter(|| generate(black_box(&ast), &config))
    });
}

criterion_group!(
    benches,
    benchmark_record_chain,
    benchmark_arrays,
    benchmark_interface,
);
criterion_main!(benches);
