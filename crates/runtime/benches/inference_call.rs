// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the inference entry point and the load pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use runtime::{LoaderConfig, ProgramLoader};

fn bench_run_inference(c: &mut Criterion) {
    let mut loader = ProgramLoader::new(LoaderConfig {
        enable_profiling: false,
        ..Default::default()
    })
    .unwrap();
    loader.initialize();
    loader.load_program().unwrap();

    let mut out = [0.0f32];
    c.bench_function("run_inference_add", |b| {
        b.iter(|| {
            loader
                .run_inference(black_box(&[2.0]), black_box(&[3.0]), &mut out)
                .unwrap()
        })
    });
}

fn bench_load_program(c: &mut Criterion) {
    let mut loader = ProgramLoader::new(LoaderConfig::default()).unwrap();
    loader.initialize();

    c.bench_function("reset_and_load_program", |b| {
        b.iter(|| {
            loader.reset();
            loader.load_program()
        })
    });
}

criterion_group!(benches, bench_run_inference, bench_load_program);
criterion_main!(benches);
