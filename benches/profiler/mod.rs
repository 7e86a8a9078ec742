// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! Shared criterion configuration with an opt-in pprof flamegraph profiler.
//!
//! Knobs come from the environment so CI and local runs can tune cost without
//! touching bench code: `GRAPHBIND_BENCH_SAMPLES`, `GRAPHBIND_BENCH_WARMUP_MS`,
//! `GRAPHBIND_BENCH_MEASURE_MS`, `GRAPHBIND_PROFILE_HZ`.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;

use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub fn criterion() -> Criterion {
    let samples = env_or("GRAPHBIND_BENCH_SAMPLES", 50usize).clamp(10, 500);
    let warmup_ms = env_or("GRAPHBIND_BENCH_WARMUP_MS", 2_000u64).max(100);
    let measure_ms = env_or("GRAPHBIND_BENCH_MEASURE_MS", 4_000u64).max(500);
    let profile_hz = env_or("GRAPHBIND_PROFILE_HZ", 200i32).clamp(1, 1_000);

    Criterion::default()
        .sample_size(samples)
        .warm_up_time(Duration::from_millis(warmup_ms))
        .measurement_time(Duration::from_millis(measure_ms))
        .with_profiler(PProfProfiler::new(profile_hz, Output::Flamegraph(None)))
}
