// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use graphbind::diff::{reconcile, Reconciliation};
use graphbind::model::KeyAccessor;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group name in this file: `diff.reconcile`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `noop_small`, `shifted_large`).
fn checksum_reconciliation(recon: &Reconciliation) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(recon.added.len() as u64);
    acc = acc.wrapping_mul(131).wrapping_add(recon.removed.len() as u64);
    acc = acc.wrapping_mul(131).wrapping_add(recon.changed.len() as u64);
    acc
}

fn benches_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff.reconcile");
    let by_key = KeyAccessor::default();

    for (case, id) in [
        (fixtures::Case::Small, "small"),
        (fixtures::Case::Medium, "medium"),
        (fixtures::Case::Large, "large"),
    ] {
        let previous = fixtures::node_snapshot(case);
        let identical = previous.clone();
        let shifted = fixtures::shifted_snapshot(&previous);

        group.throughput(Throughput::Elements(previous.len() as u64));
        group.bench_function(format!("noop_{id}"), |b| {
            b.iter(|| {
                let recon = reconcile(black_box(&previous), black_box(&identical), &by_key)
                    .expect("reconcile");
                black_box(checksum_reconciliation(&recon))
            })
        });

        group.throughput(Throughput::Elements(previous.len() as u64));
        group.bench_function(format!("shifted_{id}"), |b| {
            b.iter(|| {
                let recon = reconcile(black_box(&previous), black_box(&shifted), &by_key)
                    .expect("reconcile");
                black_box(checksum_reconciliation(&recon))
            })
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_reconcile
}
criterion_main!(benches);
