// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! Deterministic snapshot fixtures shared by the benches.

use graphbind::model::{PropValue, Record};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub fn len(self) -> usize {
        match self {
            Self::Small => 100,
            Self::Medium => 1_000,
            Self::Large => 5_000,
        }
    }
}

pub fn node_snapshot(case: Case) -> Vec<Record> {
    (0..case.len())
        .map(|idx| {
            Record::new()
                .with("key", idx as i64)
                .with("text", format!("node_{idx:05}"))
                .with("category", if idx % 7 == 0 { "group" } else { "step" })
                .with(
                    "geo",
                    PropValue::object([("x", (idx % 40) as i64 * 16), ("y", (idx / 40) as i64 * 24)]),
                )
        })
        .collect()
}

/// A shifted variant of `snapshot`: roughly 10% of records change a field,
/// 5% are dropped, and 5% new keys appear at the end.
pub fn shifted_snapshot(snapshot: &[Record]) -> Vec<Record> {
    let len = snapshot.len();
    let mut next = Vec::with_capacity(len + len / 20);
    for (idx, record) in snapshot.iter().enumerate() {
        if idx % 20 == 3 {
            continue;
        }
        if idx % 10 == 1 {
            next.push(record.clone().with("text", format!("renamed_{idx:05}")));
        } else {
            next.push(record.clone());
        }
    }
    for idx in 0..len / 20 {
        next.push(
            Record::new()
                .with("key", (len + idx) as i64)
                .with("text", format!("added_{idx:05}")),
        );
    }
    next
}
