// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! Keyed snapshot reconciliation.
//!
//! [`reconcile`] computes the minimal key-level difference between two
//! snapshots of a keyed collection. It is a pure diff; applying the result to
//! a live model is the job of [`crate::graph::GraphModel::merge_node_data`]
//! and friends.

use std::collections::HashMap;
use std::fmt;

use crate::model::{Key, KeyAccessor, Record};

/// Key-level difference between a previous and a next snapshot.
///
/// `added` keys follow next-snapshot order, `removed` keys previous-snapshot
/// order, and `changed` keys next-snapshot order. A key never appears in more
/// than one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub added: Vec<Key>,
    pub removed: Vec<Key>,
    pub changed: Vec<Key>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Key-to-position index over one snapshot.
///
/// Built fresh for every reconcile/merge call; it is only valid for the exact
/// snapshot it was built from, so it is never cached across mutations.
#[derive(Debug, Clone)]
pub struct SnapshotIndex {
    by_key: HashMap<Key, usize>,
}

impl SnapshotIndex {
    pub fn build(records: &[Record], key: &KeyAccessor) -> Result<Self, ReconcileError> {
        let mut by_key = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let record_key = key
                .key_of(record)
                .ok_or(ReconcileError::MissingKey { index })?;
            if by_key.insert(record_key.clone(), index).is_some() {
                return Err(ReconcileError::DuplicateKey { key: record_key });
            }
        }
        Ok(Self { by_key })
    }

    pub fn get(&self, key: &Key) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// A record at `index` in a snapshot has no extractable key.
    MissingKey { index: usize },
    /// Two records in one snapshot share `key`.
    DuplicateKey { key: Key },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { index } => {
                write!(f, "record at index {index} has no key")
            }
            Self::DuplicateKey { key } => {
                write!(f, "duplicate key '{key}' in snapshot")
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

/// Diff `next` against `previous` under `key`.
///
/// A key present in both snapshots is reported as changed only when the two
/// records differ structurally; rebuilding an equal nested object does not
/// count. Either snapshot containing a keyless or duplicate-keyed record
/// fails the whole call.
pub fn reconcile(
    previous: &[Record],
    next: &[Record],
    key: &KeyAccessor,
) -> Result<Reconciliation, ReconcileError> {
    let previous_index = SnapshotIndex::build(previous, key)?;
    let next_index = SnapshotIndex::build(next, key)?;

    let mut result = Reconciliation::default();

    for record in next {
        // Both indexes were just validated, so key_of cannot fail here.
        let Some(record_key) = key.key_of(record) else {
            continue;
        };
        match previous_index.get(&record_key) {
            None => result.added.push(record_key),
            Some(at) => {
                if previous[at] != *record {
                    result.changed.push(record_key);
                }
            }
        }
    }

    for record in previous {
        let Some(record_key) = key.key_of(record) else {
            continue;
        };
        if !next_index.contains(&record_key) {
            result.removed.push(record_key);
        }
    }

    Ok(result)
}
