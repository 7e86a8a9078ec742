// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! Folding model-side change batches back into app-owned snapshots.
//!
//! These are pure functions over owned vectors: the model emits an
//! [`IncrementalData`] per committed transaction, and the app folds it into
//! the node/link snapshot it owns. Batches are normalized first, so a key
//! removed and re-inserted within one transaction nets to a modify rather
//! than churn.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{IncrementalData, Key, KeyAccessor, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A snapshot record at `index` has no extractable key.
    SnapshotRecordWithoutKey { index: usize },
    /// A modified record at `index` in the change batch has no extractable key.
    ChangeRecordWithoutKey { index: usize },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SnapshotRecordWithoutKey { index } => {
                write!(f, "snapshot record at index {index} has no key")
            }
            Self::ChangeRecordWithoutKey { index } => {
                write!(f, "modified record at index {index} has no key")
            }
        }
    }
}

impl std::error::Error for SyncError {}

/// Fold the node part of `changes` into `node_data`.
///
/// Modified records replace the entry with the matching key; inserted keys
/// append the record carried in the batch's modified list (a key with no
/// carried record is skipped); removed keys filter entries out. A batch with
/// no node changes returns the input untouched.
pub fn sync_node_data(
    changes: &IncrementalData,
    node_data: Vec<Record>,
    key: &KeyAccessor,
) -> Result<Vec<Record>, SyncError> {
    let changes = changes.clone().normalized();
    if !changes.has_node_changes() {
        return Ok(node_data);
    }
    sync_category(
        changes.modified_node_data.as_deref(),
        changes.inserted_node_keys.as_deref(),
        changes.removed_node_keys.as_deref(),
        node_data,
        key,
    )
}

/// Link-collection counterpart of [`sync_node_data`].
pub fn sync_link_data(
    changes: &IncrementalData,
    link_data: Vec<Record>,
    key: &KeyAccessor,
) -> Result<Vec<Record>, SyncError> {
    let changes = changes.clone().normalized();
    if !changes.has_link_changes() {
        return Ok(link_data);
    }
    sync_category(
        changes.modified_link_data.as_deref(),
        changes.inserted_link_keys.as_deref(),
        changes.removed_link_keys.as_deref(),
        link_data,
        key,
    )
}

/// A batch carrying model data replaces the snapshot wholesale; otherwise the
/// input is returned.
pub fn sync_model_data(changes: &IncrementalData, model_data: Record) -> Record {
    match &changes.model_data {
        Some(data) => data.clone(),
        None => model_data,
    }
}

fn sync_category(
    modified: Option<&[Record]>,
    inserted: Option<&[Key]>,
    removed: Option<&[Key]>,
    mut data: Vec<Record>,
    key: &KeyAccessor,
) -> Result<Vec<Record>, SyncError> {
    // index modified records by key for constant-time lookup during insertion
    let mut modified_by_key = HashMap::new();
    if let Some(modified) = modified {
        for (index, record) in modified.iter().enumerate() {
            let record_key = key
                .key_of(record)
                .ok_or(SyncError::ChangeRecordWithoutKey { index })?;
            modified_by_key.insert(record_key, record);
        }

        for (index, entry) in data.iter_mut().enumerate() {
            let entry_key = key
                .key_of(entry)
                .ok_or(SyncError::SnapshotRecordWithoutKey { index })?;
            if let Some(record) = modified_by_key.get(&entry_key) {
                *entry = (*record).clone();
            }
        }
    }

    if let Some(inserted) = inserted {
        for insert_key in inserted {
            if let Some(record) = modified_by_key.get(insert_key) {
                data.push((*record).clone());
            }
        }
    }

    if let Some(removed) = removed {
        let removed = removed.iter().collect::<HashSet<_>>();
        let mut kept = Vec::with_capacity(data.len());
        for (index, entry) in data.into_iter().enumerate() {
            let entry_key = key
                .key_of(&entry)
                .ok_or(SyncError::SnapshotRecordWithoutKey { index })?;
            if !removed.contains(&entry_key) {
                kept.push(entry);
            }
        }
        data = kept;
    }

    Ok(data)
}
