// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::graph::Category;

use super::key::Key;
use super::record::Record;

/// One transaction's worth of change to a graph model.
///
/// Inserted keys carry their record in the corresponding modified list, so a
/// consumer can both locate and materialize a new entry from one batch. Field
/// names follow the camelCase wire convention of the diagramming engines this
/// format is exchanged with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncrementalData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_node_keys: Option<Vec<Key>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_node_data: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_node_keys: Option<Vec<Key>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_link_keys: Option<Vec<Key>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_link_data: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_link_keys: Option<Vec<Key>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_data: Option<Record>,
}

impl IncrementalData {
    pub fn is_empty(&self) -> bool {
        !self.has_node_changes() && !self.has_link_changes() && self.model_data.is_none()
    }

    pub fn has_node_changes(&self) -> bool {
        self.inserted_node_keys.is_some()
            || self.modified_node_data.is_some()
            || self.removed_node_keys.is_some()
    }

    pub fn has_link_changes(&self) -> bool {
        self.inserted_link_keys.is_some()
            || self.modified_link_data.is_some()
            || self.removed_link_keys.is_some()
    }

    /// Cancel out keys that are both inserted and removed in this batch
    /// (a remove-and-re-add nets to nothing for that key) and drop empty
    /// change lists.
    pub fn normalized(mut self) -> Self {
        cancel_category(
            &mut self.inserted_node_keys,
            &mut self.removed_node_keys,
            &mut self.modified_node_data,
        );
        cancel_category(
            &mut self.inserted_link_keys,
            &mut self.removed_link_keys,
            &mut self.modified_link_data,
        );
        self
    }
}

fn cancel_category(
    inserted: &mut Option<Vec<Key>>,
    removed: &mut Option<Vec<Key>>,
    modified: &mut Option<Vec<Record>>,
) {
    if let (Some(ins), Some(rem)) = (inserted.as_mut(), removed.as_mut()) {
        let cancelled = ins
            .iter()
            .filter(|key| rem.contains(key))
            .cloned()
            .collect::<Vec<_>>();
        if !cancelled.is_empty() {
            ins.retain(|key| !cancelled.contains(key));
            rem.retain(|key| !cancelled.contains(key));
        }
    }
    prune(inserted);
    prune(removed);
    if modified.as_ref().is_some_and(Vec::is_empty) {
        *modified = None;
    }
}

fn prune(keys: &mut Option<Vec<Key>>) {
    if keys.as_ref().is_some_and(Vec::is_empty) {
        *keys = None;
    }
}

/// Accumulates the changes of one transaction into a minimal batch.
///
/// Later entries refine earlier ones for the same key: an insert after a
/// remove becomes a modify, a remove after an insert nets to nothing. This is
/// what keeps a transaction's outcome free of intermediate churn.
#[derive(Debug, Default)]
pub(crate) struct ChangeCollector {
    nodes: CategoryChanges,
    links: CategoryChanges,
    model_data: Option<Record>,
}

#[derive(Debug, Default)]
pub(crate) struct CategoryChanges {
    inserted: Vec<Key>,
    removed: Vec<Key>,
    modified: Vec<(Key, Record)>,
}

impl CategoryChanges {
    fn record_inserted(&mut self, key: Key, record: Record) {
        if let Some(at) = self.removed.iter().position(|k| *k == key) {
            // Re-add after a remove in the same transaction: net modify.
            self.removed.remove(at);
            self.upsert_modified(key, record);
            return;
        }
        if !self.inserted.contains(&key) {
            self.inserted.push(key.clone());
        }
        self.upsert_modified(key, record);
    }

    fn record_removed(&mut self, key: Key) {
        if let Some(at) = self.inserted.iter().position(|k| *k == key) {
            // Insert then remove in the same transaction: net nothing.
            self.inserted.remove(at);
            self.modified.retain(|(k, _)| *k != key);
            return;
        }
        self.modified.retain(|(k, _)| *k != key);
        if !self.removed.contains(&key) {
            self.removed.push(key);
        }
    }

    fn record_modified(&mut self, key: Key, record: Record) {
        if self.removed.contains(&key) {
            return;
        }
        self.upsert_modified(key, record);
    }

    fn upsert_modified(&mut self, key: Key, record: Record) {
        match self.modified.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = record,
            None => self.modified.push((key, record)),
        }
    }

    fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    fn finish(self) -> (Option<Vec<Key>>, Option<Vec<Record>>, Option<Vec<Key>>) {
        let inserted = (!self.inserted.is_empty()).then_some(self.inserted);
        let removed = (!self.removed.is_empty()).then_some(self.removed);
        let modified = (!self.modified.is_empty())
            .then(|| self.modified.into_iter().map(|(_, record)| record).collect());
        (inserted, modified, removed)
    }
}

impl ChangeCollector {
    pub(crate) fn record_inserted(&mut self, category: Category, key: Key, record: Record) {
        self.category_mut(category).record_inserted(key, record);
    }

    pub(crate) fn record_removed(&mut self, category: Category, key: Key) {
        self.category_mut(category).record_removed(key);
    }

    pub(crate) fn record_modified(&mut self, category: Category, key: Key, record: Record) {
        self.category_mut(category).record_modified(key, record);
    }

    pub(crate) fn record_model_data(&mut self, record: Record) {
        self.model_data = Some(record);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty() && self.model_data.is_none()
    }

    pub(crate) fn finish(self) -> Option<IncrementalData> {
        if self.is_empty() {
            return None;
        }
        let (inserted_node_keys, modified_node_data, removed_node_keys) = self.nodes.finish();
        let (inserted_link_keys, modified_link_data, removed_link_keys) = self.links.finish();
        Some(IncrementalData {
            inserted_node_keys,
            modified_node_data,
            removed_node_keys,
            inserted_link_keys,
            modified_link_data,
            removed_link_keys,
            model_data: self.model_data,
        })
    }

    fn category_mut(&mut self, category: Category) -> &mut CategoryChanges {
        match category {
            Category::Node => &mut self.nodes,
            Category::Link => &mut self.links,
        }
    }
}
