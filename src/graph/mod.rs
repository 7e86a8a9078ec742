// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! The live mutable side of the binding: a keyed graph model with change
//! listeners and transactions.
//!
//! Mutations are grouped into transactions; each committed transaction
//! delivers its buffered per-change events and one terminal
//! [`ChangedEvent::TransactionFinished`] carrying the batch as
//! [`crate::model::IncrementalData`]. Merge operations run with listeners
//! suppressed so that applying an external snapshot never echoes back as a
//! fresh local edit.

pub mod events;

use std::fmt;

use crate::diff::{reconcile, Reconciliation, ReconcileError, SnapshotIndex};
use crate::model::{ChangeCollector, Key, KeyAccessor, Record};
use crate::model::record::FieldNames;

pub use events::{Category, ChangedEvent, ListenerId};

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Link => f.write_str("link"),
        }
    }
}

pub type ChangedListener = Box<dyn FnMut(&ChangedEvent) + Send>;

/// A mutable, event-emitting collection of keyed node/link records plus
/// shared model data.
pub struct GraphModel {
    node_key: KeyAccessor,
    link_key: KeyAccessor,
    node_data: Vec<Record>,
    link_data: Vec<Record>,
    model_data: Record,
    read_only: bool,
    listeners: Vec<(ListenerId, ChangedListener)>,
    next_listener_id: u64,
    suppress_listeners: bool,
    txn_depth: u32,
    txn_name: Option<String>,
    pending_events: Vec<ChangedEvent>,
    collector: ChangeCollector,
}

impl fmt::Debug for GraphModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphModel")
            .field("node_key", &self.node_key)
            .field("link_key", &self.link_key)
            .field("node_data", &self.node_data)
            .field("link_data", &self.link_data)
            .field("model_data", &self.model_data)
            .field("read_only", &self.read_only)
            .field("listeners", &self.listeners.len())
            .field("txn_depth", &self.txn_depth)
            .finish()
    }
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    ReadOnly,
    MissingKey { category: Category },
    DuplicateKey { category: Category, key: Key },
    KeyNotFound { category: Category, key: Key },
    KeyMismatch { category: Category, expected: Key, found: Option<Key> },
    Reconcile(ReconcileError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("model is read-only"),
            Self::MissingKey { category } => {
                write!(f, "{category} record has no key")
            }
            Self::DuplicateKey { category, key } => {
                write!(f, "{category} key '{key}' already exists")
            }
            Self::KeyNotFound { category, key } => {
                write!(f, "{category} key '{key}' not found")
            }
            Self::KeyMismatch { category, expected, found } => match found {
                Some(found) => write!(
                    f,
                    "{category} record keyed '{found}' does not match '{expected}'"
                ),
                None => write!(f, "{category} record has no key, expected '{expected}'"),
            },
            Self::Reconcile(source) => write!(f, "snapshot reconcile failed: {source}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Reconcile(source) => Some(source),
            _ => None,
        }
    }
}

impl From<ReconcileError> for ModelError {
    fn from(source: ReconcileError) -> Self {
        Self::Reconcile(source)
    }
}

impl GraphModel {
    pub fn new() -> Self {
        Self::with_keys(KeyAccessor::default(), KeyAccessor::default())
    }

    pub fn with_keys(node_key: KeyAccessor, link_key: KeyAccessor) -> Self {
        Self {
            node_key,
            link_key,
            node_data: Vec::new(),
            link_data: Vec::new(),
            model_data: Record::new(),
            read_only: false,
            listeners: Vec::new(),
            next_listener_id: 0,
            suppress_listeners: false,
            txn_depth: 0,
            txn_name: None,
            pending_events: Vec::new(),
            collector: ChangeCollector::default(),
        }
    }

    /// A copy of this model's key accessors and data, without listeners or
    /// transaction state.
    pub fn clone_data_only(&self) -> Self {
        let mut copy = Self::with_keys(self.node_key.clone(), self.link_key.clone());
        copy.node_data = self.node_data.clone();
        copy.link_data = self.link_data.clone();
        copy.model_data = self.model_data.clone();
        copy.read_only = self.read_only;
        copy
    }

    pub fn node_data(&self) -> &[Record] {
        &self.node_data
    }

    pub fn link_data(&self) -> &[Record] {
        &self.link_data
    }

    pub fn model_data(&self) -> &Record {
        &self.model_data
    }

    pub fn node_key(&self) -> &KeyAccessor {
        &self.node_key
    }

    pub fn link_key(&self) -> &KeyAccessor {
        &self.link_key
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn find_node(&self, key: &Key) -> Option<&Record> {
        self.find_index(Category::Node, key)
            .map(|at| &self.node_data[at])
    }

    pub fn find_link(&self, key: &Key) -> Option<&Record> {
        self.find_index(Category::Link, key)
            .map(|at| &self.link_data[at])
    }

    pub fn add_changed_listener(
        &mut self,
        listener: impl FnMut(&ChangedEvent) + Send + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_changed_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Run `f` as one logical transaction.
    ///
    /// Nested commits fold into the outermost one; only the outermost commit
    /// delivers events. Mutations survive an `Err` from `f` (there is no
    /// rollback), but their notifications are discarded.
    pub fn commit<T>(
        &mut self,
        name: Option<&str>,
        f: impl FnOnce(&mut Self) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        if self.read_only {
            return Err(ModelError::ReadOnly);
        }
        if self.txn_depth == 0 {
            self.txn_name = name.map(ToOwned::to_owned);
            self.pending_events.clear();
            self.collector = ChangeCollector::default();
        }
        self.txn_depth += 1;
        let result = f(self);
        self.txn_depth -= 1;
        if self.txn_depth > 0 {
            return result;
        }

        let name = self.txn_name.take();
        let collector = std::mem::take(&mut self.collector);
        let mut events = std::mem::take(&mut self.pending_events);

        let value = result?;
        if !self.suppress_listeners {
            if let Some(data) = collector.finish() {
                events.push(ChangedEvent::TransactionFinished { name, data });
            }
            self.deliver(events);
        }
        Ok(value)
    }

    /// Run `f` with change listeners suppressed.
    ///
    /// Suppressed events are dropped, not queued, and changes made while
    /// suppressed stay out of any enclosing transaction's batch. Both the
    /// flag and the enclosing batch are restored even when `f` fails.
    pub fn with_listeners_suppressed<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        let was_suppressed = self.suppress_listeners;
        self.suppress_listeners = true;
        let collected_before = std::mem::take(&mut self.collector);
        let result = f(self);
        self.collector = collected_before;
        self.suppress_listeners = was_suppressed;
        result
    }

    pub fn insert_node(&mut self, record: Record) -> Result<Key, ModelError> {
        self.commit(None, |m| m.insert_record(Category::Node, record))
    }

    pub fn insert_link(&mut self, record: Record) -> Result<Key, ModelError> {
        self.commit(None, |m| m.insert_record(Category::Link, record))
    }

    pub fn remove_node(&mut self, key: &Key) -> Result<Record, ModelError> {
        self.commit(None, |m| m.remove_record(Category::Node, key))
    }

    pub fn remove_link(&mut self, key: &Key) -> Result<Record, ModelError> {
        self.commit(None, |m| m.remove_record(Category::Link, key))
    }

    /// Overwrite the differing fields of the node keyed `key` so it equals
    /// `next`. The stored record keeps its identity; equal fields are not
    /// rewritten.
    pub fn update_node(&mut self, key: &Key, next: &Record) -> Result<FieldNames, ModelError> {
        self.commit(None, |m| m.update_record(Category::Node, key, next))
    }

    pub fn update_link(&mut self, key: &Key, next: &Record) -> Result<FieldNames, ModelError> {
        self.commit(None, |m| m.update_record(Category::Link, key, next))
    }

    /// Copy every property of `data` onto the shared model data, keeping
    /// properties `data` does not mention.
    pub fn assign_model_data(&mut self, data: &Record) -> Result<FieldNames, ModelError> {
        self.commit(None, |m| {
            let fields = m.model_data.assign_all(data);
            if !fields.is_empty() {
                m.collector.record_model_data(m.model_data.clone());
                m.note(ChangedEvent::ModelDataAssigned { fields: fields.to_vec() });
            }
            Ok(fields)
        })
    }

    /// Drop all node/link records and shared model data in one transaction.
    pub fn clear(&mut self) -> Result<(), ModelError> {
        self.commit(Some("clear"), |m| {
            for category in [Category::Node, Category::Link] {
                let accessor = m.key_accessor(category).clone();
                let records = std::mem::take(m.records_mut(category));
                for record in records {
                    if let Some(key) = accessor.key_of(&record) {
                        m.collector.record_removed(category, key.clone());
                        m.note(ChangedEvent::Removed { category, key });
                    }
                }
            }
            if !m.model_data.is_empty() {
                m.model_data = Record::new();
                m.collector.record_model_data(Record::new());
                m.note(ChangedEvent::ModelDataAssigned { fields: Vec::new() });
            }
            Ok(())
        })
    }

    fn key_accessor(&self, category: Category) -> &KeyAccessor {
        match category {
            Category::Node => &self.node_key,
            Category::Link => &self.link_key,
        }
    }

    fn records(&self, category: Category) -> &[Record] {
        match category {
            Category::Node => &self.node_data,
            Category::Link => &self.link_data,
        }
    }

    fn records_mut(&mut self, category: Category) -> &mut Vec<Record> {
        match category {
            Category::Node => &mut self.node_data,
            Category::Link => &mut self.link_data,
        }
    }

    fn find_index(&self, category: Category, key: &Key) -> Option<usize> {
        let accessor = self.key_accessor(category);
        self.records(category)
            .iter()
            .position(|record| accessor.key_of(record).as_ref() == Some(key))
    }

    fn insert_record(&mut self, category: Category, record: Record) -> Result<Key, ModelError> {
        let key = self
            .key_accessor(category)
            .key_of(&record)
            .ok_or(ModelError::MissingKey { category })?;
        if self.find_index(category, &key).is_some() {
            return Err(ModelError::DuplicateKey { category, key });
        }
        self.collector.record_inserted(category, key.clone(), record.clone());
        self.records_mut(category).push(record);
        self.note(ChangedEvent::Inserted { category, key: key.clone() });
        Ok(key)
    }

    fn remove_record(&mut self, category: Category, key: &Key) -> Result<Record, ModelError> {
        let Some(at) = self.find_index(category, key) else {
            return Err(ModelError::KeyNotFound { category, key: key.clone() });
        };
        let record = self.records_mut(category).remove(at);
        self.collector.record_removed(category, key.clone());
        self.note(ChangedEvent::Removed { category, key: key.clone() });
        Ok(record)
    }

    fn update_record(
        &mut self,
        category: Category,
        key: &Key,
        next: &Record,
    ) -> Result<FieldNames, ModelError> {
        let found = self.key_accessor(category).key_of(next);
        if found.as_ref() != Some(key) {
            return Err(ModelError::KeyMismatch {
                category,
                expected: key.clone(),
                found,
            });
        }
        let Some(at) = self.find_index(category, key) else {
            return Err(ModelError::KeyNotFound { category, key: key.clone() });
        };
        let fields = self.records_mut(category)[at].apply_minimal(next);
        if !fields.is_empty() {
            let snapshot = self.records(category)[at].clone();
            self.collector.record_modified(category, key.clone(), snapshot);
            self.note(ChangedEvent::Modified {
                category,
                key: key.clone(),
                fields: fields.to_vec(),
            });
        }
        Ok(fields)
    }

    /// Buffer a per-change event for delivery at commit, unless suppressed.
    fn note(&mut self, event: ChangedEvent) {
        debug_assert!(self.txn_depth > 0, "change outside transaction");
        if self.suppress_listeners {
            return;
        }
        self.pending_events.push(event);
    }

    fn deliver(&mut self, events: Vec<ChangedEvent>) {
        if events.is_empty() || self.listeners.is_empty() {
            return;
        }
        // Listeners leave the model while they run, so one registering or
        // mutating re-entrantly cannot alias the delivery loop.
        let mut listeners = std::mem::take(&mut self.listeners);
        for event in &events {
            for (_, listener) in listeners.iter_mut() {
                listener(event);
            }
        }
        let registered_during_delivery = std::mem::take(&mut self.listeners);
        self.listeners = listeners;
        self.listeners.extend(registered_during_delivery);
    }
}

// Extracted snapshot-merge implementation for node/link collections.
include!("merge_impl.rs");
