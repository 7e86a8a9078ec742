// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::mpsc::{self, Receiver};

use super::{merge_app_data, AdapterId, AppData};
use crate::graph::{ChangedEvent, GraphModel, ListenerId, ModelError};
use crate::model::{IncrementalData, Record};

pub type ModelChangeSubscriber = Box<dyn FnMut(&IncrementalData) + Send>;

/// Binds an app-owned [`AppData`] snapshot to a [`GraphModel`].
///
/// The lifecycle mirrors a UI component: construct with an init function,
/// [`attach`](Self::attach) once, update bound inputs and call
/// [`on_changes`](Self::on_changes) on every app update cycle, and make
/// model-side edits through [`edit`](Self::edit). Each committed edit is
/// forwarded to model-change subscribers as one [`IncrementalData`] batch;
/// the app is expected to fold it into its snapshot (see [`crate::sync`])
/// and set [`set_skips_model_update`](Self::set_skips_model_update) for the
/// update cycle that carries the folded data back.
pub struct DiagramAdapter {
    id: AdapterId,
    model: GraphModel,
    data: AppData,
    skips_model_update: bool,
    was_cleared: bool,
    attached: bool,
    listener: Option<ListenerId>,
    changes_rx: Option<Receiver<IncrementalData>>,
    subscribers: Vec<ModelChangeSubscriber>,
}

impl fmt::Debug for DiagramAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramAdapter")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("data", &self.data)
            .field("skips_model_update", &self.skips_model_update)
            .field("was_cleared", &self.was_cleared)
            .field("attached", &self.attached)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl DiagramAdapter {
    /// `init` builds the model (key accessors, read-only flag and so on) but
    /// must not load data; data arrives from the bound inputs on attach.
    pub fn new(init: impl FnOnce() -> GraphModel) -> Self {
        Self {
            id: AdapterId::next(),
            model: init(),
            data: AppData::default(),
            skips_model_update: false,
            was_cleared: false,
            attached: false,
            listener: None,
            changes_rx: None,
            subscribers: Vec::new(),
        }
    }

    pub fn id(&self) -> AdapterId {
        self.id
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn app_data(&self) -> &AppData {
        &self.data
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_node_data(&mut self, node_data: Vec<Record>) {
        self.data.node_data = node_data;
    }

    pub fn set_link_data(&mut self, link_data: Option<Vec<Record>>) {
        self.data.link_data = link_data;
    }

    pub fn set_model_data(&mut self, model_data: Option<Record>) {
        self.data.model_data = model_data;
    }

    /// Set while the current update cycle carries data that came *from* the
    /// model, so `on_changes` does not merge it back in.
    pub fn set_skips_model_update(&mut self, skips: bool) {
        self.skips_model_update = skips;
    }

    pub fn subscribe_model_change(
        &mut self,
        subscriber: impl FnMut(&IncrementalData) + Send + 'static,
    ) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Arm the model-changed listener and load the bound inputs.
    ///
    /// The initial load is suppressed, so attaching never emits a
    /// model-change batch.
    pub fn attach(&mut self) -> Result<(), ModelError> {
        if self.attached {
            return Ok(());
        }
        let (tx, rx) = mpsc::channel();
        let listener = self.model.add_changed_listener(move |event| {
            if let ChangedEvent::TransactionFinished { data, .. } = event {
                let _ = tx.send(data.clone());
            }
        });
        self.listener = Some(listener);
        self.changes_rx = Some(rx);
        self.attached = true;
        merge_app_data(&mut self.model, &self.data, true)
    }

    /// Merge the bound inputs into the model.
    ///
    /// Does nothing before attach or while `skips_model_update` is set. The
    /// first call after [`clear`](Self::clear) re-initializes instead of
    /// merging incrementally.
    pub fn on_changes(&mut self) -> Result<(), ModelError> {
        if !self.attached || self.skips_model_update {
            return Ok(());
        }
        let is_init = std::mem::take(&mut self.was_cleared);
        merge_app_data(&mut self.model, &self.data, is_init)
    }

    /// Run a model-side edit as one transaction and forward the resulting
    /// batch to model-change subscribers.
    pub fn edit<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut GraphModel) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        let value = self.model.commit(Some(name), f)?;
        self.pump_model_changes();
        Ok(value)
    }

    /// Forward any batches the model listener has queued to subscribers.
    pub fn pump_model_changes(&mut self) {
        let Some(rx) = &self.changes_rx else {
            return;
        };
        for batch in rx.try_iter() {
            for subscriber in &mut self.subscribers {
                subscriber(&batch);
            }
        }
    }

    /// Empty the model without notifying; the next `on_changes` is treated
    /// as initialization.
    pub fn clear(&mut self) -> Result<(), ModelError> {
        self.model.with_listeners_suppressed(|m| m.clear())?;
        self.was_cleared = true;
        Ok(())
    }

    /// Remove the model-changed listener.
    pub fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.model.remove_changed_listener(listener);
        }
        self.changes_rx = None;
        self.attached = false;
    }
}
