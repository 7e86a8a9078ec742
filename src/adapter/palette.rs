// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use std::fmt;

use super::{merge_app_data, AdapterId, AppData};
use crate::graph::{GraphModel, ModelError};
use crate::model::Record;

/// Palette counterpart of [`super::DiagramAdapter`].
///
/// A palette is a source of template records: bound inputs flow in on every
/// update cycle, but the palette never edits its own model, so there is no
/// skip flag and no model-changed listener.
pub struct PaletteAdapter {
    id: AdapterId,
    model: GraphModel,
    data: AppData,
    attached: bool,
}

impl fmt::Debug for PaletteAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteAdapter")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("data", &self.data)
            .field("attached", &self.attached)
            .finish()
    }
}

impl PaletteAdapter {
    pub fn new(init: impl FnOnce() -> GraphModel) -> Self {
        Self {
            id: AdapterId::next(),
            model: init(),
            data: AppData::default(),
            attached: false,
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

    /// Load the bound inputs into the palette model.
    pub fn attach(&mut self) -> Result<(), ModelError> {
        if self.attached {
            return Ok(());
        }
        self.attached = true;
        merge_app_data(&mut self.model, &self.data, true)
    }

    /// Merge the bound inputs; palettes merge on every update cycle.
    pub fn on_changes(&mut self) -> Result<(), ModelError> {
        if !self.attached {
            return Ok(());
        }
        merge_app_data(&mut self.model, &self.data, false)
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }
}
