// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use std::fmt;

use super::{AdapterId, AppData, DiagramAdapter};
use crate::model::{IncrementalData, KeyAccessor, Record};
use crate::sync::{sync_link_data, sync_model_data, sync_node_data, SyncError};

/// A passive, read-only mirror of one observed diagram adapter.
///
/// Re-targeting happens only when the observed adapter's identity actually
/// changes; repeated updates naming the same adapter are ignored. While
/// observing, the mirror is kept current by folding the observed adapter's
/// model-change batches through the [`crate::sync`] functions.
pub struct OverviewAdapter {
    observed: Option<AdapterId>,
    node_key: KeyAccessor,
    link_key: KeyAccessor,
    mirror: AppData,
}

impl fmt::Debug for OverviewAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverviewAdapter")
            .field("observed", &self.observed)
            .field("mirror", &self.mirror)
            .finish()
    }
}

impl Default for OverviewAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl OverviewAdapter {
    pub fn new() -> Self {
        Self {
            observed: None,
            node_key: KeyAccessor::default(),
            link_key: KeyAccessor::default(),
            mirror: AppData::default(),
        }
    }

    pub fn observed(&self) -> Option<AdapterId> {
        self.observed
    }

    pub fn mirror(&self) -> &AppData {
        &self.mirror
    }

    /// Update the observed adapter. Returns whether a re-target happened;
    /// passing the currently-observed adapter again changes nothing.
    pub fn on_changes(&mut self, observed: Option<&DiagramAdapter>) -> bool {
        match observed {
            Some(adapter) => {
                if self.observed == Some(adapter.id()) {
                    return false;
                }
                self.observed = Some(adapter.id());
                self.node_key = adapter.model().node_key().clone();
                self.link_key = adapter.model().link_key().clone();
                self.mirror = AppData {
                    node_data: adapter.model().node_data().to_vec(),
                    link_data: Some(adapter.model().link_data().to_vec()),
                    model_data: Some(adapter.model().model_data().clone()),
                };
                true
            }
            None => {
                if self.observed.is_none() {
                    return false;
                }
                self.observed = None;
                self.mirror = AppData::default();
                true
            }
        }
    }

    /// Fold a model-change batch from adapter `source` into the mirror.
    /// Batches from adapters other than the observed one are ignored.
    pub fn apply_model_changes(
        &mut self,
        source: AdapterId,
        changes: &IncrementalData,
    ) -> Result<bool, SyncError> {
        if self.observed != Some(source) {
            return Ok(false);
        }
        let node_data = std::mem::take(&mut self.mirror.node_data);
        self.mirror.node_data = sync_node_data(changes, node_data, &self.node_key)?;
        if let Some(link_data) = self.mirror.link_data.take() {
            self.mirror.link_data = Some(sync_link_data(changes, link_data, &self.link_key)?);
        }
        let model_data = self.mirror.model_data.take().unwrap_or_else(Record::new);
        self.mirror.model_data = Some(sync_model_data(changes, model_data));
        Ok(true)
    }
}
