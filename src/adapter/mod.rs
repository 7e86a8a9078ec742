// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! Component-style lifecycle glue over [`crate::graph::GraphModel`].
//!
//! Mirrors the classic diagram/palette/overview component trio: bound inputs
//! flow into the model on `on_changes`, model edits flow back out as
//! [`crate::model::IncrementalData`] batches, and a skip flag breaks the echo
//! loop when an update cycle originated in the model itself.

pub mod diagram;
pub mod overview;
pub mod palette;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::graph::{GraphModel, ModelError};
use crate::model::Record;

pub use diagram::DiagramAdapter;
pub use overview::OverviewAdapter;
pub use palette::PaletteAdapter;

/// The bound inputs of a diagram or palette adapter: node data, optional link
/// data, optional shared model data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppData {
    pub node_data: Vec<Record>,
    pub link_data: Option<Vec<Record>>,
    pub model_data: Option<Record>,
}

/// Identity of an adapter instance, used by overviews to detect re-targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterId(u64);

static NEXT_ADAPTER_ID: AtomicU64 = AtomicU64::new(0);

impl AdapterId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ADAPTER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Merge the bound inputs into `model` as one suppressed transaction.
///
/// Model data is assigned first, since node/link bindings may depend on it.
/// With `is_init` the model is cleared up front, so the merge amounts to a
/// fresh initialization; this is how the first update after `clear` and the
/// attach-time load are handled.
pub(crate) fn merge_app_data(
    model: &mut GraphModel,
    data: &AppData,
    is_init: bool,
) -> Result<(), ModelError> {
    model.with_listeners_suppressed(|model| {
        let name = if is_init { None } else { Some("update data") };
        model.commit(name, |m| {
            if is_init {
                m.clear()?;
            }
            if let Some(model_data) = &data.model_data {
                m.assign_model_data(model_data)?;
            }
            m.merge_node_data(&data.node_data)?;
            if let Some(link_data) = &data.link_data {
                m.merge_link_data(link_data)?;
            }
            Ok(())
        })
    })
}
