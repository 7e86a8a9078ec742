// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! Core data model: keys, records, and incremental change batches.
//!
//! Records are plain keyed data; a [`Key`] identifies one record within a
//! category (nodes or links), and an [`IncrementalData`] describes one
//! transaction's worth of change to a model.

pub mod incremental;
pub mod key;
pub mod record;

pub use incremental::IncrementalData;
pub(crate) use incremental::ChangeCollector;
pub use key::{Key, KeyAccessor};
pub use record::{PropValue, Record};
