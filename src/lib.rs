// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! Graphbind — minimal-diff data binding for keyed graph models.
//!
//! App-owned snapshots (nodes/links/model data) are reconciled against a live,
//! event-emitting [`graph::GraphModel`] in both directions without echo loops.

pub mod adapter;
pub mod diff;
pub mod graph;
pub mod model;
pub mod sync;
