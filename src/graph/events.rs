// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use crate::model::{IncrementalData, Key};

/// Which keyed collection of a model a change concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Node,
    Link,
}

/// A change notification from a [`super::GraphModel`].
///
/// Per-change events raised inside a transaction are buffered and delivered
/// only after the transaction commits, followed by exactly one
/// [`ChangedEvent::TransactionFinished`] carrying the whole batch. Listeners
/// therefore never observe a partially-applied transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangedEvent {
    Inserted {
        category: Category,
        key: Key,
    },
    Modified {
        category: Category,
        key: Key,
        fields: Vec<String>,
    },
    Removed {
        category: Category,
        key: Key,
    },
    ModelDataAssigned {
        fields: Vec<String>,
    },
    TransactionFinished {
        name: Option<String>,
        data: IncrementalData,
    },
}

impl ChangedEvent {
    pub fn is_transaction_finished(&self) -> bool {
        matches!(self, Self::TransactionFinished { .. })
    }

    /// The committed batch, when this is a transaction event.
    pub fn incremental_data(&self) -> Option<&IncrementalData> {
        match self {
            Self::TransactionFinished { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Handle for removing a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);
