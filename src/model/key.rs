// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::record::{PropValue, Record};

/// Identity of a record within a keyed collection.
///
/// Keys are either 64-bit integers or strings, mirroring the two shapes apps
/// actually use for node/link identity. Serde round-trips a key as a bare JSON
/// number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// How a key is obtained from a record.
///
/// Either a named property (the common case, default `"key"`) or a
/// caller-supplied accessor for apps whose identity is computed.
#[derive(Clone)]
pub enum KeyAccessor {
    Property(String),
    Computed(Arc<dyn Fn(&Record) -> Option<Key> + Send + Sync>),
}

impl KeyAccessor {
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }

    pub fn computed(f: impl Fn(&Record) -> Option<Key> + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// Extract the key of `record`, if it has one.
    ///
    /// For a property accessor, only integer and string field values count as
    /// keys; anything else (or an absent field) yields `None`.
    pub fn key_of(&self, record: &Record) -> Option<Key> {
        match self {
            Self::Property(name) => match record.get(name) {
                Some(PropValue::Int(value)) => Some(Key::Int(*value)),
                Some(PropValue::Str(value)) => Some(Key::Str(value.clone())),
                _ => None,
            },
            Self::Computed(f) => f(record),
        }
    }
}

impl Default for KeyAccessor {
    fn default() -> Self {
        Self::Property("key".to_owned())
    }
}

impl fmt::Debug for KeyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => f.debug_tuple("Property").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
