// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Per-record list of touched field names; stays inline for typical records.
pub type FieldNames = SmallVec<[String; 4]>;

/// A record field value.
///
/// Equality is structural: lists and nested objects compare element by
/// element, and [`PropValue::Code`] — the source text of a function-valued
/// property — compares by text, never by provenance. Two records built
/// independently from the same data are equal. Floats compare by bit
/// pattern, so a NaN-carrying value equals itself and is never perpetually
/// reported as changed.
#[derive(Debug, Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Code(String),
    List(Vec<PropValue>),
    Object(BTreeMap<String, PropValue>),
}

impl PropValue {
    pub fn code(source: impl Into<String>) -> Self {
        Self::Code(source.into())
    }

    pub fn object<N, V, I>(fields: I) -> Self
    where
        N: Into<String>,
        V: Into<PropValue>,
        I: IntoIterator<Item = (N, V)>,
    {
        Self::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(value) => serde_json::Value::Bool(*value),
            Self::Int(value) => serde_json::Value::from(*value),
            Self::Float(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Str(value) => serde_json::Value::String(value.clone()),
            // Wire envelope keeping code values distinct from plain strings.
            Self::Code(source) => {
                serde_json::json!({ CODE_FIELD: source })
            }
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => Self::Int(value),
                None => Self::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => Self::Str(value),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(mut fields) => {
                let is_code_envelope = fields.len() == 1
                    && matches!(fields.get(CODE_FIELD), Some(serde_json::Value::String(_)));
                if is_code_envelope {
                    if let Some(serde_json::Value::String(source)) = fields.remove(CODE_FIELD) {
                        return Self::Code(source);
                    }
                }
                Self::Object(
                    fields
                        .into_iter()
                        .map(|(name, value)| (name, Self::from_json(value)))
                        .collect(),
                )
            }
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Code(a), Self::Code(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

const CODE_FIELD: &str = "$code";

impl Serialize for PropValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(value))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<V: Into<PropValue>> From<Vec<V>> for PropValue {
    fn from(items: Vec<V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// One node/link record: an ordered map of field name to value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, PropValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment, mostly for literals in tests/fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&PropValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<PropValue> {
        self.fields.remove(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy every field of `other` onto `self`, keeping fields `other` does
    /// not mention. Returns the names of fields that actually changed.
    pub fn assign_all(&mut self, other: &Record) -> FieldNames {
        let mut changed = FieldNames::new();
        for (name, value) in &other.fields {
            if self.fields.get(name) != Some(value) {
                self.fields.insert(name.clone(), value.clone());
                changed.push(name.clone());
            }
        }
        changed
    }

    /// Field names on which `self` and `next` disagree, including fields only
    /// one side has.
    pub fn changed_fields(&self, next: &Record) -> FieldNames {
        let mut changed = FieldNames::new();
        for (name, value) in &next.fields {
            if self.fields.get(name) != Some(value) {
                changed.push(name.clone());
            }
        }
        for name in self.fields.keys() {
            if !next.fields.contains_key(name) {
                changed.push(name.clone());
            }
        }
        changed
    }

    /// Make `self` equal to `next` by touching only the differing fields.
    /// Returns the names of the fields that were overwritten or dropped.
    pub fn apply_minimal(&mut self, next: &Record) -> FieldNames {
        let mut touched = FieldNames::new();
        for (name, value) in &next.fields {
            if self.fields.get(name) != Some(value) {
                self.fields.insert(name.clone(), value.clone());
                touched.push(name.clone());
            }
        }
        let stale = self
            .fields
            .keys()
            .filter(|name| !next.fields.contains_key(*name))
            .cloned()
            .collect::<Vec<_>>();
        for name in stale {
            self.fields.remove(&name);
            touched.push(name);
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::{PropValue, Record};

    #[test]
    fn equality_is_structural_for_nested_objects() {
        let a = Record::new()
            .with("key", 1)
            .with("geo", PropValue::object([("x", 10), ("y", 20)]));
        let b = Record::new()
            .with("key", 1)
            .with("geo", PropValue::object([("x", 10), ("y", 20)]));

        assert_eq!(a, b);
        assert!(a.changed_fields(&b).is_empty());
    }

    #[test]
    fn code_values_compare_by_source_text() {
        let a = PropValue::code("(n) => n.text.toUpperCase()");
        let b = PropValue::code("(n) => n.text.toUpperCase()");
        let c = PropValue::code("(n) => n.text");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, PropValue::from("(n) => n.text.toUpperCase()"));
    }

    #[test]
    fn code_values_round_trip_through_serde_without_becoming_strings() {
        let record = Record::new()
            .with("key", "n1")
            .with("format", PropValue::code("(n) => n.text"));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"$code\""));

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn apply_minimal_touches_only_differing_fields_and_drops_stale_ones() {
        let mut target = Record::new()
            .with("key", 1)
            .with("text", "alpha")
            .with("color", "red");
        let next = Record::new().with("key", 1).with("text", "beta");

        let mut touched = target.apply_minimal(&next).into_vec();
        touched.sort();
        assert_eq!(touched, vec!["color".to_owned(), "text".to_owned()]);
        assert_eq!(target, next);
    }

    #[test]
    fn assign_all_keeps_fields_the_source_does_not_mention() {
        let mut target = Record::new().with("theme", "dark").with("zoom", 2);
        let incoming = Record::new().with("theme", "light");

        let changed = target.assign_all(&incoming).into_vec();
        assert_eq!(changed, vec!["theme".to_owned()]);
        assert_eq!(target.get("zoom"), Some(&PropValue::Int(2)));
        assert_eq!(target.get("theme"), Some(&PropValue::Str("light".to_owned())));
    }

    #[test]
    fn nan_floats_compare_equal_to_themselves() {
        assert_eq!(PropValue::Float(f64::NAN), PropValue::Float(f64::NAN));

        let record = Record::new().with("key", 1).with("weight", f64::NAN);
        assert_eq!(record, record.clone());
        assert!(record.changed_fields(&record.clone()).is_empty());
    }

    #[test]
    fn float_and_int_values_stay_distinct() {
        assert_ne!(PropValue::Int(1), PropValue::Float(1.0));

        let record: Record = serde_json::from_str(r#"{"key":1,"scale":1.5}"#).unwrap();
        assert_eq!(record.get("key"), Some(&PropValue::Int(1)));
        assert_eq!(record.get("scale"), Some(&PropValue::Float(1.5)));
    }
}
