//! Campaign record, field schema, and coerced value types.
//!
//! A form revision's schema is supplied externally as a sequence of
//! [`FieldSpec`]s; the assembler in `briefbot-core` consumes them to turn a
//! flattened session into a [`CampaignRecord`] ready for the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeMap;

use crate::field::FieldKey;

/// The target shape an output field is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// Free text, passed through.
    Text,
    /// Ordered list of strings, from a multi-select or comma-delimited text.
    StringArray,
    /// One structured entry per `key: value` line of a free-text field
    /// (KPI targets, milestones).
    StructuredArray,
    /// Base-10 integer parsed from text, zero on parse failure.
    Integer,
    /// The chosen option's value, passed through.
    SingleValue,
}

/// One `key: value` line of a structured free-text field.
///
/// The right-hand side may itself contain colons; only the first colon on a
/// line separates the two parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredEntry {
    pub key: String,
    pub value: String,
}

impl StructuredEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A normalized output value in a [`CampaignRecord`].
///
/// Tagged the same way as `FieldValue` so the persisted JSON is
/// self-describing: an empty structured array and an empty string array
/// must read back as the variant they were written as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RecordValue {
    Text(String),
    StringArray(Vec<String>),
    StructuredArray(Vec<StructuredEntry>),
    Integer(i64),
}

/// How one output field of the record is sourced and shaped.
///
/// Supplied by the external schema provider per form revision; the core
/// consumes but never defines these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Output-field name in the persisted record.
    pub name: String,
    /// Composite source keys, tried in order; the first one present in the
    /// flattened session wins.
    pub sources: Vec<FieldKey>,
    pub shape: FieldShape,
    pub required: bool,
    /// Substituted when the field is absent: for optional fields always,
    /// for required fields instead of failing validation.
    pub default: Option<RecordValue>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, source: FieldKey, shape: FieldShape) -> Self {
        Self {
            name: name.into(),
            sources: vec![source],
            shape,
            required: false,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: RecordValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_fallback_source(mut self, source: FieldKey) -> Self {
        self.sources.push(source);
        self
    }
}

/// A flat mapping from output-field name to normalized value -- the terminal
/// output of a completed flow, handed to the record store as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignRecord {
    fields: BTreeMap<String, RecordValue>,
}

impl CampaignRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: RecordValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&RecordValue> {
        self.fields.get(name)
    }

    /// The field's text content, when it holds text.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(RecordValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RecordValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A finished record on its way into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    pub user_id: String,
    /// Which form revision's schema produced this record.
    pub form_revision: String,
    pub record: CampaignRecord,
}

/// A persisted campaign as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: String,
    pub form_revision: String,
    pub record: CampaignRecord,
    pub created_at: DateTime<Utc>,
}
