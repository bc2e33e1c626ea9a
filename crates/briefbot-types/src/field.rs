//! Form field identity and value types.
//!
//! A modal screen delivers its inputs as a nested map keyed by block id and
//! action id, mirroring the chat platform's `view.state.values` payload.
//! `StepValues` keeps that shape so tokens stay recognizable next to the raw
//! platform payload, while `FieldKey` gives the rest of the library a single
//! composite identity to look fields up by.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;

/// Composite identity of one form input: the screen-local block id plus the
/// input element's action id.
///
/// Block ids are unique within one step's screen but NOT guaranteed unique
/// across the whole multi-step form; the flatten collision policy in
/// `briefbot-core` exists because of that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldKey {
    pub block_id: String,
    pub action_id: String,
}

impl FieldKey {
    pub fn new(block_id: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            action_id: action_id.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.block_id, self.action_id)
    }
}

/// A tagged value produced by one form input.
///
/// Adjacently tagged on the wire so a serialized token is self-describing:
/// `{"kind": "multi_select", "value": ["Email", "Social"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text from a plain-text input.
    Text(String),
    /// The value of the chosen option of a single-select element.
    SingleSelect(String),
    /// Chosen option values of a multi-select element, in submission order.
    MultiSelect(Vec<String>),
    /// A numeric input.
    Number(i64),
    /// An ISO-8601 calendar date from a date picker (e.g. "2025-06-01").
    Date(String),
}

impl FieldValue {
    /// The value as a string, when the variant carries one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::SingleSelect(s) | FieldValue::Date(s) => Some(s),
            FieldValue::MultiSelect(_) | FieldValue::Number(_) => None,
        }
    }
}

/// Everything entered on one modal screen: `block_id -> action_id -> value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepValues {
    blocks: BTreeMap<String, BTreeMap<String, FieldValue>>,
}

impl StepValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one input's value. A second insert under the same key replaces
    /// the first, matching how the platform reports a re-edited input.
    pub fn insert(
        &mut self,
        block_id: impl Into<String>,
        action_id: impl Into<String>,
        value: FieldValue,
    ) {
        self.blocks
            .entry(block_id.into())
            .or_default()
            .insert(action_id.into(), value);
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.blocks.get(&key.block_id)?.get(&key.action_id)
    }

    /// Iterate all fields on this screen in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.blocks.iter().flat_map(|(block_id, actions)| {
            actions
                .iter()
                .map(move |(action_id, value)| (FieldKey::new(block_id, action_id), value))
        })
    }

    /// Number of individual fields captured on this screen.
    pub fn len(&self) -> usize {
        self.blocks.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
