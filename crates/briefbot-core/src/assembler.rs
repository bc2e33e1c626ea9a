//! Submission assembler: turns a flattened session into a validated record.
//!
//! Runs once, on the terminal step. Checks that every required field across
//! all steps made it into the flat view, coerces raw field values into the
//! target record's typed shape, and produces either a complete
//! [`CampaignRecord`] or a [`ValidationFailure`] naming every missing field
//! at once. Pure: persistence and user notification are the caller's
//! responsibility.

use briefbot_types::error::ValidationFailure;
use briefbot_types::field::FieldValue;
use briefbot_types::record::{
    CampaignRecord, FieldShape, FieldSpec, RecordValue, StructuredEntry,
};

use crate::accumulator::FlatView;

/// Assemble the final record from the flattened session against a form
/// revision's field schema.
///
/// Required fields that are absent (or blank text) accumulate into one
/// [`ValidationFailure`] rather than short-circuiting, so the user sees
/// every problem in a single re-prompt. A required field with a configured
/// default takes the default instead of failing. No partial record is ever
/// returned.
pub fn assemble(
    view: &FlatView,
    specs: &[FieldSpec],
) -> Result<CampaignRecord, ValidationFailure> {
    let mut record = CampaignRecord::new();
    let mut missing = Vec::new();

    for spec in specs {
        let found = resolve(view, spec);

        if found.is_none() && spec.required && spec.default.is_none() {
            missing.push(spec.name.clone());
            continue;
        }

        record.insert(spec.name.clone(), coerce(found, spec));
    }

    if missing.is_empty() {
        Ok(record)
    } else {
        Err(ValidationFailure::new(missing))
    }
}

/// Look the spec's source keys up in order; first present wins.
///
/// Blank text counts as absent: a required string field must be non-empty
/// after collection, and an all-whitespace answer is no answer.
fn resolve<'a>(view: &'a FlatView, spec: &FieldSpec) -> Option<&'a FieldValue> {
    spec.sources
        .iter()
        .filter_map(|key| view.get(key))
        .find(|value| match value {
            FieldValue::Text(s) => !s.trim().is_empty(),
            _ => true,
        })
}

/// Coerce a raw field value into the spec's target shape, applying the
/// configured default (then the shape's zero value) when absent.
fn coerce(found: Option<&FieldValue>, spec: &FieldSpec) -> RecordValue {
    match found {
        Some(value) => coerce_present(value, spec.shape),
        None => spec
            .default
            .clone()
            .unwrap_or_else(|| empty_value(spec.shape)),
    }
}

fn coerce_present(value: &FieldValue, shape: FieldShape) -> RecordValue {
    match shape {
        FieldShape::Text | FieldShape::SingleValue => RecordValue::Text(match value {
            FieldValue::Text(s) | FieldValue::SingleSelect(s) | FieldValue::Date(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::MultiSelect(items) => items.join(", "),
        }),
        FieldShape::StringArray => RecordValue::StringArray(match value {
            FieldValue::MultiSelect(items) => items.clone(),
            FieldValue::Text(s) => split_delimited(s),
            FieldValue::SingleSelect(s) | FieldValue::Date(s) => vec![s.clone()],
            FieldValue::Number(n) => vec![n.to_string()],
        }),
        FieldShape::StructuredArray => RecordValue::StructuredArray(match value.as_str() {
            Some(text) => parse_structured(text),
            None => Vec::new(),
        }),
        FieldShape::Integer => RecordValue::Integer(match value {
            FieldValue::Number(n) => *n,
            // Malformed numeric input falls back to zero instead of failing
            // the whole submission (deliberate leniency policy).
            FieldValue::Text(s) | FieldValue::SingleSelect(s) | FieldValue::Date(s) => {
                s.trim().parse::<i64>().unwrap_or(0)
            }
            FieldValue::MultiSelect(_) => 0,
        }),
    }
}

/// The shape's value for an absent optional field with no configured
/// default. Array columns that disallow null get an empty sequence, never a
/// missing key.
fn empty_value(shape: FieldShape) -> RecordValue {
    match shape {
        FieldShape::Text | FieldShape::SingleValue => RecordValue::Text(String::new()),
        FieldShape::StringArray => RecordValue::StringArray(Vec::new()),
        FieldShape::StructuredArray => RecordValue::StructuredArray(Vec::new()),
        FieldShape::Integer => RecordValue::Integer(0),
    }
}

/// Split a comma-delimited text value: trim each entry, drop empties.
fn split_delimited(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse "one entry per line, key: value" free text.
///
/// Lines with no colon are discarded. Each remaining line splits on the
/// FIRST colon only, so values may themselves contain colons
/// ("Launch: 2025-06-01: kickoff"). Entries with an empty side after
/// trimming are discarded.
fn parse_structured(text: &str) -> Vec<StructuredEntry> {
    text.lines()
        .filter_map(|line| {
            let (left, right) = line.trim().split_once(':')?;
            let key = left.trim();
            let value = right.trim();
            if key.is_empty() || value.is_empty() {
                return None;
            }
            Some(StructuredEntry::new(key, value))
        })
        .collect()
}
