//! Step accumulator: threads partially-collected form data through a
//! sequence of stateless submission events.
//!
//! The hosting platform holds no per-session memory; the serialized
//! [`AccumulatedState`] IS the session, carried between steps in an opaque
//! string slot the platform transports verbatim. Every function here is a
//! pure transformation: same inputs, same token, no hidden counters or
//! wall-clock reads, so redelivered events cannot fork the state.

use briefbot_types::error::AccumulatorError;
use briefbot_types::field::{FieldKey, FieldValue, StepValues};
use briefbot_types::session::{AccumulatedState, StateToken};

use std::collections::BTreeMap;

/// Serialize state into the opaque transport token.
pub fn encode(state: &AccumulatedState) -> StateToken {
    // BTreeMap-backed StepValues serialize in key order, so encoding is
    // deterministic for equal states.
    let json = serde_json::to_string(state)
        .expect("AccumulatedState serialization cannot fail: string keys only");
    StateToken::from(json)
}

/// Decode a transport token back into state.
///
/// A token that does not parse, or whose step index disagrees with its
/// recorded steps, is corrupt. The caller must not substitute an empty
/// state and proceed -- that would discard already-entered data without the
/// user's knowledge -- so this is a hard fault that aborts the flow.
pub fn decode(token: &StateToken) -> Result<AccumulatedState, AccumulatorError> {
    let state: AccumulatedState = serde_json::from_str(token.as_str())
        .map_err(|e| AccumulatorError::CorruptState(e.to_string()))?;

    let expected = state.steps.len() as u32 + 1;
    if state.next_step != expected {
        return Err(AccumulatorError::CorruptState(format!(
            "step index {} does not match {} recorded steps",
            state.next_step,
            state.steps.len()
        )));
    }

    Ok(state)
}

/// Merge a newly submitted step into the running state and hand back the
/// token for the next step.
///
/// An absent or empty prior token means this is the first step. No
/// per-field validation happens here -- intermediate steps must never block
/// the user -- only structural bookkeeping: append exactly one
/// [`StepValues`], advance the step index, re-encode.
pub fn merge(
    prior: Option<&StateToken>,
    step: StepValues,
) -> Result<StateToken, AccumulatorError> {
    let mut state = match prior {
        None => AccumulatedState::new(),
        Some(token) if token.as_str().is_empty() => AccumulatedState::new(),
        Some(token) => decode(token)?,
    };

    state.push_step(step);
    Ok(encode(&state))
}

/// A single lookup view over all completed steps.
///
/// Built by [`flatten`]; never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatView {
    entries: BTreeMap<FieldKey, FieldValue>,
}

impl FlatView {
    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fold all steps' values into one composite-key lookup.
///
/// Block ids are not guaranteed unique across steps. When a key appears in
/// more than one step, the later step's value wins -- an explicit policy,
/// not an accident of merge order.
pub fn flatten(state: &AccumulatedState) -> FlatView {
    let mut entries = BTreeMap::new();
    for step in &state.steps {
        for (key, value) in step.iter() {
            entries.insert(key, value.clone());
        }
    }
    FlatView { entries }
}
