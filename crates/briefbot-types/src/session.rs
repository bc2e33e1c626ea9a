//! Multi-step form session state.
//!
//! The chat platform delivers each step submission statelessly; the only
//! memory a session has is the serialized [`AccumulatedState`] the caller
//! threads through between steps as an opaque token. These types model that
//! state plus the flow's explicit state machine (the lifecycle logic lives
//! in `briefbot-core::flow`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field::StepValues;

/// All steps' captured values so far, plus the 1-based index of the next
/// step to render.
///
/// Append-only: a step's values, once recorded, are never mutated by a later
/// step. `next_step` is always `steps.len() + 1`; a token whose index
/// disagrees with its recorded steps is treated as corrupt on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatedState {
    pub steps: Vec<StepValues>,
    pub next_step: u32,
}

impl AccumulatedState {
    /// Fresh state for a form that was just opened: no steps, step 1 next.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            next_step: 1,
        }
    }

    /// Record one completed step and advance the step index.
    pub fn push_step(&mut self, values: StepValues) {
        self.steps.push(values);
        self.next_step += 1;
    }

    /// How many steps have been completed so far.
    pub fn completed_steps(&self) -> usize {
        self.steps.len()
    }
}

impl Default for AccumulatedState {
    fn default() -> Self {
        Self::new()
    }
}

/// The serialized form of an [`AccumulatedState`], carried by the hosting
/// platform between one step's submission and the next step's render.
///
/// Opaque to the transport; only `briefbot-core::accumulator` encodes and
/// decodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateToken(String);

impl StateToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for StateToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for StateToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// One user's in-progress multi-step submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSession {
    pub id: Uuid,
    /// The submitting user's platform identifier.
    pub user_id: String,
    pub state: AccumulatedState,
}

impl FormSession {
    /// Open a fresh session for a user who just invoked the form.
    pub fn open(user_id: impl Into<String>) -> Self {
        Self::resume(user_id, AccumulatedState::new())
    }

    /// Rebuild a session around state recovered from a transport token.
    ///
    /// The platform holds no session memory between events, so the id is
    /// minted per reconstruction; it identifies this delivery's view of the
    /// session, not a stable cross-event handle.
    pub fn resume(user_id: impl Into<String>, state: AccumulatedState) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            state,
        }
    }
}

/// Why a flow ended without a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The transport token could not be decoded; prior steps' data is
    /// unrecoverable and the user must restart.
    CorruptState,
    /// The user dismissed the form.
    UserCancelled,
}

/// Where a submission flow currently stands.
///
/// Step submissions drive `AwaitingStep(n)` forward until the final screen;
/// the final screen loops on validation or store failure and only leaves via
/// `Completed` or an abort. Transition logic lives in
/// `briefbot-core::flow::FlowStateExt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Waiting for the user to submit step `n` (1-based, before the final
    /// step).
    AwaitingStep(u32),
    /// Waiting for the terminal step's submission.
    AwaitingFinalStep,
    Completed,
    Aborted(AbortReason),
}

impl FlowState {
    /// The state a flow enters when the platform opens the first screen.
    pub fn initial() -> Self {
        FlowState::AwaitingStep(1)
    }
}
