//! Flow state machine lifecycle logic.
//!
//! The `FlowState` enum lives in `briefbot-types`; this module provides an
//! extension trait with the transition functions. The platform's
//! handler-per-callback style maps onto these: each handler applies exactly
//! one transition to the state it reconstructed from the event.

use briefbot_types::session::{AbortReason, FlowState};

/// Extension trait for [`FlowState`] transitions.
///
/// Transitions are total: applying one that does not make sense for the
/// current state (a submit after completion, a cancel after an abort)
/// leaves the state unchanged, so redelivered events cannot resurrect a
/// terminal flow.
pub trait FlowStateExt {
    /// A non-final step was submitted and its merge succeeded.
    ///
    /// `AwaitingStep(n)` moves to `AwaitingStep(n + 1)`, or to
    /// `AwaitingFinalStep` when step `n + 1` is the last of `total_steps`.
    fn step_submitted(self, total_steps: u32) -> FlowState;

    /// The merge failed with a corrupt token.
    fn merge_failed(self) -> FlowState;

    /// The terminal step assembled and persisted successfully.
    fn submission_saved(self) -> FlowState;

    /// Assembly returned a validation failure, or the record store failed.
    /// The user corrects and resubmits the same screen; the flow never
    /// advances past it.
    fn final_step_retried(self) -> FlowState;

    /// The user dismissed the form.
    fn cancelled(self) -> FlowState;

    fn is_terminal(&self) -> bool;
}

impl FlowStateExt for FlowState {
    fn step_submitted(self, total_steps: u32) -> FlowState {
        match self {
            FlowState::AwaitingStep(n) if n + 1 >= total_steps => FlowState::AwaitingFinalStep,
            FlowState::AwaitingStep(n) => FlowState::AwaitingStep(n + 1),
            other => other,
        }
    }

    fn merge_failed(self) -> FlowState {
        match self {
            FlowState::AwaitingStep(_) | FlowState::AwaitingFinalStep => {
                FlowState::Aborted(AbortReason::CorruptState)
            }
            other => other,
        }
    }

    fn submission_saved(self) -> FlowState {
        match self {
            FlowState::AwaitingFinalStep => FlowState::Completed,
            other => other,
        }
    }

    fn final_step_retried(self) -> FlowState {
        match self {
            FlowState::AwaitingFinalStep => FlowState::AwaitingFinalStep,
            other => other,
        }
    }

    fn cancelled(self) -> FlowState {
        match self {
            FlowState::AwaitingStep(_) | FlowState::AwaitingFinalStep => {
                FlowState::Aborted(AbortReason::UserCancelled)
            }
            other => other,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Completed | FlowState::Aborted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL_STEPS: u32 = 3;

    #[test]
    fn test_steps_advance_to_final() {
        let state = FlowState::initial();
        let state = state.step_submitted(TOTAL_STEPS);
        assert_eq!(state, FlowState::AwaitingStep(2));

        let state = state.step_submitted(TOTAL_STEPS);
        assert_eq!(state, FlowState::AwaitingFinalStep);
    }

    #[test]
    fn test_two_step_form_goes_straight_to_final() {
        let state = FlowState::initial().step_submitted(2);
        assert_eq!(state, FlowState::AwaitingFinalStep);
    }

    #[test]
    fn test_merge_failure_aborts_with_corrupt_state() {
        let state = FlowState::AwaitingStep(2).merge_failed();
        assert_eq!(state, FlowState::Aborted(AbortReason::CorruptState));
        assert!(state.is_terminal());
    }

    #[test]
    fn test_save_completes_only_from_final_step() {
        assert_eq!(
            FlowState::AwaitingFinalStep.submission_saved(),
            FlowState::Completed
        );
        assert_eq!(
            FlowState::AwaitingStep(1).submission_saved(),
            FlowState::AwaitingStep(1)
        );
    }

    #[test]
    fn test_validation_or_store_failure_stays_on_final_step() {
        let state = FlowState::AwaitingFinalStep.final_step_retried();
        assert_eq!(state, FlowState::AwaitingFinalStep);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_cancel_aborts_from_any_live_state() {
        assert_eq!(
            FlowState::AwaitingStep(1).cancelled(),
            FlowState::Aborted(AbortReason::UserCancelled)
        );
        assert_eq!(
            FlowState::AwaitingFinalStep.cancelled(),
            FlowState::Aborted(AbortReason::UserCancelled)
        );
    }

    #[test]
    fn test_terminal_states_ignore_further_events() {
        let completed = FlowState::Completed;
        assert_eq!(completed.clone().step_submitted(TOTAL_STEPS), FlowState::Completed);
        assert_eq!(completed.clone().cancelled(), FlowState::Completed);

        let aborted = FlowState::Aborted(AbortReason::CorruptState);
        assert_eq!(
            aborted.clone().submission_saved(),
            FlowState::Aborted(AbortReason::CorruptState)
        );
        assert_eq!(
            aborted.merge_failed(),
            FlowState::Aborted(AbortReason::CorruptState)
        );
    }
}
