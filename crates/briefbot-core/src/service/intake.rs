//! Intake service: orchestrates one user's submission flow.
//!
//! Wraps the pure accumulator/assembler core with the two collaborator
//! ports (record store, notification channel) and the flow state machine.
//! Each handler method corresponds to one platform callback: a step
//! submission, the terminal submission, or a cancel. The service holds no
//! per-session state; everything it knows about a session arrives in the
//! transport token.

use briefbot_types::error::{AccumulatorError, ValidationFailure};
use briefbot_types::field::StepValues;
use briefbot_types::record::{FieldSpec, NewCampaign};
use briefbot_types::session::{AbortReason, FlowState, FormSession, StateToken};
use uuid::Uuid;

use crate::accumulator;
use crate::assembler;
use crate::flow::FlowStateExt;
use crate::repository::campaign::CampaignRepository;

use super::notifier::Notifier;

/// What one handler invocation produced.
///
/// Every failure mode of the flow is a modeled outcome, not an error:
/// validation and store failures re-prompt, corruption aborts. Only the
/// `Saved` outcome discards the accumulated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// A non-final step merged. `token` travels to the next screen;
    /// `session` is the reconstructed view the renderer may prefill from.
    Advanced {
        session: FormSession,
        token: StateToken,
        flow: FlowState,
    },
    /// The terminal step assembled and the record was persisted.
    Saved { campaign_id: Uuid },
    /// Required fields were missing; the same screen is re-prompted.
    Rejected(ValidationFailure),
    /// The record was valid but the store failed; distinct from validation,
    /// surfaced as a transient failure. Not retried here.
    StoreFailed { message: String },
    /// The flow ended without a record.
    Aborted(AbortReason),
}

/// Stateless orchestrator for the multi-step intake flow.
///
/// Generic over the repository and notifier ports so it works with any
/// backend (SQLite, in-memory mock, etc.).
pub struct IntakeService<R, N> {
    repo: R,
    notifier: N,
    /// Total number of screens, terminal step included.
    total_steps: u32,
    /// Recorded on every persisted campaign.
    form_revision: String,
}

impl<R: CampaignRepository, N: Notifier> IntakeService<R, N> {
    pub fn new(repo: R, notifier: N, total_steps: u32, form_revision: impl Into<String>) -> Self {
        Self {
            repo,
            notifier,
            total_steps,
            form_revision: form_revision.into(),
        }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Access the underlying notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Handle a non-final step submission.
    ///
    /// On success the returned token must travel to the next screen's
    /// render. A corrupt prior token aborts the flow and tells the user to
    /// restart; prior data is never silently dropped.
    pub async fn handle_step(
        &self,
        user_id: &str,
        prior: Option<&StateToken>,
        step: StepValues,
    ) -> IntakeOutcome {
        match accumulator::merge(prior, step) {
            Ok(token) => {
                // merge() only hands back tokens it encoded itself.
                let state = accumulator::decode(&token)
                    .expect("token produced by merge always decodes");
                let completed = state.completed_steps() as u32;
                let flow = FlowState::AwaitingStep(completed).step_submitted(self.total_steps);
                let session = FormSession::resume(user_id, state);

                tracing::debug!(user_id, step = completed, "accumulated step submission");
                IntakeOutcome::Advanced {
                    session,
                    token,
                    flow,
                }
            }
            Err(err) => self.abort_corrupt(user_id, err).await,
        }
    }

    /// Handle the terminal step submission: merge, flatten, assemble,
    /// persist, confirm.
    pub async fn handle_final(
        &self,
        user_id: &str,
        prior: Option<&StateToken>,
        final_step: StepValues,
        specs: &[FieldSpec],
    ) -> IntakeOutcome {
        let token = match accumulator::merge(prior, final_step) {
            Ok(token) => token,
            Err(err) => return self.abort_corrupt(user_id, err).await,
        };
        let state = accumulator::decode(&token)
            .expect("token produced by merge always decodes");

        let record = match assembler::assemble(&accumulator::flatten(&state), specs) {
            Ok(record) => record,
            Err(failure) => {
                tracing::info!(user_id, missing = ?failure.missing, "submission rejected");
                self.send(
                    user_id,
                    &format!(
                        "⚠️ Your submission is missing required fields: {}. Please fill them in and resubmit.",
                        failure.missing.join(", ")
                    ),
                )
                .await;
                return IntakeOutcome::Rejected(failure);
            }
        };

        let campaign = NewCampaign {
            user_id: user_id.to_string(),
            form_revision: self.form_revision.clone(),
            record,
        };

        match self.repo.insert(&campaign).await {
            Ok(campaign_id) => {
                let name = campaign
                    .record
                    .get_text("campaign_name")
                    .unwrap_or("your campaign");
                tracing::info!(user_id, %campaign_id, "campaign saved");
                self.send(user_id, &format!("✅ *{name}* has been saved!")).await;
                IntakeOutcome::Saved { campaign_id }
            }
            Err(err) => {
                // The data was valid; only the write failed. Distinct
                // message from validation, and the assembled record is not
                // stored anywhere else.
                let message = err.to_string();
                tracing::warn!(user_id, error = %message, "campaign store failed");
                self.send(
                    user_id,
                    &format!("❌ Failed to save your submission: {message}. Your answers are still on screen -- please try again."),
                )
                .await;
                IntakeOutcome::StoreFailed { message }
            }
        }
    }

    /// Handle the user dismissing the form.
    pub async fn handle_cancel(&self, user_id: &str) -> IntakeOutcome {
        tracing::debug!(user_id, "flow cancelled by user");
        IntakeOutcome::Aborted(AbortReason::UserCancelled)
    }

    async fn abort_corrupt(&self, user_id: &str, err: AccumulatorError) -> IntakeOutcome {
        tracing::warn!(user_id, error = %err, "corrupt state token, aborting flow");
        self.send(
            user_id,
            "⚠️ Something went wrong carrying your earlier answers forward. Please restart the form.",
        )
        .await;
        IntakeOutcome::Aborted(AbortReason::CorruptState)
    }

    /// Deliver a user-facing message; failure is logged and swallowed so it
    /// can never change the outcome of a persistence step already
    /// completed.
    async fn send(&self, user_id: &str, text: &str) {
        if let Err(err) = self.notifier.notify(user_id, text).await {
            tracing::warn!(user_id, error = %err, "notification delivery failed");
        }
    }
}
