//! Error taxonomy for the intake flow.
//!
//! The distinctions matter for what the user is told: a corrupt token aborts
//! the flow, validation failures re-prompt the same screen, a store failure
//! is transient and distinct from validation, and a notification failure
//! never changes the outcome of a persistence step already completed.

use thiserror::Error;

/// Errors from the step accumulator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccumulatorError {
    /// The transport token could not be decoded. The flow must abort rather
    /// than silently substitute an empty state, because that would discard
    /// already-entered data without the user's knowledge.
    #[error("form state token could not be decoded: {0}")]
    CorruptState(String),
}

/// One or more required fields were missing from the final submission.
///
/// Recoverable: the same screen is re-rendered with every missing field
/// named, so the user sees all problems at once.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("required fields missing: {}", .missing.join(", "))]
pub struct ValidationFailure {
    pub missing: Vec<String>,
}

impl ValidationFailure {
    pub fn new(missing: Vec<String>) -> Self {
        Self { missing }
    }
}

/// Errors from repository operations (used by trait definitions in
/// briefbot-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

/// Failure to deliver a user-facing message.
///
/// Logged and swallowed by the intake service; never propagated as if the
/// submission itself failed.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),

    #[error("notification channel rejected the message: {0}")]
    Rejected(String),
}
