//! Notification channel trait definition.

use briefbot_types::error::NotifyError;

/// Delivers a text message to a user.
///
/// Implementations live in briefbot-infra (chat API, outbound webhook).
/// The intake service treats delivery failure as log-and-continue: a failed
/// confirmation must never change the outcome of a persistence step that
/// already completed.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        user_id: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}
