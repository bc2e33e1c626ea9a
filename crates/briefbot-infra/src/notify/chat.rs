//! ChatNotifier -- concrete [`Notifier`] implementation for the chat
//! platform's Web API.
//!
//! Posts a direct message to the submitting user via the platform's
//! `chat.postMessage`-style endpoint. The bot token is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use briefbot_core::service::notifier::Notifier;
use briefbot_types::error::NotifyError;

/// Chat-API backed notifier.
pub struct ChatNotifier {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl ChatNotifier {
    /// Create a new notifier for the given API base URL
    /// (e.g. `https://slack.com/api`).
    pub fn new(token: SecretString, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            base_url: base_url.into(),
        }
    }
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl Notifier for ChatNotifier {
    async fn notify(&self, user_id: &str, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let body = PostMessageRequest {
            channel: user_id,
            text,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Delivery(format!("HTTP {status}")));
        }

        // The platform reports application-level failures in-band with a
        // 200 status.
        let parsed: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        if !parsed.ok {
            return Err(NotifyError::Rejected(
                parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        tracing::debug!(user_id, "confirmation message delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = PostMessageRequest {
            channel: "U123",
            text: "saved",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["channel"], "U123");
        assert_eq!(json["text"], "saved");
    }

    #[test]
    fn test_response_error_field_optional() {
        let ok: PostMessageResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(ok.ok);
        assert!(ok.error.is_none());

        let failed: PostMessageResponse =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        assert!(!failed.ok);
        assert_eq!(failed.error.as_deref(), Some("channel_not_found"));
    }
}
