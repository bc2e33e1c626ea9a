//! Outbound webhook forwarder with HMAC-SHA256 request signing.
//!
//! Optionally forwards a summary of each persisted campaign to an external
//! workflow-automation endpoint. The body is signed with a shared secret
//! when one is configured; receivers verify the hex signature from the
//! `X-Briefbot-Signature` header.

use std::time::Duration;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use sha2::Sha256;

use briefbot_types::error::NotifyError;
use briefbot_types::record::Campaign;

type HmacSha256 = Hmac<Sha256>;

/// Signature header carried on signed forwards.
pub const SIGNATURE_HEADER: &str = "X-Briefbot-Signature";

/// Forwards persisted-campaign summaries to an external webhook.
pub struct WebhookForwarder {
    client: reqwest::Client,
    url: String,
    secret: Option<SecretString>,
}

impl WebhookForwarder {
    pub fn new(url: impl Into<String>, secret: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            url: url.into(),
            secret,
        }
    }

    /// POST a JSON summary of the campaign. Failure here is the caller's to
    /// log; the record is already persisted and the forward is best-effort.
    pub async fn forward(&self, campaign: &Campaign) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(&summary_payload(campaign))
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body.clone());

        if let Some(secret) = &self.secret {
            let signature = sign_hmac_sha256(secret.expose_secret().as_bytes(), &body)
                .map_err(NotifyError::Delivery)?;
            request = request.header(SIGNATURE_HEADER, signature);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(format!("HTTP {status}")));
        }

        tracing::debug!(campaign_id = %campaign.id, "campaign forwarded to webhook");
        Ok(())
    }
}

fn summary_payload(campaign: &Campaign) -> serde_json::Value {
    json!({
        "campaign_id": campaign.id,
        "user_id": campaign.user_id,
        "form_revision": campaign.form_revision,
        "submitted_at": campaign.created_at.to_rfc3339(),
        "record": campaign.record,
    })
}

/// Hex-encoded HMAC-SHA256 of `body` under `key`.
fn sign_hmac_sha256(key: &[u8], body: &[u8]) -> Result<String, String> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| format!("invalid HMAC key: {e}"))?;
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Verify a hex HMAC-SHA256 signature against a request body.
///
/// Constant-time comparison via the `Mac::verify_slice` machinery.
pub fn verify_hmac_sha256(key: &[u8], body: &[u8], signature_hex: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    mac.update(body);

    let Some(expected) = decode_hex(signature_hex) else {
        return false;
    };
    mac.verify_slice(&expected).is_ok()
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
