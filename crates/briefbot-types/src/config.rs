//! Global configuration types for Briefbot.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! database location, form revision, and the outbound chat/webhook
//! endpoints the intake adapters talk to.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Briefbot intake process.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults
/// so a missing file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// SQLite database URL. When absent the loader derives one from the
    /// data directory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Base URL of the chat platform's Web API.
    #[serde(default = "default_chat_api_base")]
    pub chat_api_base: String,

    /// Name of the form revision whose field schema is in effect.
    #[serde(default = "default_form_revision")]
    pub form_revision: String,

    /// Total number of screens in the form, terminal step included.
    #[serde(default = "default_total_steps")]
    pub total_steps: u32,

    /// Optional outbound webhook that receives a summary of each persisted
    /// record.
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

fn default_chat_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_form_revision() -> String {
    "v1".to_string()
}

fn default_total_steps() -> u32 {
    3
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            chat_api_base: default_chat_api_base(),
            form_revision: default_form_revision(),
            total_steps: default_total_steps(),
            webhook: None,
        }
    }
}

/// Outbound webhook endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    /// Shared secret for HMAC-SHA256 request signing. Unsigned when absent.
    #[serde(default)]
    pub secret: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.chat_api_base, "https://slack.com/api");
        assert_eq!(config.form_revision, "v1");
        assert_eq!(config.total_steps, 3);
        assert!(config.webhook.is_none());
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.total_steps, 3);
        assert!(config.webhook.is_none());
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
database_url = "sqlite:///tmp/briefbot.db"
form_revision = "v2"
total_steps = 2

[webhook]
url = "https://hooks.example.com/intake"
secret = "shh"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite:///tmp/briefbot.db"));
        assert_eq!(config.form_revision, "v2");
        assert_eq!(config.total_steps, 2);
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url, "https://hooks.example.com/intake");
        assert_eq!(webhook.secret.as_deref(), Some("shh"));
    }

    #[test]
    fn test_webhook_secret_optional() {
        let toml_str = r#"
[webhook]
url = "https://hooks.example.com/intake"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert!(config.webhook.unwrap().secret.is_none());
    }
}
