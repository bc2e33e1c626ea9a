//! Outbound delivery adapters: chat confirmations and webhook forwarding.

pub mod chat;
pub mod webhook;

pub use chat::ChatNotifier;
pub use webhook::WebhookForwarder;
