//! Infrastructure implementations for Briefbot.
//!
//! Adapters behind the ports defined in `briefbot-core`: the SQLite
//! campaign store, the chat-API notifier, the outbound webhook forwarder,
//! and the TOML configuration loader.

pub mod config;
pub mod notify;
pub mod sqlite;
