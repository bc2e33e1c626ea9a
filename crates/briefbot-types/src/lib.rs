//! Shared domain types for Briefbot.
//!
//! This crate contains the core domain types used across the Briefbot
//! intake library: form field values, accumulated session state, campaign
//! records, field schemas, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod field;
pub mod record;
pub mod session;
