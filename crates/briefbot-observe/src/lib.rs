//! Observability setup for Briefbot.

pub mod tracing_setup;
