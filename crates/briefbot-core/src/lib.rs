//! Form accumulation and assembly logic for Briefbot.
//!
//! This crate holds the pure core of the multi-step intake flow -- the step
//! accumulator, the submission assembler, and the flow state machine -- plus
//! the repository and notifier trait ports that the infrastructure layer
//! (briefbot-infra) implements. It depends only on `briefbot-types` and
//! never on a database or HTTP crate.

pub mod accumulator;
pub mod assembler;
pub mod flow;
pub mod repository;
pub mod service;
