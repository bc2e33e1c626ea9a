//! Service layer: intake orchestration over the repository and notifier
//! ports.

pub mod intake;
pub mod notifier;
