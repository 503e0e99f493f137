//! Claim check engine: data model and orchestration

pub mod models;
pub mod orchestrator;

pub use models::*;
pub use orchestrator::Orchestrator;
