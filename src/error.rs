//! Crate-level error types

use thiserror::Error;

/// Errors surfaced by the claim checking engine
///
/// Upstream failures are recovered inside the providers and never show up
/// here. What remains are startup problems and internal defects.
#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<config::ConfigError> for CheckerError {
    fn from(err: config::ConfigError) -> Self {
        CheckerError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CheckerError>;
