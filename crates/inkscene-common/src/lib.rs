//! # Inkscene Common
//!
//! Shared error types and logging configuration for Inkscene binaries.

use thiserror::Error;

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Errors raised while setting up shared infrastructure.
#[derive(Error, Debug)]
pub enum CommonError {
    /// Unknown log format name.
    #[error("Invalid log format: {0} (expected pretty, compact or json)")]
    InvalidLogFormat(String),

    /// The log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CommonError::InvalidLogFormat("xml".into()).to_string(),
            "Invalid log format: xml (expected pretty, compact or json)"
        );
    }
}
