//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use thiserror::Error;
use valuesmith_core::CoreError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Override values could not be encoded or merged
    #[error("Invalid overrides: {message}")]
    #[diagnostic(code(valuesmith::cli::overrides))]
    Overrides {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Plugin configuration missing or malformed
    #[error("Configuration error: {message}")]
    #[diagnostic(code(valuesmith::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Chart directory scan failed
    #[error("Chart error: {message}")]
    #[diagnostic(code(valuesmith::cli::chart))]
    Chart {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid combination of command-line arguments
    #[error("Usage error: {message}")]
    #[diagnostic(code(valuesmith::cli::usage))]
    Usage { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(valuesmith::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Overrides { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Config { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Chart { .. } => exit_codes::CHART_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create an overrides error with help text
    pub fn overrides_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Overrides {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a chart error
    pub fn chart(message: impl Into<String>) -> Self {
        Self::Chart {
            message: message.into(),
            help: None,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedShape { .. } => CliError::overrides_with_help(
                err.to_string(),
                "Write the inner list as a mapping, e.g. [{\"value\": ...}]",
            ),
            CoreError::InvalidOverrideGroup { .. } => CliError::overrides_with_help(
                err.to_string(),
                "Override groups take key/value pairs, either nested or as a JSON object string",
            ),
            CoreError::JsonParse(_) => CliError::overrides_with_help(
                err.to_string(),
                "Check the JSON object given as a string override group",
            ),
            CoreError::DocumentShape { .. } | CoreError::YamlParse(_) => CliError::Chart {
                message: err.to_string(),
                help: None,
            },
            CoreError::Io(io) => CliError::from(io),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
