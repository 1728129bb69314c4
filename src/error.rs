//! Error types for the plan assertion toolkit.
//!
//! This module provides the error hierarchy for every fallible step:
//! loading the expectations file, reading and flattening the plan, and
//! evaluating path queries against the plan document.
//!
//! Mismatches between a plan and its expectations are not errors. They are
//! recorded in a [`DiffRecord`](crate::checker::DiffRecord) and paired with a
//! boolean verdict.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the plan assertion toolkit.
#[derive(Debug, Error)]
pub enum PlanAssertError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan loading and flattening errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Path query errors.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The expectations file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The expectations file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// The same resource address is expected twice.
    #[error("Duplicate expected resource address: {address}")]
    DuplicateAddress {
        /// The duplicated address.
        address: String,
    },

    /// An environment override holds a value that cannot be used.
    #[error("Invalid value for {name}: {value}")]
    InvalidOverride {
        /// Name of the environment variable.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// Plan loading and flattening errors.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file was not found.
    #[error("Plan file not found: {path}")]
    FileNotFound {
        /// Path to the missing plan.
        path: PathBuf,
    },

    /// The plan file exists but could not be read.
    #[error("Failed to read plan {path}: {message}")]
    ReadFailed {
        /// Path to the plan.
        path: PathBuf,
        /// Description of the read failure.
        message: String,
    },

    /// The document has no root module to flatten.
    #[error("Plan has no root module at {expression}")]
    RootModuleNotFound {
        /// Path expression that was evaluated.
        expression: String,
    },

    /// A query matched a value of the wrong shape.
    #[error("Unexpected value at {expression}: expected {expected}")]
    UnexpectedShape {
        /// Path expression that was evaluated.
        expression: String,
        /// Description of the expected shape.
        expected: String,
    },
}

/// Path query errors.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The path expression could not be parsed.
    #[error("Invalid path expression {expression:?}: {reason}")]
    InvalidExpression {
        /// The rejected expression.
        expression: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The document is not valid JSON.
    #[error("Malformed JSON document: {message}")]
    MalformedDocument {
        /// Parser error message.
        message: String,
    },

    /// The expression matched nothing.
    #[error("Path {expression:?} not found in document")]
    NotFound {
        /// The expression that matched nothing.
        expression: String,
    },
}

/// Result type alias for plan assertion operations.
pub type Result<T> = std::result::Result<T, PlanAssertError>;

/// Process exit code for a plan that does not match its expectations.
pub const EXIT_CHECK_FAILED: u8 = 1;
/// Process exit code for errors in the caller's input.
pub const EXIT_INPUT_ERROR: u8 = 2;
/// Process exit code for errors reading files or the environment.
pub const EXIT_ENVIRONMENT_ERROR: u8 = 3;

impl PlanAssertError {
    /// Returns true if the error comes from the user's input rather than the
    /// environment (bad config, bad plan, bad query).
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Query(_)
                | Self::Plan(PlanError::RootModuleNotFound { .. } | PlanError::UnexpectedShape { .. })
        )
    }

    /// Returns the process exit code for this error.
    ///
    /// Input errors and environment errors get distinct codes, both distinct
    /// from [`EXIT_CHECK_FAILED`].
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_input_error() {
            EXIT_INPUT_ERROR
        } else {
            EXIT_ENVIRONMENT_ERROR
        }
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl QueryError {
    /// Creates an invalid expression error.
    #[must_use]
    pub fn invalid(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}
