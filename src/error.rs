//! Error types for pipeline smoke tests.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for smoke test runs.
#[derive(Error, Debug)]
pub enum Error {
    /// The Terraform directory is missing or unusable.
    #[error("invalid terraform directory {path}: {reason}")]
    InvalidTerraformDir { path: PathBuf, reason: String },

    /// Terraform exited with a non-zero status.
    #[error("`{command}` failed with {status}: {stderr}")]
    Engine {
        command: String,
        status: String,
        stderr: String,
    },

    /// The Terraform binary could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The requested output is not defined by the applied configuration.
    #[error("output '{name}' not found; available outputs: [{}]", .available.join(", "))]
    OutputNotFound {
        name: String,
        available: Vec<String>,
    },

    /// The output value could not be decoded.
    #[error("failed to decode output '{name}': {reason}")]
    OutputDecode { name: String, reason: String },

    /// The output value did not meet the expectation.
    #[error("assertion failed: expected {expected}, got {actual:?}")]
    Assertion { expected: String, actual: String },

    /// Destroy failed after the run.
    #[error("teardown failed: {0}")]
    Teardown(String),

    /// A case task ended without producing a result.
    #[error("case task failed: {0}")]
    Task(String),

    /// Case or settings configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error while reading fixtures.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for smoke test operations.
pub type Result<T> = std::result::Result<T, Error>;
