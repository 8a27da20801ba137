//! Error handling module for the Gentoo installer
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every pipeline step returns these types so callers can inspect a failure
//! instead of having the process terminated underneath them.

use thiserror::Error;

/// Main error type for the installer
#[derive(Error, Debug)]
pub enum InstallError {
    /// Effective user is not root
    #[error("This script must be run as root")]
    NotRoot,

    /// Connectivity probe or index fetch could not reach the host
    #[error("Network error: {0}")]
    Network(String),

    /// Release index was reachable but held no usable artifact link
    #[error("Release discovery failed: {0}")]
    Discovery(String),

    /// Required host tools are not on PATH
    #[error("Missing required binaries: {}", .0.join(", "))]
    MissingBinaries(Vec<String>),

    /// An external command exited non-zero (or could not be spawned)
    #[error("Command `{command}` failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Disk enumeration or selection errors
    #[error("Disk error: {0}")]
    Disk(String),

    /// Interactive input errors (closed stdin, terminal failures)
    #[error("Input error: {0}")]
    Input(String),

    /// Validation errors (hostname, username, config values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (loading, parsing)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for installer operations
pub type Result<T> = std::result::Result<T, InstallError>;

impl InstallError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a disk error
    pub fn disk(msg: impl Into<String>) -> Self {
        Self::Disk(msg.into())
    }

    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit status for this error.
    ///
    /// Every unrecoverable failure maps to 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<reqwest::Error> for InstallError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
