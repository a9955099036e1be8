//! Core error types for shellport

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the shellport ecosystem
#[derive(Error, Debug)]
pub enum SpError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connect(#[from] ConnectError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Forwarding address rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while opening a connection
#[derive(Error, Debug)]
pub enum ConnectError {
    /// No catalog entry with that display name
    #[error("Unknown server: {0}")]
    UnknownServer(String),

    /// Entry exists but lacks host and/or username
    #[error("Check host or username for '{server}' (missing {missing})")]
    IncompleteConfig {
        /// Display name of the entry
        server: String,
        /// Human-readable list of missing fields
        missing: String,
    },

    /// Fast open requested with no server mapped to the active file
    #[error("No configured server owns the active file")]
    NoMappedServer,

    /// The UI shell failed to create or drive the session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Session-related errors reported by the UI shell
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session could not be created
    #[error("Failed to create session: {0}")]
    CreateFailed(String),

    /// A line could not be delivered to the session
    #[error("Failed to send text: {0}")]
    SendFailed(String),

    /// Session closed
    #[error("Session closed")]
    Closed,
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Server definitions are not a well-formed sequence of objects
    #[error("Malformed server list: {0}")]
    Malformed(String),

    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Forwarding address rejected by the inline prompt validator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Not `[host:]port` with a port in range
    #[error("Please enter a domain (optional)  and port in range 0 - 65535 (e. g. localhost:9000 or 9000)")]
    InvalidAddress,

    /// Not `host:port` with a port in range
    #[error("Please enter a domain and port in range 0 - 65535 (e. g. localhost:9000)")]
    InvalidHostAddress,
}
