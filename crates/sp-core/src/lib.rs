//! sp-core: Core abstractions and configuration for shellport
//!
//! This crate provides shared types, errors, configuration structures and
//! the collaborator traits (session host, prompts, settings, log sink)
//! used by the orchestrator and the CLI.

pub mod config;
pub mod error;
pub mod log;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{ConfigError, ConnectError, SessionError, SpError, ValidationError};
pub use log::{LogSink, MemoryLog, TimestampedLog};
pub use types::{ForwardingSpec, SessionId, SessionKey};
