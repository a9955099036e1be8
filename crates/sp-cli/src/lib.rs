//! shellport: SSH session manager for the terminal
//!
//! Provides the `shellport` CLI: pick a configured server, open or reuse
//! a session on it, set up port forwarding, or jump straight to the server
//! that owns a local project file.

pub mod commands;
pub mod output;
pub mod ui;
