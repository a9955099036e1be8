//! Terminal implementations of the UI shell collaborators

mod echo;
mod log;
mod prompt;
mod pty;

pub use echo::{EchoHost, EchoSession};
pub use log::ConsoleLog;
pub use prompt::ConsolePrompter;
pub use pty::{resolve_shell, PtyHost, PtySession};
