//! Core trait definitions

mod prompt;
mod session;
mod settings;

pub use prompt::{InputRequest, Prompter};
pub use session::{SessionHost, TerminalSession};
pub use settings::SettingsStore;
