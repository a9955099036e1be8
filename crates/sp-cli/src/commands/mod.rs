//! CLI command implementations

mod check;
mod config;
mod connect;
mod interactive;
mod list;
mod runtime;

pub use check::check_command;
pub use config::{config_path, config_servers, config_show};
pub use connect::{fast_open_command, forward_command, open_command};
pub use interactive::{interactive_command, ReplCommand};
pub use list::{list_command, resolve_command};
pub use runtime::{Runtime, RuntimeOptions};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Anchor a relative file path at the current directory
pub(crate) fn absolute_path(file: &Path) -> Result<PathBuf> {
    if file.is_absolute() {
        return Ok(file.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("Failed to read current directory")?
        .join(file))
}
