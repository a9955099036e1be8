//! List and resolve command implementations

use std::path::Path;

use anyhow::Result;

use super::absolute_path;
use super::runtime::Runtime;
use crate::output::{format_servers, print_info, print_warning};

/// Execute the list command
pub fn list_command(runtime: &Runtime, long: bool) -> Result<()> {
    let catalog = runtime.commands.state().catalog();
    println!("Servers:");
    println!("{}", format_servers(&catalog, long));
    Ok(())
}

/// Show which server owns a local file
pub fn resolve_command(runtime: &Runtime, file: &Path) -> Result<()> {
    let file = absolute_path(file)?;
    match runtime
        .commands
        .on_active_file_changed(Some(&file.to_string_lossy()))
    {
        Some(target) => {
            println!("{}", target.server);
            print_info(&format!("{} ({})", target.label(), target.remote_dir));
        }
        None => print_warning("No configured server owns this file"),
    }
    Ok(())
}
