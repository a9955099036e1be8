//! ssh availability check

use std::sync::Arc;

use anyhow::Result;

use sp_core::TimestampedLog;
use sp_orchestrator::check_ssh_executable;

use crate::output::{print_success, print_warning};
use crate::ui::ConsoleLog;

/// Execute the check command
pub fn check_command() -> Result<()> {
    let log = TimestampedLog::new(Arc::new(ConsoleLog::new(true)));
    if check_ssh_executable(&log) {
        print_success("ssh is available");
    } else {
        print_warning("ssh was not found on PATH");
    }
    Ok(())
}
