//! Local ssh utility probe

use sp_core::LogSink;

/// Look for `ssh` on `PATH` and report the result to the log.
///
/// Never fatal: sessions may run in a terminal that brings its own ssh.
pub fn check_ssh_executable(log: &dyn LogSink) -> bool {
    let found = match which::which("ssh") {
        Ok(path) => {
            tracing::debug!("ssh found at {}", path.display());
            true
        }
        Err(e) => {
            tracing::debug!("ssh lookup failed: {}", e);
            false
        }
    };

    if found {
        log.append_line("Found ssh on your system.");
    } else {
        log.append_line("Did not find ssh on your system.");
    }
    log.append_line("If you use a third-party terminal, then make sure that there is an SSH utility.");
    found
}
