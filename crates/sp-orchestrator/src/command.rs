//! Lines typed into a freshly created session

use sp_core::config::{ResolvedHost, ResolvedKnock};
use sp_core::ForwardingSpec;

use crate::auth::AuthPlan;

/// Joins startup commands into one line
pub const COMMAND_SEPARATOR: &str = " && ";

/// What to do after login, besides authenticating
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptOptions<'a> {
    /// Tunnel fragment inserted before the host
    pub forwarding: Option<&'a ForwardingSpec>,
    /// `openProjectCatalog` setting
    pub open_project_catalog: bool,
    /// Connection came from the active file rather than a picker
    pub fast_path: bool,
    /// Remote project directory of the active file
    pub project_dir: Option<&'a str>,
    /// `customCommands` setting, used when the host defines none
    pub global_commands: &'a [String],
}

/// `ssh [<forwarding>] <host> -l <user> [<flags>]`
pub fn ssh_command(host: &ResolvedHost, plan: &AuthPlan, forwarding: Option<&ForwardingSpec>) -> String {
    let mut parts: Vec<&str> = vec!["ssh"];
    if let Some(spec) = forwarding.filter(|s| !s.as_str().is_empty()) {
        parts.push(spec.as_str());
    }
    parts.push(&host.host);
    parts.push("-l");
    parts.push(&host.username);
    parts.extend(plan.flags.iter().map(String::as_str));
    parts.join(" ")
}

/// Best-effort knock request; its result is never inspected
pub fn knock_command(knock: &ResolvedKnock) -> String {
    format!("curl {}:{}", knock.host, knock.port)
}

pub fn cd_command(dir: &str) -> String {
    format!("cd {}", dir)
}

/// Host commands if any, else the global ones. Never both.
pub fn startup_line(host_commands: &[String], global_commands: &[String]) -> Option<String> {
    let commands = if !host_commands.is_empty() {
        host_commands
    } else {
        global_commands
    };

    if commands.is_empty() {
        None
    } else {
        Some(commands.join(COMMAND_SEPARATOR))
    }
}

/// Every line for a new session, in the order they must be sent:
/// knock, ssh command, password, `cd`, startup commands.
pub fn session_script(host: &ResolvedHost, plan: &AuthPlan, options: ScriptOptions<'_>) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(knock) = &host.port_knock {
        lines.push(knock_command(knock));
    }

    lines.push(ssh_command(host, plan, options.forwarding));

    if let Some(password) = plan.password_line() {
        lines.push(password.to_string());
    }

    if options.open_project_catalog {
        if options.fast_path {
            if let Some(dir) = options.project_dir {
                lines.push(cd_command(dir));
            }
        } else if let Some(path) = &host.path {
            lines.push(cd_command(path));
        }
    }

    if let Some(line) = startup_line(&host.startup_commands, options.global_commands) {
        lines.push(line);
    }

    lines
}
