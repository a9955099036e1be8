//! Output formatting utilities for the CLI
//!
//! Tables for the server catalog and live sessions, plus colored status
//! messages.

use tabled::{
    settings::{Style, Width},
    Table, Tabled,
};

use sp_orchestrator::auth::{AuthResolver, AuthStrategy};
use sp_orchestrator::{ServerCatalog, SessionDescriptor};

/// Format the server catalog as a table
///
/// With `detailed`, adds the project mappings and startup commands.
pub fn format_servers(catalog: &ServerCatalog, detailed: bool) -> String {
    if catalog.is_empty() {
        return "No servers configured".to_string();
    }

    #[derive(Tabled)]
    struct ServerRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "TARGET")]
        target: String,
        #[tabled(rename = "PORT")]
        port: String,
        #[tabled(rename = "AUTH")]
        auth: String,
    }

    #[derive(Tabled)]
    struct ServerRowDetailed {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "TARGET")]
        target: String,
        #[tabled(rename = "PORT")]
        port: String,
        #[tabled(rename = "AUTH")]
        auth: String,
        #[tabled(rename = "PROJECTS")]
        projects: String,
        #[tabled(rename = "COMMANDS")]
        commands: String,
    }

    let summaries = catalog.entries().iter().map(|entry| {
        let (target, port, auth) = match entry.config.resolve(&entry.display_name) {
            Ok(host) => {
                let auth = match AuthResolver::resolve(&host).strategy {
                    AuthStrategy::UseAgent => "agent".to_string(),
                    AuthStrategy::UsePrivateKey(_) => "key".to_string(),
                    AuthStrategy::UsePassword(Some(_)) => "password".to_string(),
                    AuthStrategy::UsePassword(None) => "interactive".to_string(),
                };
                let port = host
                    .port
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string());
                (format!("{}@{}", host.username, host.host), port, auth)
            }
            Err(_) => ("(incomplete)".to_string(), "-".to_string(), "-".to_string()),
        };
        (entry, target, port, auth)
    });

    if detailed {
        let rows: Vec<ServerRowDetailed> = summaries
            .map(|(entry, target, port, auth)| ServerRowDetailed {
                name: entry.display_name.clone(),
                target,
                port,
                auth,
                projects: entry
                    .config
                    .project_map
                    .as_ref()
                    .map(|map| {
                        map.iter()
                            .map(|m| format!("{} -> {}", m.local_prefix, m.remote_dir))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "-".to_string()),
                commands: entry
                    .config
                    .startup_commands
                    .as_ref()
                    .filter(|c| !c.is_empty())
                    .map(|c| c.join(" && "))
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        Table::new(rows)
            .with(Style::rounded())
            .with(Width::wrap(120))
            .to_string()
    } else {
        let rows: Vec<ServerRow> = summaries
            .map(|(entry, target, port, auth)| ServerRow {
                name: entry.display_name.clone(),
                target,
                port,
                auth,
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }
}

/// Format live sessions as a table
pub fn format_sessions(sessions: &[SessionDescriptor]) -> String {
    if sessions.is_empty() {
        return "No active sessions".to_string();
    }

    #[derive(Tabled)]
    struct SessionRow {
        #[tabled(rename = "SESSION ID")]
        id: String,
        #[tabled(rename = "SERVER")]
        name: String,
        #[tabled(rename = "TARGET")]
        target: String,
        #[tabled(rename = "FORWARDING")]
        forwarding: String,
    }

    let rows: Vec<SessionRow> = sessions
        .iter()
        .map(|s| SessionRow {
            id: s.id.to_string(),
            name: s.name.clone(),
            target: format!("{}@{}", s.username, s.host),
            forwarding: if s.is_forwarding { "yes" } else { "no" }.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
///
/// Outputs to stderr.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow
///
/// Outputs to stderr.
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_servers() {
        let mut catalog = ServerCatalog::new();
        catalog
            .reload(&json!([
                {"name": "alpha", "host": "a.example.com", "username": "me", "agent": true},
                {"name": "broken", "username": "me"}
            ]))
            .unwrap();

        let table = format_servers(&catalog, false);
        assert!(table.contains("alpha"));
        assert!(table.contains("me@a.example.com"));
        assert!(table.contains("agent"));
        assert!(table.contains("(incomplete)"));
    }

    #[test]
    fn test_format_servers_detailed_shows_projects() {
        let mut catalog = ServerCatalog::new();
        catalog
            .reload(&json!([
                {"name": "alpha", "host": "h", "username": "u", "project": {"/w": "/srv"}}
            ]))
            .unwrap();
        assert!(format_servers(&catalog, true).contains("/w -> /srv"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(format_servers(&ServerCatalog::new(), false), "No servers configured");
        assert_eq!(format_sessions(&[]), "No active sessions");
    }
}
