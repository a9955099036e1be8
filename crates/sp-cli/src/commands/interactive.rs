//! Interactive command loop
//!
//! Keeps one runtime alive across commands, so sessions opened earlier are
//! reused and the catalog can be reloaded without restarting.

use std::path::PathBuf;

use anyhow::Result;

use sp_core::SessionId;

use super::connect::{fast_open_command, forward_command, open_command};
use super::list::{list_command, resolve_command};
use super::runtime::Runtime;
use crate::output::{format_sessions, print_info, print_success, print_warning};

const PROMPT: &str = "shellport>";

const HELP: &str = "\
Commands:
  open [server]              open or reuse a session
  forward [server [spec]]    open a port forwarding session
  fast-open <file>           connect to the server owning a local file
  resolve <file>             show which server owns a local file
  list                       list configured servers
  sessions                   list live sessions
  close <session>            close a live session
  reload                     re-read the server files
  help                       show this help
  quit                       leave";

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Open(Option<String>),
    Forward {
        server: Option<String>,
        spec: Option<String>,
    },
    FastOpen(PathBuf),
    Resolve(PathBuf),
    List,
    Sessions,
    Close(SessionId),
    Reload,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (verb, args) {
            ("open", []) => Self::Open(None),
            ("open", [server]) => Self::Open(Some(server.to_string())),
            ("forward", []) => Self::Forward {
                server: None,
                spec: None,
            },
            ("forward", [server, spec @ ..]) => Self::Forward {
                server: Some(server.to_string()),
                spec: (!spec.is_empty()).then(|| spec.join(" ")),
            },
            ("fast-open", [file]) => Self::FastOpen(PathBuf::from(file)),
            ("resolve", [file]) => Self::Resolve(PathBuf::from(file)),
            ("list" | "ls", []) => Self::List,
            ("sessions", []) => Self::Sessions,
            ("close", [id]) => Self::Close(parse_session_id(id)?),
            ("reload", []) => Self::Reload,
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            _ => return Err(format!("Unknown command: {}", line.trim())),
        };
        Ok(Some(command))
    }
}

/// `3` or `session-3`
fn parse_session_id(text: &str) -> Result<SessionId, String> {
    text.strip_prefix("session-")
        .unwrap_or(text)
        .parse::<u32>()
        .map(SessionId::new)
        .map_err(|_| format!("Not a session id: {}", text))
}

/// Execute the interactive command
pub async fn interactive_command(runtime: &Runtime) -> Result<()> {
    print_info("Type 'help' for commands, 'quit' to leave");

    while let Some(line) = runtime.read_line(PROMPT).await {
        let command = match ReplCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                print_warning(&message);
                continue;
            }
        };

        if command == ReplCommand::Quit {
            break;
        }

        // Failures were already reported; keep the loop going
        if let Err(e) = run(runtime, command).await {
            tracing::debug!("Command failed: {:#}", e);
        }
    }

    Ok(())
}

async fn run(runtime: &Runtime, command: ReplCommand) -> Result<()> {
    match command {
        ReplCommand::Open(server) => open_command(runtime, server.as_deref()).await,
        ReplCommand::Forward { server, spec } => {
            forward_command(runtime, server.as_deref(), spec.as_deref()).await
        }
        ReplCommand::FastOpen(file) => fast_open_command(runtime, &file).await,
        ReplCommand::Resolve(file) => resolve_command(runtime, &file),
        ReplCommand::List => list_command(runtime, false),
        ReplCommand::Sessions => {
            println!("{}", format_sessions(&runtime.commands.connections("", "")));
            Ok(())
        }
        ReplCommand::Close(id) => {
            if runtime.close(id).await {
                print_success(&format!("Closed {}", id));
            } else {
                print_warning(&format!("No live session {}", id));
            }
            Ok(())
        }
        ReplCommand::Reload => {
            let count = runtime.reload()?;
            print_success(&format!("Loaded {} server(s)", count));
            Ok(())
        }
        ReplCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
        ReplCommand::Quit => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ReplCommand {
        ReplCommand::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_open() {
        assert_eq!(parse("open"), ReplCommand::Open(None));
        assert_eq!(parse("  open   alpha "), ReplCommand::Open(Some("alpha".to_string())));
    }

    #[test]
    fn test_parse_forward_joins_spec() {
        assert_eq!(
            parse("forward alpha -L 9000:localhost:9000"),
            ReplCommand::Forward {
                server: Some("alpha".to_string()),
                spec: Some("-L 9000:localhost:9000".to_string()),
            }
        );
        assert_eq!(
            parse("forward alpha"),
            ReplCommand::Forward {
                server: Some("alpha".to_string()),
                spec: None,
            }
        );
    }

    #[test]
    fn test_parse_close_accepts_both_id_forms() {
        assert_eq!(parse("close 2"), ReplCommand::Close(SessionId::new(2)));
        assert_eq!(parse("close session-2"), ReplCommand::Close(SessionId::new(2)));
        assert!(ReplCommand::parse("close two").is_err());
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(ReplCommand::parse("   ").unwrap(), None);
        assert!(ReplCommand::parse("connect alpha").is_err());
        assert!(ReplCommand::parse("list everything").is_err());
    }
}
