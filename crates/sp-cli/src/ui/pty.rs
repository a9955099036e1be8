//! Sessions backed by a local pseudo-terminal
//!
//! Each session runs the user's shell in its own PTY. Lines from the
//! orchestrator are typed into it like keystrokes, so the external ssh
//! utility sees a real terminal and can prompt for the password.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use sp_core::traits::{SessionHost, TerminalSession};
use sp_core::types::SessionIdAllocator;
use sp_core::{SessionError, SessionId};

/// Pick the shell to host sessions in: `requested`, else `$SHELL`, else the platform default
pub fn resolve_shell(requested: Option<&str>) -> Result<String> {
    let shell = requested
        .map(String::from)
        .or_else(|| std::env::var("SHELL").ok())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "cmd.exe".to_string()
            } else {
                "/bin/sh".to_string()
            }
        });

    if !cfg!(windows) && !Path::new(&shell).exists() {
        anyhow::bail!("Shell '{}' does not exist", shell);
    }
    Ok(shell)
}

fn terminal_size() -> PtySize {
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

pub struct PtySession {
    id: SessionId,
    title: String,
    master: Mutex<Box<dyn MasterPty + Send>>,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    child: Mutex<Box<dyn Child + Send + Sync>>,
    shown: AtomicBool,
}

impl PtySession {
    pub fn is_shown(&self) -> bool {
        self.shown.load(Ordering::Relaxed)
    }

    /// Hand the controlling terminal to the session until its shell exits.
    ///
    /// Blocks. Returns the shell's exit code.
    pub fn attach(&self) -> Result<u32> {
        let mut reader = self
            .master
            .lock()
            .try_clone_reader()
            .context("Failed to clone PTY reader")?;

        std::thread::spawn(move || {
            let mut stdout = std::io::stdout();
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if stdout.write_all(&buf[..n]).and_then(|_| stdout.flush()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let writer = Arc::clone(&self.writer);
        std::thread::spawn(move || {
            let mut stdin = std::io::stdin();
            let mut buf = [0u8; 1024];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        let mut writer = writer.lock();
                        if writer.write_all(&buf[..n]).and_then(|_| writer.flush()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        // Not a terminal when stdin is redirected; keys are then forwarded as-is
        let raw = crossterm::terminal::enable_raw_mode().is_ok();
        let status = self.child.lock().wait();
        if raw {
            let _ = crossterm::terminal::disable_raw_mode();
        }

        let status = status.context("Failed to wait for session shell")?;
        tracing::info!("Session {} exited with {}", self.id, status.exit_code());
        Ok(status.exit_code())
    }
}

#[async_trait]
impl TerminalSession for PtySession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    async fn show(&self) -> Result<(), SessionError> {
        self.shown.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn send_text(&self, line: &str) -> Result<(), SessionError> {
        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\r"))
            .and_then(|_| writer.flush())
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::BrokenPipe => SessionError::Closed,
                _ => SessionError::SendFailed(e.to_string()),
            })
    }
}

/// Creates PTY sessions running `shell`
pub struct PtyHost {
    shell: String,
    ids: SessionIdAllocator,
    sessions: Mutex<HashMap<SessionId, Arc<PtySession>>>,
}

impl PtyHost {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            ids: SessionIdAllocator::new(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn session(&self, id: SessionId) -> Option<Arc<PtySession>> {
        self.sessions.lock().get(&id).cloned()
    }

    /// Drop a session whose shell has exited
    pub fn forget(&self, id: SessionId) -> Option<Arc<PtySession>> {
        self.sessions.lock().remove(&id)
    }

    /// Number of sessions still held
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn spawn(&self, title: &str) -> Result<PtySession> {
        let pair = native_pty_system()
            .openpty(terminal_size())
            .context("Failed to open PTY")?;

        let mut cmd = CommandBuilder::new(&self.shell);
        cmd.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn shell: {}", self.shell))?;
        tracing::debug!("Spawned {} for '{}' (pid {:?})", self.shell, title, child.process_id());

        let writer = pair.master.take_writer().context("Failed to take PTY writer")?;

        Ok(PtySession {
            id: self.ids.allocate(),
            title: title.to_string(),
            master: Mutex::new(pair.master),
            writer: Arc::new(Mutex::new(writer)),
            child: Mutex::new(child),
            shown: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl SessionHost for PtyHost {
    async fn create_session(&self, title: &str) -> Result<Arc<dyn TerminalSession>, SessionError> {
        let session = Arc::new(
            self.spawn(title)
                .map_err(|e| SessionError::CreateFailed(format!("{:#}", e)))?,
        );
        self.sessions.lock().insert(session.id, Arc::clone(&session));
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_explicit_shell_must_exist() {
        assert!(resolve_shell(Some("/definitely/not/a/shell")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_shell_is_used() {
        assert_eq!(resolve_shell(Some("/bin/sh")).unwrap(), "/bin/sh");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_closed_sessions_are_forgotten() {
        let host = PtyHost::new("/bin/sh");
        let first = host.create_session("alpha").await.unwrap();
        let second = host.create_session("alpha (Forwarding)").await.unwrap();
        assert_eq!(host.len(), 2);

        assert!(host.forget(first.id()).is_some());
        assert!(host.session(first.id()).is_none());
        assert!(host.session(second.id()).is_some());
        assert!(host.forget(first.id()).is_none());

        host.forget(second.id());
        assert!(host.is_empty());
    }
}
