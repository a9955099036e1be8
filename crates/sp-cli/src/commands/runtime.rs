//! Wiring of the orchestrator to the terminal UI

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use sp_core::config::{FileConfigSource, TomlSettingsStore};
use sp_core::traits::SessionHost;
use sp_core::{LogSink, SessionId};
use sp_orchestrator::{check_ssh_executable, Commands, OrchestratorState, SessionOutcome};

use crate::output::{format_sessions, print_warning};
use crate::ui::{resolve_shell, ConsoleLog, ConsolePrompter, EchoHost, PtyHost};

/// How to build a [`Runtime`]
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Server files, merged in order
    pub servers: Vec<PathBuf>,
    pub settings: PathBuf,
    /// Print session lines instead of running a shell
    pub dry_run: bool,
    /// Shell for PTY sessions
    pub shell: Option<String>,
    /// Write the diagnostic log as it happens rather than on failure only
    pub echo_log: bool,
}

/// Command surface plus the session host behind it
pub struct Runtime {
    pub commands: Commands,
    prompter: Arc<ConsolePrompter>,
    source: FileConfigSource,
    pty: Option<Arc<PtyHost>>,
}

impl Runtime {
    pub fn build(options: RuntimeOptions) -> Result<Self> {
        let settings = Arc::new(
            TomlSettingsStore::open(&options.settings)
                .with_context(|| format!("Failed to load settings: {:?}", options.settings))?,
        );
        let log: Arc<dyn LogSink> = Arc::new(ConsoleLog::new(options.echo_log));
        let state = Arc::new(OrchestratorState::new(settings, log));

        check_ssh_executable(state.log().as_ref());

        let pty = if options.dry_run {
            None
        } else {
            let shell = resolve_shell(options.shell.as_deref())?;
            Some(Arc::new(PtyHost::new(shell)))
        };
        let host: Arc<dyn SessionHost> = match &pty {
            Some(pty) => pty.clone(),
            None => Arc::new(EchoHost::new()),
        };

        let prompter = Arc::new(ConsolePrompter::stdin());
        let commands = Commands::new(state, host, prompter.clone());

        let runtime = Self {
            commands,
            prompter,
            source: FileConfigSource::new(options.servers),
            pty,
        };
        if let Err(e) = runtime.reload() {
            print_warning(&format!("Unable to load servers: {:#}", e));
        }

        Ok(runtime)
    }

    /// Re-read the server files. The catalog is empty if they cannot be read.
    pub fn reload(&self) -> Result<usize> {
        Ok(self.commands.reload_servers(&self.source)?)
    }

    /// Read one line from the terminal the prompts use; `None` at end of input
    pub async fn read_line(&self, question: &str) -> Option<String> {
        self.prompter.ask(question).await
    }

    /// Forget a session and report it closed
    pub async fn close(&self, id: SessionId) -> bool {
        if let Some(pty) = &self.pty {
            pty.forget(id);
        }
        self.commands.on_session_closed(id).await.is_some()
    }

    /// Hand the terminal to a freshly shown session and forget it once it exits.
    ///
    /// In dry-run mode the live sessions are listed instead.
    pub async fn finish(&self, outcome: SessionOutcome) -> Result<()> {
        let Some(pty) = &self.pty else {
            println!("{}", format_sessions(&self.commands.connections("", "")));
            return Ok(());
        };

        let id = outcome.handle.id;
        let Some(session) = pty.session(id).filter(|s| s.is_shown()) else {
            return Ok(());
        };

        let code = tokio::task::spawn_blocking(move || session.attach())
            .await
            .context("Session task failed")??;
        tracing::debug!("{} closed with exit code {}", id, code);

        self.close(id).await;
        Ok(())
    }
}
