//! User-facing commands
//!
//! The operations a UI shell binds to its menus and events: the three
//! connect commands, session-closed and active-file notifications, config
//! reloads and the `connections` query.

use std::sync::Arc;

use sp_core::config::ConfigSource;
use sp_core::traits::{Prompter, SessionHost};
use sp_core::{ConfigError, ConnectError, ForwardingSpec, SessionId};

use crate::forwarding::ForwardingWizard;
use crate::orchestrator::{ConnectionOrchestrator, SessionOutcome};
use crate::session::{SessionDescriptor, SessionHandle};
use crate::state::{FastOpenTarget, OrchestratorState};

const SELECT_SERVER_PLACEHOLDER: &str = "Select the server to connect...";
const NO_SERVERS_MESSAGE: &str = "You don't have any servers";
const NOT_STARTED_MESSAGE: &str = "Terminal has been not started, check output for more info.";
const CHECK_OUTPUT_ACTION: &str = "Check output";
const RELOAD_FAILED_MESSAGE: &str = "Unable to load server list, check configuration files.";

pub struct Commands {
    orchestrator: ConnectionOrchestrator,
    prompter: Arc<dyn Prompter>,
}

impl Commands {
    pub fn new(
        state: Arc<OrchestratorState>,
        host: Arc<dyn SessionHost>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            orchestrator: ConnectionOrchestrator::new(state, host),
            prompter,
        }
    }

    pub fn state(&self) -> &Arc<OrchestratorState> {
        self.orchestrator.state()
    }

    pub fn orchestrator(&self) -> &ConnectionOrchestrator {
        &self.orchestrator
    }

    /// Ask which server to use; `None` if the catalog is empty or the user cancelled
    pub async fn select_server(&self) -> Option<String> {
        let names = self.state().catalog().list();
        if names.is_empty() {
            self.prompter.show_info(NO_SERVERS_MESSAGE).await;
            return None;
        }
        self.prompter.pick(&names, SELECT_SERVER_PLACEHOLDER).await
    }

    /// "Open Connection"
    ///
    /// `Ok(None)` when the user cancelled.
    pub async fn open_connection(&self) -> Result<Option<SessionOutcome>, ConnectError> {
        let Some(server) = self.select_server().await else {
            return Ok(None);
        };
        self.connect(&server, false, None).await.map(Some)
    }

    /// "Port Forwarding"
    ///
    /// The built spec is connected first; saving it to the recency cache is
    /// offered afterwards whatever the connect outcome.
    pub async fn port_forwarding(&self) -> Result<Option<SessionOutcome>, ConnectError> {
        let Some(server) = self.select_server().await else {
            return Ok(None);
        };
        self.forward_to(&server).await
    }

    /// "Port Forwarding" for a known server, skipping the picker
    pub async fn forward_to(&self, server: &str) -> Result<Option<SessionOutcome>, ConnectError> {
        let settings = self.state().settings();
        let wizard = ForwardingWizard::new(self.prompter.as_ref(), settings.as_ref());
        let Some(outcome) = wizard.run().await else {
            tracing::debug!("Forwarding wizard cancelled");
            return Ok(None);
        };

        let result = self
            .connect(server, false, Some(outcome.spec.clone()))
            .await;

        if !outcome.from_recent {
            if let Err(e) = wizard.remember(&outcome.spec).await {
                tracing::warn!("Failed to save recent forwarding: {}", e);
                self.state()
                    .log()
                    .append_line(&format!("Unable to save forwarding '{}': {}", outcome.spec, e));
            }
        }

        result.map(Some)
    }

    /// Connect with an already built forwarding spec, skipping the wizard
    pub async fn forward_with(
        &self,
        server: &str,
        spec: ForwardingSpec,
    ) -> Result<SessionOutcome, ConnectError> {
        self.connect(server, false, Some(spec)).await
    }

    /// "Open Connection" for a known server, skipping the picker
    pub async fn open_server(&self, server: &str) -> Result<SessionOutcome, ConnectError> {
        self.connect(server, false, None).await
    }

    /// "Fast Open Connection": connect to the server owning the active file
    pub async fn fast_open_connection(&self) -> Result<SessionOutcome, ConnectError> {
        match self.state().fast_open_target() {
            Some(target) => self.connect(&target.server, true, None).await,
            None => {
                let e = ConnectError::NoMappedServer;
                self.state().log().append_line(&e.to_string());
                self.report_failure().await;
                Err(e)
            }
        }
    }

    async fn connect(
        &self,
        server: &str,
        fast_path: bool,
        forwarding: Option<ForwardingSpec>,
    ) -> Result<SessionOutcome, ConnectError> {
        let result = self.orchestrator.connect(server, fast_path, forwarding).await;
        if result.is_err() {
            self.report_failure().await;
        }
        result
    }

    async fn report_failure(&self) {
        if self
            .prompter
            .show_error(NOT_STARTED_MESSAGE, CHECK_OUTPUT_ACTION)
            .await
        {
            self.state().log().show();
        }
    }

    /// The UI shell closed a session
    pub async fn on_session_closed(&self, id: SessionId) -> Option<Arc<SessionHandle>> {
        self.orchestrator.close(id).await
    }

    /// The user switched to another file, or to none
    pub fn on_active_file_changed(&self, path: Option<&str>) -> Option<FastOpenTarget> {
        self.state().set_active_file(path)
    }

    /// Reload servers from `source`.
    ///
    /// On failure the catalog is left empty.
    pub fn reload_servers(&self, source: &dyn ConfigSource) -> Result<usize, ConfigError> {
        let state = self.state();
        let result = source.load().and_then(|raw| {
            for message in &raw.messages {
                state.log().append_line(message);
            }
            state.reload_catalog(&raw.servers)
        });

        match &result {
            Ok(count) => tracing::info!("Loaded {} server(s)", count),
            Err(e) => {
                tracing::warn!("Server reload failed: {}", e);
                state.clear_catalog();
                state.log().append_line(RELOAD_FAILED_MESSAGE);
            }
        }
        result
    }

    /// Live sessions, filtered by exact host and username; empty filters match all
    pub fn connections(&self, host: &str, username: &str) -> Vec<SessionDescriptor> {
        self.state().registry().filter(host, username)
    }
}
