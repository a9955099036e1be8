//! Connection orchestration
//!
//! Decides whether a connect request reuses a live session or opens a new
//! one, and types the login script into new sessions.
//!
//! A session key moves `Absent -> Creating -> Active -> Absent`. Creation
//! and the login script both run while the registry is locked, so a
//! concurrent request for the same key either sees no session or a fully
//! prepared one.

use std::sync::Arc;

use sp_core::config::ResolvedHost;
use sp_core::traits::SessionHost;
use sp_core::{ConnectError, ForwardingSpec, SessionError, SessionId, SessionKey};

use crate::auth::AuthResolver;
use crate::command::{session_script, ScriptOptions};
use crate::session::{SessionHandle, SessionRegistry};
use crate::state::OrchestratorState;

/// Result of a successful connect
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub handle: Arc<SessionHandle>,
    /// `false` when a live session was reused
    pub created: bool,
}

pub struct ConnectionOrchestrator {
    state: Arc<OrchestratorState>,
    host: Arc<dyn SessionHost>,
}

impl ConnectionOrchestrator {
    pub fn new(state: Arc<OrchestratorState>, host: Arc<dyn SessionHost>) -> Self {
        Self { state, host }
    }

    pub fn state(&self) -> &Arc<OrchestratorState> {
        &self.state
    }

    /// Reuse or open a session for `display_name` and show it.
    ///
    /// `fast_path` marks a connection to the current fast-open target; its
    /// remote project directory is used for `cd`. Every failure is logged
    /// and nothing is retried.
    pub async fn connect(
        &self,
        display_name: &str,
        fast_path: bool,
        forwarding: Option<ForwardingSpec>,
    ) -> Result<SessionOutcome, ConnectError> {
        let catalog = self.state.catalog();
        let log = self.state.log();

        let Some(entry) = catalog.find(display_name) else {
            log.append_line(&format!("Server '{}' is not configured.", display_name));
            log.append_line(&not_started_line(display_name));
            return Err(ConnectError::UnknownServer(display_name.to_string()));
        };

        let label = entry
            .config
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(display_name);
        let resolved = match entry.config.resolve(&entry.display_name) {
            Ok(resolved) => resolved,
            Err(e) => {
                log.append_line(&format!("Check host or username for '{}'", display_name));
                log.append_line(&not_started_line(label));
                return Err(e);
            }
        };

        match self.acquire(&resolved, fast_path, forwarding).await {
            Ok(outcome) => {
                log.append_line(&format!(
                    "A terminal with a session for '{}' has been {}",
                    outcome.handle.host,
                    if outcome.created {
                        "created and displayed"
                    } else {
                        "displayed."
                    }
                ));
                Ok(outcome)
            }
            Err(e) => {
                log.append_line(&format!("Session for '{}' failed: {}", resolved.host, e));
                log.append_line(&not_started_line(&resolved.host));
                Err(e.into())
            }
        }
    }

    async fn acquire(
        &self,
        resolved: &ResolvedHost,
        fast_path: bool,
        forwarding: Option<ForwardingSpec>,
    ) -> Result<SessionOutcome, SessionError> {
        let settings = self.state.settings().settings();
        let key = SessionKey::new(resolved.display_name.clone(), forwarding.is_some());
        // Forwarding sessions are always deduplicated
        let reuse = !(settings.allow_multiple_connections && forwarding.is_none());

        let project_dir = if fast_path {
            self.state
                .fast_open_target()
                .filter(|t| t.server == resolved.display_name)
                .map(|t| t.remote_dir)
        } else {
            None
        };

        let acquired = self
            .state
            .registry()
            .get_or_create(&key, reuse, || async {
                self.state.log().append_line(&format!(
                    "New terminal session initialization for '{}'...",
                    resolved.host
                ));

                let session = self.host.create_session(&key.to_string()).await?;

                let plan = AuthResolver::resolve(resolved);
                tracing::debug!("Auth for '{}': {:?}", resolved.display_name, plan.strategy);
                let lines = session_script(
                    resolved,
                    &plan,
                    ScriptOptions {
                        forwarding: forwarding.as_ref(),
                        open_project_catalog: settings.open_project_catalog,
                        fast_path,
                        project_dir: project_dir.as_deref(),
                        global_commands: &settings.custom_commands,
                    },
                );
                for line in &lines {
                    session.send_text(line).await?;
                }

                Ok(SessionHandle::new(
                    &resolved.display_name,
                    &resolved.username,
                    &resolved.host,
                    forwarding.is_some(),
                    session,
                ))
            })
            .await?;

        let handle = Arc::clone(acquired.handle());
        handle.session().show().await?;

        Ok(SessionOutcome {
            handle,
            created: acquired.was_created(),
        })
    }

    /// Forget a session the UI shell closed
    pub async fn close(&self, id: SessionId) -> Option<Arc<SessionHandle>> {
        let removed = self.state.registry().remove(id).await?;
        self.state.log().append_line(&format!(
            "A terminal with a session for '{}' has been killed.",
            removed.host
        ));
        Some(removed)
    }

    pub fn registry(&self) -> &SessionRegistry {
        self.state.registry()
    }
}

fn not_started_line(label: &str) -> String {
    format!(
        "A terminal with a session for '{}' has been not started, because errors were found.",
        label
    )
}
