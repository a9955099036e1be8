//! Session traits

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SessionError;
use crate::types::SessionId;

/// One interactive shell hosted by the UI
#[async_trait]
pub trait TerminalSession: Send + Sync {
    /// Identity reported again in the session-closed notification
    fn id(&self) -> SessionId;

    /// Title the session was created with
    fn title(&self) -> &str;

    /// Bring the session to the foreground
    async fn show(&self) -> Result<(), SessionError>;

    /// Inject one line of input, as if typed and followed by Enter
    async fn send_text(&self, line: &str) -> Result<(), SessionError>;
}

/// Creates sessions on behalf of the orchestrator
#[async_trait]
pub trait SessionHost: Send + Sync {
    /// Create a new, empty session with the given title.
    ///
    /// The host owns the session's lifetime and reports its closing
    /// separately; the returned handle is only a reference to it.
    async fn create_session(&self, title: &str) -> Result<Arc<dyn TerminalSession>, SessionError>;
}
