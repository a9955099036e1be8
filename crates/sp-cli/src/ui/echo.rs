//! Sessions that print instead of running
//!
//! Used by `--dry-run`: every line that would be typed into a terminal is
//! written to stdout, prefixed with the session title.

use async_trait::async_trait;
use std::sync::Arc;

use sp_core::traits::{SessionHost, TerminalSession};
use sp_core::types::SessionIdAllocator;
use sp_core::{SessionError, SessionId};

pub struct EchoSession {
    id: SessionId,
    title: String,
}

#[async_trait]
impl TerminalSession for EchoSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    async fn show(&self) -> Result<(), SessionError> {
        println!("[{}] (shown)", self.title);
        Ok(())
    }

    async fn send_text(&self, line: &str) -> Result<(), SessionError> {
        println!("[{}] {}", self.title, line);
        Ok(())
    }
}

#[derive(Default)]
pub struct EchoHost {
    ids: SessionIdAllocator,
}

impl EchoHost {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionHost for EchoHost {
    async fn create_session(&self, title: &str) -> Result<Arc<dyn TerminalSession>, SessionError> {
        Ok(Arc::new(EchoSession {
            id: self.ids.allocate(),
            title: title.to_string(),
        }))
    }
}
