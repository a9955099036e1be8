//! Authentication strategy resolution
//!
//! The ssh utility does the actual handshake. This module only decides
//! which credential to lean on and which flags that implies:
//!
//! 1. `agent` set: rely on the running agent, no flag.
//! 2. otherwise `privateKey` set: `-i "<path>"`.
//! 3. otherwise: the password is typed into the session as its own line
//!    right after the ssh command. It never appears on the command line.
//!
//! The order is fixed; an agent wins even when a key is also configured.

use std::fmt;

use sp_core::config::ResolvedHost;

/// Port ssh uses when none is given
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Credential the session will authenticate with
#[derive(Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    UseAgent,
    UsePrivateKey(String),
    /// Password to type after the command, if one is configured
    UsePassword(Option<String>),
}

impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStrategy::UseAgent => write!(f, "UseAgent"),
            AuthStrategy::UsePrivateKey(path) => f.debug_tuple("UsePrivateKey").field(path).finish(),
            AuthStrategy::UsePassword(Some(_)) => write!(f, "UsePassword(<redacted>)"),
            AuthStrategy::UsePassword(None) => write!(f, "UsePassword(None)"),
        }
    }
}

/// Strategy plus the command-line flags it and the port require
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPlan {
    pub strategy: AuthStrategy,
    /// Fragments appended after `-l <user>`, in order
    pub flags: Vec<String>,
}

impl AuthPlan {
    /// Password line to inject after the ssh command
    pub fn password_line(&self) -> Option<&str> {
        match &self.strategy {
            AuthStrategy::UsePassword(password) => password.as_deref(),
            _ => None,
        }
    }
}

/// Derives an [`AuthPlan`] from a validated host
pub struct AuthResolver;

impl AuthResolver {
    pub fn resolve(host: &ResolvedHost) -> AuthPlan {
        let mut flags = Vec::new();

        // Zero is treated as unset, like a missing port
        if let Some(port) = host.port.filter(|p| *p != 0 && *p != DEFAULT_SSH_PORT) {
            flags.push(format!("-p {}", port));
        }

        let strategy = if host.use_agent {
            AuthStrategy::UseAgent
        } else if let Some(key) = &host.private_key_path {
            flags.push(format!("-i \"{}\"", key));
            AuthStrategy::UsePrivateKey(key.clone())
        } else {
            AuthStrategy::UsePassword(host.password.clone())
        };

        AuthPlan { strategy, flags }
    }
}
