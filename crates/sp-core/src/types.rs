//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifier the UI shell assigns to one interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl SessionId {
    /// Create a new session ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

impl From<u32> for SessionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Hands out increasing session IDs, starting at 1
#[derive(Debug)]
pub struct SessionIdAllocator {
    next: AtomicU32,
}

impl SessionIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    pub fn allocate(&self) -> SessionId {
        SessionId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SessionIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reuse key for a session: the server's display name and whether it carries a tunnel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub server: String,
    pub forwarding: bool,
}

impl SessionKey {
    pub fn new(server: impl Into<String>, forwarding: bool) -> Self {
        Self {
            server: server.into(),
            forwarding,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.forwarding {
            write!(f, "{} (Forwarding)", self.server)
        } else {
            write!(f, "{}", self.server)
        }
    }
}

/// A resolved tunnel fragment such as `-L 9000:localhost:9000`.
///
/// Opaque text; two specs are the same forwarding only if their strings match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForwardingSpec(String);

impl ForwardingSpec {
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ForwardingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ForwardingSpec {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ForwardingSpec {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_display() {
        let id = SessionId::new(42);
        assert_eq!(format!("{}", id), "session-42");
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let alloc = SessionIdAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!(a, SessionId(1));
        assert!(b > a);
    }

    #[test]
    fn test_session_key_title() {
        assert_eq!(SessionKey::new("alpha", false).to_string(), "alpha");
        assert_eq!(
            SessionKey::new("alpha", true).to_string(),
            "alpha (Forwarding)"
        );
    }

    #[test]
    fn test_forwarding_spec_serializes_as_string() {
        let spec = ForwardingSpec::new("-D localhost:1080");
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#""-D localhost:1080""#);
        let back: ForwardingSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
