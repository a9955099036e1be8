//! Port forwarding
//!
//! Three tunnel kinds are offered, mirroring the ssh flags they map to.
//! Local and remote forwards take two addresses, SOCKS takes one.

mod address;
mod wizard;

pub use address::validate_address;
pub use wizard::{ForwardingWizard, WizardOutcome};

use sp_core::ForwardingSpec;

/// Pick-list entry that selects a cached spec verbatim
pub const RECENTLY_USED_LABEL: &str = "Recently used";

/// Tunnel kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardingKind {
    LocalToRemote,
    RemoteToLocal,
    Socks,
}

impl ForwardingKind {
    /// Kinds in pick-list order
    pub const ALL: [ForwardingKind; 3] = [
        ForwardingKind::LocalToRemote,
        ForwardingKind::RemoteToLocal,
        ForwardingKind::Socks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ForwardingKind::LocalToRemote => "Local to remote",
            ForwardingKind::RemoteToLocal => "Remote to local",
            ForwardingKind::Socks => "SOCKS",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// ssh flag
    pub fn option(self) -> &'static str {
        match self {
            ForwardingKind::LocalToRemote => "-L",
            ForwardingKind::RemoteToLocal => "-R",
            ForwardingKind::Socks => "-D",
        }
    }

    pub fn first_prompt(self) -> &'static str {
        match self {
            ForwardingKind::LocalToRemote => "Type local address/port (e. g. localhost:9000 or 9000)",
            ForwardingKind::RemoteToLocal => "Type remote address/port (e. g. localhost:9000 or 9000)",
            ForwardingKind::Socks => "Type address for SOCKS (e. g. localhost:9000)",
        }
    }

    /// `None` for single-address kinds
    pub fn second_prompt(self) -> Option<&'static str> {
        match self {
            ForwardingKind::LocalToRemote => Some("Type remote address (e. g. localhost:9000)"),
            ForwardingKind::RemoteToLocal => Some("Type local address (e. g. localhost:9000)"),
            ForwardingKind::Socks => None,
        }
    }

    pub fn first_domain_required(self) -> bool {
        matches!(self, ForwardingKind::Socks)
    }

    pub fn second_domain_required(self) -> bool {
        true
    }
}

/// `"<option> <first>[:<second>]"`
pub fn build_spec(kind: ForwardingKind, first: &str, second: Option<&str>) -> ForwardingSpec {
    match second {
        Some(second) => ForwardingSpec::new(format!("{} {}:{}", kind.option(), first, second)),
        None => ForwardingSpec::new(format!("{} {}", kind.option(), first)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_local_to_remote() {
        let spec = build_spec(
            ForwardingKind::LocalToRemote,
            "localhost:9000",
            Some("localhost:9001"),
        );
        assert_eq!(spec.as_str(), "-L localhost:9000:localhost:9001");
    }

    #[test]
    fn test_build_socks() {
        let spec = build_spec(ForwardingKind::Socks, "localhost:1080", None);
        assert_eq!(spec.as_str(), "-D localhost:1080");
    }

    #[test]
    fn test_labels_round_trip() {
        for kind in ForwardingKind::ALL {
            assert_eq!(ForwardingKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(ForwardingKind::from_label(RECENTLY_USED_LABEL), None);
    }

    #[test]
    fn test_socks_has_single_address() {
        assert!(ForwardingKind::Socks.second_prompt().is_none());
        assert!(ForwardingKind::Socks.first_domain_required());
        assert!(!ForwardingKind::LocalToRemote.first_domain_required());
    }
}
