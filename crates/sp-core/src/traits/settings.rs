//! Settings store trait

use crate::config::Settings;
use crate::error::ConfigError;
use crate::types::ForwardingSpec;

/// Process-level settings storage
pub trait SettingsStore: Send + Sync {
    /// Current settings snapshot
    fn settings(&self) -> Settings;

    /// Replace the persisted recency cache
    fn save_recent_forwardings(&self, recent: &[ForwardingSpec]) -> Result<(), ConfigError>;
}
