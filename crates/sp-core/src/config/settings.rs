//! User settings and their stores

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{load_config, save_config};
use crate::error::ConfigError;
use crate::traits::SettingsStore;
use crate::types::ForwardingSpec;

/// Process-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Open a fresh session on every non-forwarding connect
    pub allow_multiple_connections: bool,

    /// `cd` into the project or configured path after login
    pub open_project_catalog: bool,

    /// Commands for hosts that define none of their own
    pub custom_commands: Vec<String>,

    /// Label servers as `username@host` in pickers
    pub show_hosts_in_pick_lists: bool,

    /// Forwardings the user chose to keep
    pub recently_used_forwardings: Vec<ForwardingSpec>,
}

/// Settings backed by a TOML file
pub struct TomlSettingsStore {
    path: PathBuf,
    current: RwLock<Settings>,
}

impl TomlSettingsStore {
    /// Open the store, falling back to defaults when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let current = match load_config::<Settings>(&path) {
            Ok(settings) => settings,
            Err(ConfigError::NotFound(_)) => {
                tracing::debug!("No settings at {:?}, using defaults", path);
                Settings::default()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    fn settings(&self) -> Settings {
        self.current.read().clone()
    }

    fn save_recent_forwardings(&self, recent: &[ForwardingSpec]) -> Result<(), ConfigError> {
        let mut current = self.current.write();
        // Start from the file so edits made since opening are kept
        let mut updated = match load_config::<Settings>(&self.path) {
            Ok(on_disk) => on_disk,
            Err(ConfigError::NotFound(_)) => current.clone(),
            Err(e) => return Err(e),
        };
        updated.recently_used_forwardings = recent.to_vec();
        save_config(&self.path, &updated)?;
        *current = updated;
        Ok(())
    }
}

/// Settings held in memory only
#[derive(Default)]
pub struct MemorySettingsStore {
    current: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: RwLock::new(settings),
        }
    }

    /// Apply an in-place change
    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.current.write());
    }
}

impl SettingsStore for MemorySettingsStore {
    fn settings(&self) -> Settings {
        self.current.read().clone()
    }

    fn save_recent_forwardings(&self, recent: &[ForwardingSpec]) -> Result<(), ConfigError> {
        self.current.write().recently_used_forwardings = recent.to_vec();
        Ok(())
    }
}
