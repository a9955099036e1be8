//! Shared orchestrator state
//!
//! One instance is shared by every command. The catalog is swapped whole on
//! reload; readers keep the snapshot they started with.

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use sp_core::traits::SettingsStore;
use sp_core::{ConfigError, LogSink, TimestampedLog};

use crate::catalog::ServerCatalog;
use crate::mapper::ProjectPathMapper;
use crate::session::SessionRegistry;

/// Server owning the active file, offered for one-step connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastOpenTarget {
    pub server: String,
    pub remote_dir: String,
}

impl FastOpenTarget {
    /// Indicator text for the UI
    pub fn label(&self) -> String {
        format!("Open SSH on {}", self.server)
    }
}

pub struct OrchestratorState {
    catalog: RwLock<Arc<ServerCatalog>>,
    registry: SessionRegistry,
    settings: Arc<dyn SettingsStore>,
    log: Arc<dyn LogSink>,
    active_file: RwLock<Option<String>>,
    fast_open: RwLock<Option<FastOpenTarget>>,
}

impl OrchestratorState {
    /// Create state with an empty catalog.
    ///
    /// Lines written to `log` are timestamped.
    pub fn new(settings: Arc<dyn SettingsStore>, log: Arc<dyn LogSink>) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(ServerCatalog::new())),
            registry: SessionRegistry::new(),
            settings,
            log: Arc::new(TimestampedLog::new(log)),
            active_file: RwLock::new(None),
            fast_open: RwLock::new(None),
        }
    }

    /// Current catalog snapshot
    pub fn catalog(&self) -> Arc<ServerCatalog> {
        Arc::clone(&self.catalog.read())
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }

    /// Timestamped diagnostic log
    pub fn log(&self) -> &Arc<dyn LogSink> {
        &self.log
    }

    /// Rebuild the catalog from raw server definitions.
    ///
    /// The new catalog replaces the old one even when parsing fails, in
    /// which case it is empty. Returns the number of servers loaded.
    pub fn reload_catalog(&self, raw: &Value) -> Result<usize, ConfigError> {
        let show_hosts = self.settings.settings().show_hosts_in_pick_lists;
        let mut catalog = ServerCatalog::with_host_labels(show_hosts);
        let result = catalog.reload(raw).map(|()| catalog.len());

        *self.catalog.write() = Arc::new(catalog);
        self.refresh_fast_open();
        result
    }

    /// Drop every server
    pub fn clear_catalog(&self) {
        *self.catalog.write() = Arc::new(ServerCatalog::new());
        self.refresh_fast_open();
    }

    /// Record the file the user is editing and re-resolve the fast-open target
    pub fn set_active_file(&self, path: Option<&str>) -> Option<FastOpenTarget> {
        *self.active_file.write() = path.map(String::from);
        self.refresh_fast_open()
    }

    pub fn active_file(&self) -> Option<String> {
        self.active_file.read().clone()
    }

    pub fn fast_open_target(&self) -> Option<FastOpenTarget> {
        self.fast_open.read().clone()
    }

    fn refresh_fast_open(&self) -> Option<FastOpenTarget> {
        let catalog = self.catalog();
        let target = self.active_file.read().as_deref().and_then(|path| {
            ProjectPathMapper::new(&catalog)
                .resolve(path)
                .map(|found| FastOpenTarget {
                    server: found.entry.display_name.clone(),
                    remote_dir: found.remote_dir.to_string(),
                })
        });

        match &target {
            Some(t) => tracing::debug!("Fast open target: {} ({})", t.server, t.remote_dir),
            None => tracing::trace!("No fast open target"),
        }

        *self.fast_open.write() = target.clone();
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sp_core::config::MemorySettingsStore;
    use sp_core::MemoryLog;

    fn state() -> (OrchestratorState, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        let state = OrchestratorState::new(Arc::new(MemorySettingsStore::default()), log.clone());
        (state, log)
    }

    #[test]
    fn test_failed_reload_leaves_catalog_empty() {
        let (state, _) = state();
        state
            .reload_catalog(&json!([{"name": "alpha", "host": "h", "username": "u"}]))
            .unwrap();
        assert_eq!(state.catalog().len(), 1);

        assert!(state.reload_catalog(&json!({"name": "alpha"})).is_err());
        assert!(state.catalog().find("alpha").is_none());
    }

    #[test]
    fn test_fast_open_follows_active_file_and_reload() {
        let (state, _) = state();
        state
            .reload_catalog(&json!([
                {"name": "alpha", "host": "h", "username": "u", "project": {"/work/alpha": "/srv/alpha"}}
            ]))
            .unwrap();

        let target = state.set_active_file(Some("/work/alpha/src/main.rs")).unwrap();
        assert_eq!(target.server, "alpha");
        assert_eq!(target.remote_dir, "/srv/alpha");
        assert_eq!(target.label(), "Open SSH on alpha");

        state.reload_catalog(&json!([])).unwrap();
        assert!(state.fast_open_target().is_none());

        assert!(state.set_active_file(None).is_none());
    }

    #[test]
    fn test_host_labels_follow_settings() {
        let settings = MemorySettingsStore::default();
        settings.update(|s| s.show_hosts_in_pick_lists = true);
        let state = OrchestratorState::new(Arc::new(settings), Arc::new(MemoryLog::new()));

        state
            .reload_catalog(&json!([{"name": "alpha", "host": "h", "username": "u"}]))
            .unwrap();
        assert_eq!(state.catalog().list(), vec!["u@h"]);
    }

    #[test]
    fn test_log_lines_are_timestamped() {
        let (state, log) = state();
        state.log().append_line("hello");
        let line = &log.lines()[0];
        assert!(line.starts_with('['));
        assert!(line.ends_with("] hello"));
    }
}
