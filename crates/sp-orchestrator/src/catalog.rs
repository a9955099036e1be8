//! Catalog of configured servers

use serde::Deserialize;
use serde_json::Value;

use sp_core::config::HostConfig;
use sp_core::ConfigError;

/// A configured server as listed in pickers
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEntry {
    /// Unique label within the catalog
    pub display_name: String,
    pub config: HostConfig,
}

/// Ordered servers, unique by display name.
///
/// A reload replaces every entry; nothing from the previous load survives,
/// including after a failed reload.
#[derive(Debug, Clone, Default)]
pub struct ServerCatalog {
    entries: Vec<ServerEntry>,
    show_hosts: bool,
}

impl ServerCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty catalog that labels entries `username@host`
    pub fn with_host_labels(show_hosts: bool) -> Self {
        Self {
            entries: Vec::new(),
            show_hosts,
        }
    }

    /// Replace the catalog with the given raw server definitions.
    ///
    /// Entries missing `host` or `username` are kept; they only fail when
    /// connected to. Only input that is not an array of objects is an
    /// error, and it leaves the catalog empty.
    pub fn reload(&mut self, raw: &Value) -> Result<(), ConfigError> {
        self.entries.clear();

        let items = raw
            .as_array()
            .ok_or_else(|| ConfigError::Malformed("expected an array of servers".to_string()))?;

        let mut entries: Vec<ServerEntry> = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if !item.is_object() {
                return Err(ConfigError::Malformed(format!(
                    "server #{} is not an object",
                    position + 1
                )));
            }

            // Only a key repeated under two aliases gets here
            let config = match HostConfig::deserialize(item) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Skipping server #{}: {}", position + 1, e);
                    continue;
                }
            };

            let display_name = config.display_name(self.show_hosts, position);
            if entries.iter().any(|e| e.display_name == display_name) {
                tracing::warn!(
                    "Skipping server #{}: duplicate name '{}'",
                    position + 1,
                    display_name
                );
                continue;
            }

            entries.push(ServerEntry {
                display_name,
                config,
            });
        }

        tracing::debug!("Catalog reloaded with {} server(s)", entries.len());
        self.entries = entries;
        Ok(())
    }

    /// Find a server by display name
    pub fn find(&self, display_name: &str) -> Option<&ServerEntry> {
        self.entries.iter().find(|e| e.display_name == display_name)
    }

    /// Display names in catalog order
    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.display_name.clone()).collect()
    }

    /// Entries in catalog order
    pub fn entries(&self) -> &[ServerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reload_and_find() {
        let mut catalog = ServerCatalog::new();
        catalog
            .reload(&json!([
                {"name": "alpha", "host": "a.example.com", "username": "me"},
                {"name": "beta", "host": "b.example.com", "username": "me"}
            ]))
            .unwrap();

        assert_eq!(catalog.list(), vec!["alpha", "beta"]);
        assert_eq!(
            catalog.find("beta").unwrap().config.host.as_deref(),
            Some("b.example.com")
        );
        assert!(catalog.find("gamma").is_none());
    }

    #[test]
    fn test_reload_empty_clears() {
        let mut catalog = ServerCatalog::new();
        catalog.reload(&json!([{"name": "alpha"}])).unwrap();
        catalog.reload(&json!([])).unwrap();
        assert!(catalog.find("alpha").is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_incomplete_entries_are_kept() {
        let mut catalog = ServerCatalog::new();
        catalog.reload(&json!([{"name": "alpha"}])).unwrap();
        assert!(catalog.find("alpha").is_some());
    }

    #[test]
    fn test_malformed_input_clears_catalog() {
        let mut catalog = ServerCatalog::new();
        catalog.reload(&json!([{"name": "alpha"}])).unwrap();

        let result = catalog.reload(&json!({"name": "alpha"}));
        assert!(matches!(result, Err(ConfigError::Malformed(_))));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_non_object_item_is_malformed() {
        let mut catalog = ServerCatalog::new();
        let result = catalog.reload(&json!([{"name": "alpha"}, "beta"]));
        assert!(matches!(result, Err(ConfigError::Malformed(_))));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_loosely_typed_fields_keep_every_entry() {
        let mut catalog = ServerCatalog::new();
        catalog
            .reload(&json!([
                {"name": "alpha", "host": "a", "username": "me"},
                {"name": "beta", "host": "b", "username": "me", "agent": 1},
                {"name": "gamma", "host": "g", "username": "me", "customCommands": "ls"}
            ]))
            .unwrap();

        assert_eq!(catalog.list(), vec!["alpha", "beta", "gamma"]);
        assert_eq!(catalog.find("beta").unwrap().config.use_agent, Some(true));
        assert_eq!(
            catalog.find("gamma").unwrap().config.startup_commands,
            Some(vec!["ls".to_string()])
        );
    }

    #[test]
    fn test_unreadable_entry_is_skipped() {
        let mut catalog = ServerCatalog::new();
        catalog
            .reload(&json!([
                {"name": "alpha", "host": "a", "username": "me"},
                {"name": "beta", "agent": true, "useAgent": false}
            ]))
            .unwrap();

        assert_eq!(catalog.list(), vec!["alpha"]);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let mut catalog = ServerCatalog::new();
        catalog
            .reload(&json!([
                {"name": "alpha", "host": "first"},
                {"name": "alpha", "host": "second"}
            ]))
            .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.find("alpha").unwrap().config.host.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_host_labels() {
        let mut catalog = ServerCatalog::with_host_labels(true);
        catalog
            .reload(&json!([{"name": "alpha", "host": "h", "username": "u"}]))
            .unwrap();
        assert_eq!(catalog.list(), vec!["u@h"]);
    }
}
