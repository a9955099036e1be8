//! Where raw server definitions come from

use serde_json::Value;
use std::path::PathBuf;

use super::load_json;
use crate::error::ConfigError;

/// Raw server definitions plus any notes produced while gathering them
#[derive(Debug, Clone, Default)]
pub struct RawServers {
    /// Ordered sequence of host objects
    pub servers: Value,
    /// Human-readable notes for the diagnostic log
    pub messages: Vec<String>,
}

/// Supplies raw host definitions on demand
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<RawServers, ConfigError>;
}

/// Reads JSON server files in order and concatenates their arrays
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    paths: Vec<PathBuf>,
}

impl FileConfigSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<RawServers, ConfigError> {
        let mut servers = Vec::new();
        let mut messages = Vec::new();

        for path in &self.paths {
            match load_json(path) {
                Ok(Value::Array(items)) => {
                    messages.push(format!(
                        "Loaded {} server(s) from {}",
                        items.len(),
                        path.display()
                    ));
                    servers.extend(items);
                }
                Ok(_) => {
                    return Err(ConfigError::Malformed(format!(
                        "{}: expected an array of servers",
                        path.display()
                    )));
                }
                Err(ConfigError::NotFound(_)) => {
                    messages.push(format!("Config file not found: {}", path.display()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(RawServers {
            servers: Value::Array(servers),
            messages,
        })
    }
}
