//! Remote host definitions

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::serde_utils::{
    lenient_bool, lenient_nested, lenient_port, lenient_string, lenient_string_list,
};
use crate::error::ConnectError;

/// One configured remote target, as written in a server file.
///
/// Every field is optional at parse time. Use [`HostConfig::resolve`] to
/// check the required ones before opening a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Display name used in pickers
    #[serde(default, with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Login user
    #[serde(default, with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Hostname or address
    #[serde(default, with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(
        default,
        with = "lenient_port",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<u16>,

    /// Identity file handed to ssh with `-i`
    #[serde(
        default,
        rename = "privateKey",
        alias = "privateKeyPath",
        with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_key_path: Option<String>,

    /// Authenticate through a running ssh-agent
    #[serde(
        default,
        rename = "agent",
        alias = "useAgent",
        with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_agent: Option<bool>,

    #[serde(default, with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Local path prefix to remote project directory
    #[serde(
        default,
        rename = "project",
        alias = "projectMap",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_map: Option<ProjectMap>,

    /// Remote directory to `cd` into after login
    #[serde(default, with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Commands run once the session is up
    #[serde(
        default,
        rename = "customCommands",
        alias = "startupCommands",
        with = "lenient_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub startup_commands: Option<Vec<String>>,

    /// Probe sent before the ssh command
    #[serde(
        default,
        rename = "portKnocking",
        alias = "portKnock",
        with = "lenient_nested",
        skip_serializing_if = "Option::is_none"
    )]
    pub port_knock: Option<PortKnock>,
}

/// Port knocking details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortKnock {
    /// Host to knock on; the ssh host when absent
    #[serde(
        default,
        alias = "knockHost",
        with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub host: Option<String>,

    #[serde(
        default,
        alias = "knockPort",
        with = "lenient_port",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<u16>,
}

/// One `local prefix -> remote dir` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMapping {
    pub local_prefix: String,
    pub remote_dir: String,
}

/// Ordered project map. Order is the order keys appear in the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMap(Vec<ProjectMapping>);

impl ProjectMap {
    pub fn new(entries: Vec<ProjectMapping>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectMapping> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>, R: Into<String>> FromIterator<(L, R)> for ProjectMap {
    fn from_iter<I: IntoIterator<Item = (L, R)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(l, r)| ProjectMapping {
                    local_prefix: l.into(),
                    remote_dir: r.into(),
                })
                .collect(),
        )
    }
}

impl Serialize for ProjectMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.local_prefix, &entry.remote_dir)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProjectMap {
    /// Keeps string-to-string pairs in file order. Pairs with a non-string
    /// remote dir are dropped; a value that is not an object reads as empty.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = match Value::deserialize(deserializer)? {
            Value::Object(map) => map
                .into_iter()
                .filter_map(|(local_prefix, remote)| match remote {
                    Value::String(remote_dir) => Some(ProjectMapping {
                        local_prefix,
                        remote_dir,
                    }),
                    _ => {
                        tracing::warn!("Ignoring project mapping for {:?}", local_prefix);
                        None
                    }
                })
                .collect(),
            other => {
                tracing::warn!("Ignoring project map that is not an object: {}", other);
                Vec::new()
            }
        };
        Ok(ProjectMap(entries))
    }
}

/// Validated host, ready to build a command from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHost {
    pub display_name: String,
    pub username: String,
    pub host: String,
    pub port: Option<u16>,
    pub private_key_path: Option<String>,
    pub use_agent: bool,
    pub password: Option<String>,
    pub path: Option<String>,
    pub startup_commands: Vec<String>,
    pub port_knock: Option<ResolvedKnock>,
}

/// Knock target with the host fallback applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKnock {
    pub host: String,
    pub port: u16,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl HostConfig {
    /// Label shown in pickers.
    ///
    /// `username@host` when `show_hosts` is set (and both are known), the
    /// configured name otherwise, falling back to `username@host`, then the
    /// bare host, then `server-<position + 1>`.
    pub fn display_name(&self, show_hosts: bool, position: usize) -> String {
        let user_at_host = match (present(&self.username), present(&self.host)) {
            (Some(user), Some(host)) => Some(format!("{}@{}", user, host)),
            _ => None,
        };

        if show_hosts {
            if let Some(label) = &user_at_host {
                return label.clone();
            }
        }

        present(&self.name)
            .map(str::to_string)
            .or(user_at_host)
            .or_else(|| present(&self.host).map(str::to_string))
            .unwrap_or_else(|| format!("server-{}", position + 1))
    }

    /// Check required fields and produce a fully-populated host.
    pub fn resolve(&self, display_name: &str) -> Result<ResolvedHost, ConnectError> {
        let (username, host) = match (present(&self.username), present(&self.host)) {
            (Some(u), Some(h)) => (u.to_string(), h.to_string()),
            (u, h) => {
                let missing = match (u.is_none(), h.is_none()) {
                    (true, true) => "host and username",
                    (false, true) => "host",
                    _ => "username",
                };
                return Err(ConnectError::IncompleteConfig {
                    server: display_name.to_string(),
                    missing: missing.to_string(),
                });
            }
        };

        let port_knock = self.port_knock.as_ref().and_then(|knock| match knock.port {
            Some(port) if port > 0 => Some(ResolvedKnock {
                host: present(&knock.host).unwrap_or(&host).to_string(),
                port,
            }),
            _ => None,
        });

        Ok(ResolvedHost {
            display_name: display_name.to_string(),
            username,
            host,
            port: self.port,
            private_key_path: present(&self.private_key_path).map(str::to_string),
            use_agent: self.use_agent.unwrap_or(false),
            password: self.password.clone(),
            path: self.path.clone(),
            startup_commands: self.startup_commands.clone().unwrap_or_default(),
            port_knock,
        })
    }
}
