//! Config command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sp_core::config::{self, ConfigSource, FileConfigSource, TomlSettingsStore};
use sp_core::traits::SettingsStore;

use crate::output::{print_info, print_warning};

/// Show where configuration is read from
pub fn config_path(settings: &Path, servers: &[PathBuf]) -> Result<()> {
    println!("{}", config::default_config_dir().display());
    print_info(&format!("Settings: {}", settings.display()));
    for path in servers {
        let note = if path.exists() { "" } else { " (missing)" };
        print_info(&format!("Servers: {}{}", path.display(), note));
    }
    Ok(())
}

/// Show the effective settings
pub fn config_show(settings: &Path) -> Result<()> {
    if !settings.exists() {
        print_warning(&format!("No settings file at {:?}, showing defaults", settings));
    }

    let store = TomlSettingsStore::open(settings)
        .with_context(|| format!("Failed to load settings: {:?}", settings))?;
    let content = toml::to_string_pretty(&store.settings())?;
    println!("{}", content);
    Ok(())
}

/// Show the merged server definitions
pub fn config_servers(servers: &[PathBuf]) -> Result<()> {
    let raw = FileConfigSource::new(servers.to_vec())
        .load()
        .context("Failed to load server files")?;

    for message in &raw.messages {
        print_info(message);
    }
    println!("{}", serde_json::to_string_pretty(&raw.servers)?);
    Ok(())
}
