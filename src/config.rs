use crate::error::CuratorError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Global static variable to hold the config provider.
pub static CONFIG_PROVIDER: OnceCell<Mutex<Arc<dyn ConsoleConfigProvider>>> = OnceCell::new();

/// Session settings for the admin console. `api_base` is where the (external)
/// transport caller targets `PATCH /api/{kind}/{id}`; `page_size` is the default
/// list page length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub api_base: String,
    pub page_size: u32,
}

impl Default for ConsoleConfig {
    fn default() -> ConsoleConfig {
        ConsoleConfig {
            api_base: "/api".to_string(),
            page_size: 20,
        }
    }
}

pub trait ConsoleConfigProvider: Send + Sync {
    fn get_console(&self) -> Result<ConsoleConfig, CuratorError>;
    fn set_console(&self, config: ConsoleConfig) -> Result<(), CuratorError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }
}

impl ConsoleConfigProvider for TomlConfigProvider {
    fn get_console(&self) -> Result<ConsoleConfig, CuratorError> {
        tracing::debug!("Attempting to read console config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, returning defaults.");
            return Ok(ConsoleConfig::default());
        }
        let content = read_to_string(&self.path)?;
        let config: BTreeMap<String, ConsoleConfig> = toml::from_str(&content)?;
        config
            .get("console")
            .cloned()
            .ok_or_else(|| CuratorError::NotFound("console not found in config".to_string()))
    }

    fn set_console(&self, console: ConsoleConfig) -> Result<(), CuratorError> {
        tracing::debug!("Attempting to write console config to: {:?}", &self.path);
        let mut config = BTreeMap::new();
        config.insert("console".to_string(), console);
        let toml_string = toml::to_string(&config)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}

pub fn get_content<P: AsRef<Path>>(path: P) -> Result<String, CuratorError> {
    tracing::debug!("Reading {:?}", path.as_ref());
    Ok(read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn toml_provider_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let provider = TomlConfigProvider::new(dir.path().join("curator.toml"));

        // Missing file reads back as defaults.
        assert_eq!(provider.get_console().unwrap(), ConsoleConfig::default());

        let config = ConsoleConfig {
            api_base: "https://archive.local/api".to_string(),
            page_size: 50,
        };
        provider.set_console(config.clone()).unwrap();
        assert_eq!(provider.get_console().unwrap(), config);
    }
}
