use crate::store::{FileStore, KvStore, MemoryStore};
use std::{env, path::PathBuf, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT '{0}': must be a number between 1 and 65535")]
    InvalidPort(String),

    #[error("invalid APP_STORE '{0}': expected 'file' or 'memory'")]
    InvalidStore(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreKind,
    pub secure_cookies: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            store: StoreKind::File(PathBuf::from("data/store.json")),
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source, so tests need not touch
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            config.port = match value.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(value)),
            };
        }

        let data_path = lookup("APP_DATA_PATH").map(PathBuf::from);
        config.store = match lookup("APP_STORE").as_deref() {
            None | Some("file") => {
                StoreKind::File(data_path.unwrap_or_else(|| PathBuf::from("data/store.json")))
            }
            Some("memory") => StoreKind::Memory,
            Some(other) => return Err(ConfigError::InvalidStore(other.to_string())),
        };

        config.secure_cookies = lookup("COOKIE_SECURE")
            .is_some_and(|value| matches!(value.as_str(), "1" | "true"));

        Ok(config)
    }

    pub fn build_store(&self) -> Arc<dyn KvStore> {
        match &self.store {
            StoreKind::File(path) => Arc::new(FileStore::new(path.clone())),
            StoreKind::Memory => Arc::new(MemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::File(PathBuf::from("data/store.json")));
        assert!(!config.secure_cookies);
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("APP_STORE", "file"),
            ("APP_DATA_PATH", "/tmp/jar.json"),
            ("COOKIE_SECURE", "true"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.store, StoreKind::File(PathBuf::from("/tmp/jar.json")));
        assert!(config.secure_cookies);

        let config = config_from(&[("APP_STORE", "memory")]).unwrap();
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("PORT", "0")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config_from(&[("APP_STORE", "redis")]),
            Err(ConfigError::InvalidStore(_))
        ));
    }
}
