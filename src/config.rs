//! TOML configuration.
//!
//! ```toml
//! [db]
//! path = "./data/recipes.sqlite"
//! backend = "sqlite"   # or "memory"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [logging]
//! filter = "recipe_manager=info,recipe_core=info,tower_http=info"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_backend() -> String {
    "sqlite".to_string()
}

impl DbConfig {
    pub fn is_memory(&self) -> bool {
        self.backend == "memory"
    }

    /// Fail for the memory backend, whose store starts empty in every
    /// process and so has nothing for a one-shot command to read.
    pub fn require_persistent(&self, command: &str) -> Result<()> {
        if self.is_memory() {
            anyhow::bail!(
                "`recipes {}` needs a persistent store; db.backend is \"memory\"",
                command
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "recipe_manager=info,recipe_core=info,tower_http=info".to_string()
}

impl Config {
    /// In-memory configuration that needs no file on disk.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/recipes.sqlite"),
                backend: "memory".to_string(),
            },
            server: ServerConfig {
                bind: "127.0.0.1:8080".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    match config.db.backend.as_str() {
        "sqlite" | "memory" => {}
        other => anyhow::bail!(
            "Unknown db backend: '{}'. Must be sqlite or memory.",
            other
        ),
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: Config = toml::from_str(
            r#"
[db]
path = "/tmp/recipes.sqlite"

[server]
bind = "127.0.0.1:0"
"#,
        )
        .unwrap();
        assert_eq!(config.db.backend, "sqlite");
        assert!(!config.db.is_memory());
        assert!(config.logging.filter.contains("recipe_manager"));
        validate(&config).unwrap();
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = Config::minimal();
        config.db.backend = "postgres".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown db backend"));
    }

    #[test]
    fn test_empty_bind_rejected() {
        let mut config = Config::minimal();
        config.server.bind = " ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_minimal_is_memory() {
        assert!(Config::minimal().db.is_memory());
    }

    #[test]
    fn test_require_persistent() {
        let mut config = Config::minimal();
        let err = config.db.require_persistent("search").unwrap_err();
        assert!(err.to_string().contains("recipes search"));

        config.db.backend = "sqlite".to_string();
        config.db.require_persistent("search").unwrap();
    }
}
