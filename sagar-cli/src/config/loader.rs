use super::types::SagarConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<SagarConfig> {
        let mut raw = Table::new();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        Self::finalize(raw)
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sagar").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with SAGAR_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("SAGAR_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".sagar/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<Table> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Merge two raw configs. Tables merge key by key; any other overlay
    /// value (including arrays) replaces the base value.
    fn merge_raw(mut base: Table, overlay: Table) -> Table {
        for (key, value) in overlay {
            let merged = match (base.remove(&key), value) {
                (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                    Value::Table(Self::merge_raw(base_table, overlay_table))
                }
                (_, value) => value,
            };
            base.insert(key, merged);
        }
        base
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: Table) -> Result<SagarConfig> {
        let config: SagarConfig = Value::Table(raw)
            .try_into()
            .context("invalid configuration")?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Load config from a specific path (for testing)
    #[cfg(test)]
    pub fn load_from_path(path: &Path) -> Result<SagarConfig> {
        if path.exists() {
            Self::finalize(Self::read_raw(path)?)
        } else {
            Ok(SagarConfig::default())
        }
    }
}
