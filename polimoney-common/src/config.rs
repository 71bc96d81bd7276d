//! Configuration loading and database path resolution

use crate::db::{max_rows_per_statement, DISTRICT_INSERT_COLUMNS};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the SQLite database file
pub const DATABASE_ENV_VAR: &str = "POLIMONEY_DATABASE";

/// Rows per page when reading the municipality registry
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Rows per insert call for batched writes
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Largest batch whose district insert stays within SQLite's bound-parameter limit
pub const MAX_BATCH_SIZE: usize = max_rows_per_statement(DISTRICT_INSERT_COLUMNS);

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Database file location
    pub database_path: Option<PathBuf>,

    /// Master-data tuning
    #[serde(default)]
    pub master: MasterSettings,
}

/// Page and batch sizes used by the master-data engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MasterSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for MasterSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl MasterSettings {
    /// Apply command-line overrides on top of file/default values
    pub fn with_overrides(self, page_size: Option<usize>, batch_size: Option<usize>) -> Self {
        Self {
            page_size: page_size.unwrap_or(self.page_size),
            batch_size: batch_size.unwrap_or(self.batch_size),
        }
    }

    /// Reject zero sizes and batches larger than one insert statement can bind
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidInput("page_size must be greater than 0".to_string()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidInput("batch_size must be greater than 0".to_string()));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(Error::InvalidInput(format!(
                "batch_size {} exceeds the maximum of {}",
                self.batch_size, MAX_BATCH_SIZE
            )));
        }
        Ok(())
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Locate the platform config file, if one exists
///
/// Checks `<config_dir>/polimoney/config.toml` first, then
/// `/etc/polimoney/config.toml` on Linux.
pub fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("polimoney").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/polimoney/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load the platform config file, falling back to defaults
///
/// A missing file is normal. A file that fails to parse is logged and
/// ignored so that CLI/env configuration can still take effect.
pub fn load_default_config() -> TomlConfig {
    let Some(path) = find_config_file() else {
        debug!("No config.toml found, using defaults");
        return TomlConfig::default();
    };

    match load_toml_config(&path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Resolve the database path in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable `POLIMONEY_DATABASE`
/// 3. `database_path` in the TOML config file
///
/// There is no compiled default. A missing destination is a setup error.
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    Err(Error::Config(format!(
        "No database configured: pass --database, set {} or add database_path to config.toml",
        DATABASE_ENV_VAR
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_settings_defaults() {
        let settings = MasterSettings::default();
        assert_eq!(settings.page_size, 1000);
        assert_eq!(settings.batch_size, 500);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let settings = MasterSettings::default().with_overrides(None, Some(50));
        assert_eq!(settings.page_size, 1000);
        assert_eq!(settings.batch_size, 50);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let settings = MasterSettings::default().with_overrides(Some(0), None);
        assert!(matches!(settings.validate(), Err(Error::InvalidInput(_))));

        let settings = MasterSettings::default().with_overrides(None, Some(0));
        assert!(matches!(settings.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_batch_size_capped_by_statement_limit() {
        assert_eq!(MAX_BATCH_SIZE, 4680);

        let settings = MasterSettings::default().with_overrides(None, Some(MAX_BATCH_SIZE));
        assert!(settings.validate().is_ok());

        let settings = MasterSettings::default().with_overrides(None, Some(MAX_BATCH_SIZE + 1));
        assert!(matches!(settings.validate(), Err(Error::InvalidInput(_))));

        let settings = MasterSettings::default().with_overrides(None, Some(5000));
        assert!(matches!(settings.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_partial_master_section_uses_defaults() {
        let config: TomlConfig = toml::from_str("[master]\npage_size = 250\n").unwrap();
        assert_eq!(config.master.page_size, 250);
        assert_eq!(config.master.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.database_path.is_none());
    }
}
