//! Configuration file management.
//!
//! `config.toml` lives in the data directory. Every key has a default, so a
//! missing file or section yields a working (read-only) daemon.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cap_types::EmissionFactors;

/// Overrides the data directory and the config file location.
pub const DATA_DIR_ENV: &str = "CAP_DATA_DIR";
/// Overrides `auth.admin_secret`.
pub const ADMIN_SECRET_ENV: &str = "CAP_ADMIN_SECRET";

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Factor table handed to the calculator.
    #[serde(default)]
    pub emission_factors: EmissionFactors,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    /// City master table file name, relative to the data directory.
    #[serde(default = "default_master_file")]
    pub master_file: String,
    /// Inventory table file name, relative to the data directory.
    #[serde(default = "default_inventory_file")]
    pub inventory_file: String,
}

/// Admin authentication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared admin secret. Empty = no session can authenticate.
    #[serde(default)]
    pub admin_secret: String,
}

/// Report delivery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Also write every generated report here. Empty = reply only.
    #[serde(default)]
    pub output_dir: String,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_master_file() -> String {
    cap_store::DEFAULT_MASTER_FILE.to_string()
}

fn default_inventory_file() -> String {
    cap_store::DEFAULT_INVENTORY_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            master_file: default_master_file(),
            inventory_file: default_inventory_file(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location, then apply
    /// environment overrides and validate.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(secret) = std::env::var(ADMIN_SECRET_ENV) {
            config.auth.admin_secret = secret;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse `path`, or return defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DaemonConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject a factor table the calculator cannot use.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.emission_factors.validate()?;
        if self.storage.master_file == self.storage.inventory_file {
            anyhow::bail!(
                "storage.master_file and storage.inventory_file are both '{}'",
                self.storage.master_file
            );
        }
        Ok(())
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Directory reports are copied into, if configured.
    pub fn report_dir(&self) -> Option<PathBuf> {
        if self.reports.output_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.reports.output_dir))
        }
    }

    /// Default filter directive for the log subscriber.
    pub fn log_directive(&self) -> String {
        format!("cap={}", self.advanced.log_level)
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/CapTracker")
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs_fallback(".cap-tracker")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/cap-tracker"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.storage.master_file, "cities.csv");
        assert_eq!(config.storage.inventory_file, "cap_inventory.csv");
        assert!(config.auth.admin_secret.is_empty());
        assert_eq!(config.emission_factors, EmissionFactors::default());
        assert_eq!(config.report_dir(), None);
        assert_eq!(config.log_directive(), "cap=info");
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn test_config_serialization() {
        let config = DaemonConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let parsed: DaemonConfig = toml::from_str(&toml_str).expect("parse");
        assert_eq!(parsed.emission_factors, config.emission_factors);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: DaemonConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/srv/cap"

            [emission_factors]
            electricity = 0.71

            [reports]
            output_dir = "/srv/cap/reports"
            "#,
        )
        .expect("parse");
        assert_eq!(parsed.data_dir(), PathBuf::from("/srv/cap"));
        assert_eq!(parsed.storage.master_file, "cities.csv");
        assert_eq!(parsed.emission_factors.electricity, 0.71);
        assert_eq!(parsed.emission_factors.diesel, 2.68);
        assert_eq!(parsed.report_dir(), Some(PathBuf::from("/srv/cap/reports")));
        assert_eq!(parsed.advanced.log_level, "info");
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let parsed: DaemonConfig =
            toml::from_str("[emission_factors]\nwaste = 0.0\n").expect("parse");
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_same_file_for_both_tables_rejected() {
        let parsed: DaemonConfig =
            toml::from_str("[storage]\ninventory_file = \"cities.csv\"\n").expect("parse");
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = DaemonConfig::load_from(&dir.path().join("config.toml")).expect("load");
        assert_eq!(config.storage.master_file, "cities.csv");
    }
}
