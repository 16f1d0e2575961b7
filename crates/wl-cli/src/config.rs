//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use wl_core::MergeConfig;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Gap in minutes across which sessions are merged for totals.
    pub adjacency_tolerance_minutes: u16,

    /// Staff member used when a command omits `--staff`.
    #[serde(default)]
    pub default_staff: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field(
                "adjacency_tolerance_minutes",
                &self.adjacency_tolerance_minutes,
            )
            .field("default_staff", &self.default_staff)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("worklog.db"),
            adjacency_tolerance_minutes: MergeConfig::default().adjacency_tolerance_minutes,
            default_staff: None,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WL_*)
        figment = figment.merge(Env::prefixed("WL_"));

        figment.extract()
    }

    /// Merge settings derived from this configuration.
    pub const fn merge_config(&self) -> MergeConfig {
        MergeConfig {
            adjacency_tolerance_minutes: self.adjacency_tolerance_minutes,
        }
    }
}

/// Returns the platform-specific config directory for the work log.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("worklog"))
}

/// Returns the platform-specific data directory for the work log.
///
/// On Linux: `~/.local/share/worklog`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("worklog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_worklog() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "worklog");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("worklog.db"));
        assert_eq!(config.adjacency_tolerance_minutes, 15);
        assert!(config.default_staff.is_none());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(
            &path,
            "database_path = \"/tmp/wl-test.db\"\nadjacency_tolerance_minutes = 5\ndefault_staff = \"alice\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/wl-test.db"));
        assert_eq!(config.merge_config().adjacency_tolerance_minutes, 5);
        assert_eq!(config.default_staff.as_deref(), Some("alice"));
    }
}
