//! Shell configuration loaded from `arcshell.toml`.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "ARCSHELL_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "arcshell.toml";

/// Top-level shell configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    pub paths: PathsConfig,
    pub navigation: NavigationConfig,
    pub timing: TimingConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `<identity>.html` page templates.
    pub template_dir: PathBuf,
    /// Directory whose contents the landing page references as `assets/...`.
    pub asset_dir: PathBuf,
    /// JSON persistence directory. An empty path keeps all data in memory.
    pub data_dir: PathBuf,
}

impl PathsConfig {
    /// The persistence directory, or `None` when persistence is disabled.
    pub fn data_dir(&self) -> Option<&Path> {
        if self.data_dir.as_os_str().is_empty() {
            None
        } else {
            Some(&self.data_dir)
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("pages"),
            asset_dir: PathBuf::from("assets"),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Where plain-text input and new web tabs go.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Search endpoint; the `+`-joined query is appended.
    pub search_url: String,
    /// URL opened by a web tab created without an explicit target.
    pub default_url: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search?q=".to_string(),
            default_url: "https://www.google.com".to_string(),
        }
    }
}

impl NavigationConfig {
    fn validate(&self) -> Result<()> {
        if self.search_url.trim().is_empty() {
            return Err(ShellError::Config("navigation.search_url is empty".into()));
        }
        if !(self.default_url.starts_with("http://") || self.default_url.starts_with("https://")) {
            return Err(ShellError::Config(format!(
                "navigation.default_url must be an http(s) URL, got {:?}",
                self.default_url
            )));
        }
        Ok(())
    }
}

/// Deferred-task delays used by the internal page controller.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between a mutation command and the re-render that shows it.
    pub refresh_delay_ms: u64,
    /// How long the navigation guard stays raised after a dispatch. Must
    /// outlast the surface's own event settling.
    pub guard_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: 500,
            guard_settle_ms: 100,
        }
    }
}

impl TimingConfig {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn guard_settle(&self) -> Duration {
        Duration::from_millis(self.guard_settle_ms)
    }
}

impl ShellConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.navigation.validate()?;
        Ok(config)
    }

    /// Load a configuration file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            log::info!("No config at {} -- using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Resolve the config from `ARCSHELL_CONFIG`, falling back to
    /// `arcshell.toml` in the working directory.
    pub fn discover() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        let cfg = ShellConfig::default();
        assert_eq!(cfg.paths.template_dir, PathBuf::from("pages"));
        assert_eq!(cfg.paths.asset_dir, PathBuf::from("assets"));
        assert_eq!(cfg.paths.data_dir(), Some(Path::new("data")));
        assert_eq!(cfg.navigation.search_url, "https://www.google.com/search?q=");
        assert_eq!(cfg.timing.refresh_delay(), Duration::from_millis(500));
        assert_eq!(cfg.timing.guard_settle(), Duration::from_millis(100));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ShellConfig::from_toml("").unwrap(), ShellConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = ShellConfig::from_toml(
            "[timing]\nrefresh_delay_ms = 0\n\n[navigation]\nsearch_url = \"https://duck.example/?q=\"\n",
        )
        .unwrap();
        assert_eq!(cfg.timing.refresh_delay_ms, 0);
        assert_eq!(cfg.timing.guard_settle_ms, 100);
        assert_eq!(cfg.navigation.search_url, "https://duck.example/?q=");
        assert_eq!(cfg.navigation.default_url, "https://www.google.com");
    }

    #[test]
    fn empty_data_dir_disables_persistence() {
        let cfg = ShellConfig::from_toml("[paths]\ndata_dir = \"\"\n").unwrap();
        assert_eq!(cfg.paths.data_dir(), None);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = ShellConfig::from_toml("[timing\nrefresh_delay_ms = ").unwrap_err();
        assert!(matches!(err, ShellError::TomlParse(_)));
    }

    #[test]
    fn bad_navigation_urls_are_config_errors() {
        let err = ShellConfig::from_toml("[navigation]\nsearch_url = \"\"\n").unwrap_err();
        assert!(matches!(err, ShellError::Config(_)));
        let err =
            ShellConfig::from_toml("[navigation]\ndefault_url = \"ftp://x\"\n").unwrap_err();
        assert!(err.to_string().contains("default_url"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ShellConfig::from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, ShellConfig::default());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arcshell.toml");
        std::fs::write(&path, "[paths]\ntemplate_dir = \"ui\"\n").unwrap();
        let cfg = ShellConfig::from_file(&path).unwrap();
        assert_eq!(cfg.paths.template_dir, PathBuf::from("ui"));
    }
}
