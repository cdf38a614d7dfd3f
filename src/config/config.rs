use crate::data::Category;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub backend: BackendConfig,
    pub display: DisplayConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search is issued
    pub quiet_period_ms: u64,

    /// Minimum trimmed query length before searching
    pub min_query_len: usize,

    /// Maximum results requested per category
    pub limit_per_category: usize,

    /// Order in which category sections are listed
    pub category_order: Vec<Category>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Dashboard API base URL. When unset the built-in demo data is searched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Bearer token sent with every search request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Artificial latency for the demo backend, useful to watch stale responses being dropped
    pub demo_latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for category and status icons
    pub use_glyphs: bool,

    /// Placeholder shown in the empty search box
    pub placeholder: String,

    /// Maximum result rows before the panel scrolls
    pub max_visible_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    /// Enable Ctrl-n / Ctrl-p for result navigation
    pub vim_mode: bool,

    /// Extra bindings, action -> key ("select_next" = "ctrl+j")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_mappings: Option<HashMap<String, String>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 300,
            min_query_len: 2,
            limit_per_category: 8,
            category_order: Category::ALL.to_vec(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            placeholder: "Search patients, appointments...".to_string(),
            max_visible_rows: 12,
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            vim_mode: true,
            custom_mappings: None,
        }
    }
}

impl Config {
    /// Load config from the default location, writing defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("dashboard-search").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.min_query_len == 0 {
            return Err(anyhow!("search.min_query_len must be at least 1"));
        }
        if self.search.limit_per_category == 0 {
            return Err(anyhow!("search.limit_per_category must be at least 1"));
        }
        if self.display.max_visible_rows == 0 {
            return Err(anyhow!("display.max_visible_rows must be at least 1"));
        }
        Ok(())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Dashboard Search Configuration File
# Location: ~/.config/dashboard-search/config.toml (Linux)
#           ~/Library/Application Support/dashboard-search/config.toml (macOS)
#           %APPDATA%\dashboard-search\config.toml (Windows)

[search]
# Quiet period after the last keystroke before a search is sent (milliseconds)
quiet_period_ms = 300

# Queries shorter than this (after trimming) clear the results instead of searching
min_query_len = 2

# Maximum results per category
limit_per_category = 8

# Section order in the results panel
category_order = ["patients", "appointments"]

[backend]
# Dashboard API base URL; leave commented to search the built-in demo data
# base_url = "http://localhost:5000/api"
# auth_token = "..."

# Artificial delay for the demo data (milliseconds)
demo_latency_ms = 0

[display]
# Set to false for ASCII-only icons
use_glyphs = true
placeholder = "Search patients, appointments..."
max_visible_rows = 12

[keybindings]
# Ctrl-n / Ctrl-p move through results in addition to the arrow keys
vim_mode = true

# Extra bindings: select_next, select_previous, confirm, close
# [keybindings.custom_mappings]
# select_next = "ctrl+j"
# select_previous = "ctrl+k"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.quiet_period_ms, 300);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(
            config.search.category_order,
            vec![Category::Patient, Category::Appointment]
        );
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_commented_default_parses() {
        let config: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(config.search.limit_per_category, 8);
        assert!(config.keybindings.vim_mode);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            quiet_period_ms = 150
            category_order = ["appointments", "patients"]
            "#,
        )
        .unwrap();
        assert_eq!(config.search.quiet_period_ms, 150);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.search.category_order[0], Category::Appointment);
        assert!(config.display.use_glyphs);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.backend.base_url = Some("http://localhost:5000/api".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend.base_url, config.backend.base_url);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#""patients""#));
        assert!(written.contains(r#""appointments""#));
        assert!(!written.contains(r#""patient""#));
    }

    #[test]
    fn test_validation_rejects_zero_limit() {
        let mut config = Config::default();
        config.search.limit_per_category = 0;
        assert!(config.validate().is_err());
    }
}
