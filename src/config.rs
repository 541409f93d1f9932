//! Configuration file handling.
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/deprisk/config.toml`
//! - macOS: `~/Library/Application Support/deprisk/config.toml`
//! - Windows: `%APPDATA%\deprisk\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! advisory_url = "https://api.osv.dev/v1/query"
//! default_format = "table"
//!
//! [ignore]
//! packages = ["@types/*", "left-pad"]
//! vulnerabilities = ["GHSA-p6mc-m468-83gw"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checker::OSV_QUERY_URL;

/// Application configuration.
///
/// Every field has a default, so a partial file (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Advisory query endpoint.
    ///
    /// Default: `https://api.osv.dev/v1/query`
    pub advisory_url: String,

    /// Output format when no `--format` flag is given.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// Suppression lists.
    pub ignore: IgnoreConfig,
}

/// Packages and advisories to leave out of a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names removed before analysis. Supports `*` globs
    /// (e.g. `"@types/*"`, `"eslint-plugin-*"`).
    pub packages: Vec<String>,

    /// Advisory ids dropped from findings before classification.
    pub vulnerabilities: Vec<String>,
}

impl IgnoreConfig {
    pub fn should_ignore_package(&self, name: &str) -> bool {
        self.packages.iter().any(|pattern| glob_match(pattern, name))
    }

    pub fn should_ignore_vulnerability(&self, id: &str) -> bool {
        self.vulnerabilities.iter().any(|ignored| ignored == id)
    }
}

/// Matches `text` against a pattern where `*` stands for any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut pieces = pattern.split('*');
    let first = pieces.next().unwrap_or_default();
    let mut rest: Vec<&str> = pieces.collect();

    let Some(last) = rest.pop() else {
        return pattern == text;
    };

    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };
    remaining = match remaining.strip_suffix(last) {
        Some(r) => r,
        None => return false,
    };

    for piece in rest.into_iter().filter(|p| !p.is_empty()) {
        match remaining.find(piece) {
            Some(pos) => remaining = &remaining[pos + piece.len()..],
            None => return false,
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advisory_url: OSV_QUERY_URL.to_string(),
            default_format: "table".to_string(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config file, or the defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Saves to the default config path, creating its directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deprisk")
            .join("config.toml")
    }
}
