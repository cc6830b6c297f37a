//! Configuration management.

use anyhow::Result;
use directories::ProjectDirs;
use rdap::LookupConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Lookup pipeline settings.
    #[serde(default)]
    pub lookup: LookupConfig,
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "rdapq", "rdapq")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default one.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        explicit.map_or_else(Self::default_path, |path| Ok(path.to_path_buf()))
    }

    /// Load configuration from file, using defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set a value by key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "response_ttl_secs" => self.lookup.response_ttl_secs = value.parse()?,
            "bootstrap_ttl_secs" => self.lookup.bootstrap_ttl_secs = value.parse()?,
            "bootstrap_base_url" => self.lookup.bootstrap_base_url = value.to_string(),
            "outbound_rps" => {
                self.lookup.outbound_rps = match value {
                    "" | "none" | "off" => None,
                    n => Some(n.parse()?),
                };
            }
            _ => anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 output_format       - Default output format (pretty/json/yaml)\n  \
                 response_ttl_secs   - How long lookups stay cached\n  \
                 bootstrap_ttl_secs  - How long bootstrap registries stay fresh\n  \
                 bootstrap_base_url  - Where bootstrap registries are fetched from\n  \
                 outbound_rps        - Cap on outbound requests per second (or 'none')",
                key
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lookup.bootstrap_base_url, "https://data.iana.org/rdap/");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("output", "json").unwrap();
        config.set("outbound_rps", "5").unwrap();
        config.set("response_ttl_secs", "120").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.output_format, Some(OutputFormat::Json));
        assert_eq!(loaded.lookup.outbound_rps, Some(5));
        assert_eq!(loaded.lookup.response_ttl_secs, 120);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[lookup]\nresponse_ttl_secs = 10\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output_format, None);
        assert_eq!(config.lookup.response_ttl_secs, 10);
        assert_eq!(config.lookup.rate_limit.limit, 30);
    }

    #[test]
    fn test_set_rejects_unknown_keys_and_bad_values() {
        let mut config = Config::default();
        assert!(config.set("api_key", "x").is_err());
        assert!(config.set("response_ttl_secs", "soon").is_err());
        config.set("outbound_rps", "none").unwrap();
        assert_eq!(config.lookup.outbound_rps, None);
    }
}
