//! TOML configuration for the console binary.
//!
//! Every field has a serde default so an empty file (or no file at all)
//! yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use orbitops_protocol::{
    ProtocolError, DEFAULT_ASSET_COUNT, DEFAULT_LOG_CAPACITY, DEFAULT_TICK_INTERVAL_MS,
};
use orbitops_sim::{SampleMode, SamplerOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSection {
    #[serde(default = "default_asset_count")]
    pub asset_count: usize,
    /// `true` recreates the fleet wholesale each tick; `false` applies a
    /// bounded random walk instead.
    #[serde(default = "default_true")]
    pub regenerate: bool,
}

impl Default for FleetSection {
    fn default() -> Self {
        Self {
            asset_count: default_asset_count(),
            regenerate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerSection {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Start with auto-refresh on; `false` waits for `/resume`.
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            auto_start: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleSection {
    /// External dashboard URLs listed by `/links`. Opaque strings.
    #[serde(default)]
    pub external_links: Vec<String>,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            external_links: Vec::new(),
            log_capacity: default_log_capacity(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub fleet: FleetSection,
    #[serde(default)]
    pub sampler: SamplerSection,
    #[serde(default)]
    pub console: ConsoleSection,
}

impl ConsoleConfig {
    /// Load from an explicit path, or the default location, or fall back
    /// to built-in defaults when no file exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ProtocolError> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let config = match candidate {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(&p)?;
                Self::parse(&raw)?
            }
            Some(p) if path.is_some() => {
                return Err(ProtocolError::InvalidConfig(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            _ => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        toml::from_str(raw).map_err(|e| ProtocolError::InvalidConfig(e.to_string()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("orbitops").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ProtocolError> {
        if self.fleet.asset_count == 0 {
            return Err(ProtocolError::InvalidConfig(
                "fleet.asset_count must be at least 1".into(),
            ));
        }
        if self.sampler.tick_interval_ms == 0 {
            return Err(ProtocolError::InvalidConfig(
                "sampler.tick_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn sampler_options(&self) -> SamplerOptions {
        SamplerOptions {
            tick_interval: Duration::from_millis(self.sampler.tick_interval_ms),
            mode: if self.fleet.regenerate {
                SampleMode::Regenerate
            } else {
                SampleMode::RandomWalk
            },
            asset_count: self.fleet.asset_count,
            seed: None,
        }
    }
}

fn default_asset_count() -> usize {
    DEFAULT_ASSET_COUNT
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = ConsoleConfig::parse("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.fleet.asset_count, DEFAULT_ASSET_COUNT);
        assert_eq!(config.sampler.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert!(config.sampler.auto_start);
        assert!(config.console.external_links.is_empty());
    }

    #[test]
    fn test_full_toml_parses() {
        let raw = r#"
            [fleet]
            asset_count = 24
            regenerate = false

            [sampler]
            tick_interval_ms = 30000
            auto_start = false

            [console]
            external_links = ["https://cloud.example.com/dashboard"]
            log_capacity = 50
        "#;
        let config = ConsoleConfig::parse(raw).unwrap();
        assert_eq!(config.fleet.asset_count, 24);
        assert!(!config.fleet.regenerate);
        assert_eq!(config.sampler.tick_interval_ms, 30000);
        assert!(!config.sampler.auto_start);
        assert_eq!(config.console.external_links.len(), 1);
        assert_eq!(config.console.log_capacity, 50);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = ConsoleConfig::parse("[fleet]\nasset_count = 3\n").unwrap();
        assert_eq!(config.fleet.asset_count, 3);
        assert!(config.fleet.regenerate);
        assert_eq!(config.sampler.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = ConsoleConfig::parse("[fleet\nasset_count = 3").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_asset_count_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fleet]\nasset_count = 0\n").unwrap();

        let err = ConsoleConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidConfig(_)));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let err = ConsoleConfig::load(Some(Path::new("/nonexistent/orbitops.toml"))).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidConfig(_)));
    }

    #[test]
    fn test_sampler_options_mapping() {
        let mut config = ConsoleConfig::default();
        config.fleet.regenerate = false;
        config.fleet.asset_count = 5;
        config.sampler.tick_interval_ms = 250;

        let options = config.sampler_options();
        assert_eq!(options.mode, SampleMode::RandomWalk);
        assert_eq!(options.asset_count, 5);
        assert_eq!(options.tick_interval, Duration::from_millis(250));
    }
}
