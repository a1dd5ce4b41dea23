//! Resolver configuration.
//!
//! Defaults reproduce the canonical rules: eight phases, simultaneous
//! resolution, salvo detail in the log. A JSON file may override any
//! subset of fields.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Default maximum number of phases in a battle.
pub const NUMBER_OF_PHASES_IN_BATTLE: usize = 8;

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse resolver config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid resolver config: {0}")]
    Invalid(String),
}

/// How casualties within a phase interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Every salvo reads the pre-phase snapshot; losses land together.
    #[default]
    Simultaneous,
    /// Salvos land one strike group at a time in strike order, so units
    /// destroyed early in a phase do not fire later in it.
    Staggered,
}

/// Tunables for battle resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Phase count after which the battle ends regardless of survivors.
    pub phase_limit: usize,
    /// Whether salvo lines are written into the battle log.
    pub record_salvos: bool,
    pub mode: ResolutionMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            phase_limit: NUMBER_OF_PHASES_IN_BATTLE,
            record_salvos: true,
            mode: ResolutionMode::Simultaneous,
        }
    }
}

impl ResolverConfig {
    /// Checks that the configuration can drive a battle to completion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phase_limit == 0 {
            return Err(ConfigError::Invalid("phase_limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Loads a resolver configuration from a JSON file at the given path.
pub fn load_config(path: &Path) -> Result<ResolverConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_config_from_str(&data)
}

/// Loads a resolver configuration from a JSON string.
pub fn load_config_from_str(json: &str) -> Result<ResolverConfig, ConfigError> {
    let config: ResolverConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.phase_limit, 8);
        assert!(config.record_salvos);
        assert_eq!(config.mode, ResolutionMode::Simultaneous);
    }

    #[test]
    fn partial_override() {
        let config =
            load_config_from_str(r#"{"phase_limit": 3, "mode": "staggered"}"#).unwrap();
        assert_eq!(config.phase_limit, 3);
        assert_eq!(config.mode, ResolutionMode::Staggered);
        assert!(config.record_salvos);
    }

    #[test]
    fn zero_phase_limit_is_rejected() {
        let err = load_config_from_str(r#"{"phase_limit": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = load_config_from_str(r#"{"mode": "sideways"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Path::new("/nonexistent/lnm3/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
