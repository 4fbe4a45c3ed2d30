//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::PositionField;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Data loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the teamsheet CSV export.
    #[serde(default = "default_teamsheets_path")]
    pub teamsheets_path: PathBuf,

    /// Restrict analysis to teams appearing in this league; empty disables
    /// the restriction.
    #[serde(default = "default_league")]
    pub league: String,

    /// Drop goalkeeper rows before analysis.
    #[serde(default = "default_true")]
    pub exclude_goalkeepers: bool,
}

fn default_teamsheets_path() -> PathBuf {
    PathBuf::from("./data/teamsheets.csv")
}

fn default_league() -> String {
    "ENG-Premier League".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            teamsheets_path: default_teamsheets_path(),
            league: default_league(),
            exclude_goalkeepers: default_true(),
        }
    }
}

/// Analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Position column used by formation and pattern analyses.
    #[serde(default)]
    pub formation_position_field: PositionField,

    /// Position column used by the player profiler.
    #[serde(default = "default_profile_field")]
    pub profile_position_field: PositionField,
}

fn default_profile_field() -> PositionField {
    PositionField::New
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            formation_position_field: PositionField::default(),
            profile_position_field: default_profile_field(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data: DataConfig::default(),
            analysis: AnalysisConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.teamsheets_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "Teamsheets path must not be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(
            config.data.teamsheets_path,
            PathBuf::from("./data/teamsheets.csv")
        );
        assert_eq!(config.data.league, "ENG-Premier League");
        assert!(config.data.exclude_goalkeepers);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_default_position_fields() {
        let config = AnalysisConfig::default();
        assert_eq!(config.formation_position_field, PositionField::MostCommon);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data.league, parsed.data.league);
    }

    #[test]
    fn test_position_field_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [analysis]
            formation_position_field = "position"
            profile_position_field = "new"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.analysis.formation_position_field,
            PositionField::Position
        );
        assert_eq!(config.analysis.profile_position_field, PositionField::New);
    }
}
