use std::path::Path;

use bevy::log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::utils::DynamicsError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
    #[error("Failed to build integrator: {0}")]
    Dynamics(#[from] DynamicsError),
}

/// On-disk encodings a configuration can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension (`yaml`, `yml` or `json`).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn parse<T: DeserializeOwned>(contents: &str, format: ConfigFormat) -> Result<T, ConfigError> {
    Ok(match format {
        ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
        ConfigFormat::Json => serde_json::from_str(contents)?,
    })
}

/// Reads any serde configuration from a YAML or JSON file.
pub fn load<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path)?;
    let config = parse(&contents, format)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

pub fn save<T: Serialize, P: AsRef<Path>>(config: &T, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let contents = match ConfigFormat::from_path(path)? {
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::PhysicsConfig;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("f16.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b/f16.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("f16.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: PhysicsConfig = parse("substep_rate: 240.0\n", ConfigFormat::Yaml).unwrap();
        assert_eq!(config.substep_rate, 240.0);
        assert_eq!(config.max_substeps, PhysicsConfig::default().max_substeps);
    }
}
