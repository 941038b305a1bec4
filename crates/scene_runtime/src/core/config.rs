//! Runtime configuration
//!
//! All tunable policy lives here: content-manager validation thresholds,
//! animation defaults, and logging filters. Configurations load from TOML
//! or RON files through the [`Config`] trait and carry serde defaults so
//! partial files stay valid.

use serde::{Deserialize, Serialize};

use crate::animation::Easing;

/// Configuration trait with multi-format file loading
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Content-manager policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Whether error-severity validation findings abort activation
    #[serde(default = "default_true")]
    pub abort_activation_on_error: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            abort_activation_on_error: true,
        }
    }
}

/// Animation defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnimationConfig {
    /// Easing used when callers do not specify one
    #[serde(default)]
    pub default_easing: Easing,
}

/// Logging setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// env_logger filter expression, e.g. `info` or `scene_runtime=debug`
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuntimeConfig {
    /// Content-manager policy
    #[serde(default)]
    pub content: ContentConfig,

    /// Animation defaults
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Logging setup
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config for RuntimeConfig {}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert!(config.content.abort_activation_on_error);
        assert_eq!(config.animation.default_easing, Easing::Linear);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = RuntimeConfig::default();
        config.content.abort_activation_on_error = false;
        config.animation.default_easing = Easing::EaseInOut;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: RuntimeConfig = toml::from_str(&text).unwrap();
        assert!(!back.content.abort_activation_on_error);
        assert_eq!(back.animation.default_easing, Easing::EaseInOut);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = RuntimeConfig::default();
        let text = ron::ser::to_string_pretty(&config, Default::default()).unwrap();
        let back: RuntimeConfig = ron::from_str(&text).unwrap();
        assert_eq!(
            back.content.abort_activation_on_error,
            config.content.abort_activation_on_error
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let back: RuntimeConfig = toml::from_str("[logging]\nfilter = \"debug\"\n").unwrap();
        assert_eq!(back.logging.filter, "debug");
        assert!(back.content.abort_activation_on_error);
    }
}
