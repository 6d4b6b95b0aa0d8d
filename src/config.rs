//! Configuration management for form conversion
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (forms.toml)
//! - Environment variables (FORMS__*)
//!
//! ## Example config file (forms.toml):
//! ```toml
//! [convert]
//! method = "POST"
//! pattern_error = "Invalid format"
//! textarea_threshold = 100
//! radio_max_options = 3
//!
//! [output]
//! format = "pretty"
//!
//! [validation]
//! validate_after_convert = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Schema conversion settings
    #[serde(default)]
    pub convert: ConvertConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// HTTP method assigned to converted forms
    #[serde(default = "default_method")]
    pub method: String,

    /// Message attached to every copied `pattern`
    #[serde(default = "default_pattern_error")]
    pub pattern_error: String,

    /// Plain strings whose `maxLength` exceeds this become textareas
    #[serde(default = "default_textarea_threshold")]
    pub textarea_threshold: i64,

    /// Enums with at most this many entries become radios, larger ones selects
    #[serde(default = "default_radio_max_options")]
    pub radio_max_options: usize,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Validate converted forms before emitting them
    #[serde(default = "default_true")]
    pub validate_after_convert: bool,
}

// Default value functions
fn default_method() -> String {
    "POST".to_string()
}

fn default_pattern_error() -> String {
    "Invalid format".to_string()
}

fn default_textarea_threshold() -> i64 {
    100
}

fn default_radio_max_options() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            pattern_error: default_pattern_error(),
            textarea_threshold: default_textarea_threshold(),
            radio_max_options: default_radio_max_options(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_after_convert: true,
        }
    }
}

impl FormConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering a specific file over the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["forms.toml", ".forms.toml", "config/forms.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "form-from-schema", "form-from-schema") {
            let xdg_config = config_dir.config_dir().join("forms.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // FORMS__CONVERT__METHOD=GET etc.
        builder = builder.add_source(
            Environment::with_prefix("FORMS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
