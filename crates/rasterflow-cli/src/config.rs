//! User configuration loaded from TOML.
//!
//! ```toml
//! log_level = "debug"
//!
//! [export]
//! format = "jpeg"
//! quality = 80
//! ```
//!
//! Every field is optional. A missing file at the default location yields
//! [`Config::default`]; a missing file named explicitly with `--config` is an
//! error.

use std::path::{Path, PathBuf};

use rasterflow_core::ImageFormat;
use rasterflow_core::operators::DEFAULT_QUALITY;
use serde::Deserialize;
use thiserror::Error;

/// Application name used for directory paths.
const APP_NAME: &str = "rasterflow";

/// Config file name inside the application directory.
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("failed to read config '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config '{path}': {source}")]
    TomlParse {
        /// Path of the file, empty when parsing text directly.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A field holds a value outside its domain
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Export defaults from the `[export]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Output format name (`png`, `jpg`, `jpeg`).
    pub format: Option<String>,
    /// Output quality, 0–100.
    pub quality: Option<u8>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Export defaults.
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            export: ExportConfig::default(),
        }
    }
}

/// Returns the default config file path (`<config dir>/rasterflow/config.toml`).
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(CONFIG_FILE)
}

impl Config {
    /// Loads the config from `explicit`, or from [`default_path`] if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = default_path();
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and validates a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|e| match e {
            ConfigError::TomlParse { source, .. } => ConfigError::TomlParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parses config text and validates its values.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::TomlParse {
            path: PathBuf::new(),
            source,
        })?;
        config.export_format()?;
        if let Some(q) = config.export.quality
            && q > 100
        {
            return Err(ConfigError::InvalidValue {
                field: "export.quality",
                reason: format!("{q} is above 100"),
            });
        }
        Ok(config)
    }

    /// Configured export format, if any.
    pub fn export_format(&self) -> Result<Option<ImageFormat>, ConfigError> {
        self.export
            .format
            .as_deref()
            .map(|name| {
                name.parse().map_err(|reason| ConfigError::InvalidValue {
                    field: "export.format",
                    reason,
                })
            })
            .transpose()
    }

    /// Configured export quality, or the sink default.
    pub fn export_quality(&self) -> u8 {
        self.export.quality.unwrap_or(DEFAULT_QUALITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_text_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.export_format().unwrap(), None);
        assert_eq!(config.export_quality(), DEFAULT_QUALITY);
    }

    #[test]
    fn full_config() {
        let config = Config::parse(
            r#"
            log_level = "debug"
            [export]
            format = "JPEG"
            quality = 70
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.export_format().unwrap(), Some(ImageFormat::Jpeg));
        assert_eq!(config.export_quality(), 70);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::parse("[export]\nformat = \"gif\""),
            Err(ConfigError::InvalidValue { field: "export.format", .. })
        ));
        assert!(matches!(
            Config::parse("[export]\nquality = 101"),
            Err(ConfigError::InvalidValue { field: "export.quality", .. })
        ));
        assert!(matches!(
            Config::parse("colour = \"blue\""),
            Err(ConfigError::TomlParse { .. })
        ));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("absent.toml"), "got: {err}");
    }

    #[test]
    fn parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "log_level = ").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(
            matches!(&err, ConfigError::TomlParse { path, .. } if path == file.path()),
            "got: {err}"
        );
    }

    #[test]
    fn default_path_ends_with_app_file() {
        let path = default_path();
        assert!(path.ends_with("rasterflow/config.toml"));
    }
}
