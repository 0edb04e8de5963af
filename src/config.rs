use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tags::Dialect;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dialect: Dialect,
    pub excerpt: ExcerptConfig,
    pub preview: PreviewConfig,
    pub links: LinksConfig,
    pub section: SectionConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExcerptConfig {
    pub max_chars: usize,
    pub ellipsis: String,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_chars: 150,
            ellipsis: "...".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Shown instead of content when the draft is blank.
    pub placeholder: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            placeholder: "Nothing to preview yet...".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
    pub underline: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#2563eb".to_string(),
            underline: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SectionConfig {
    /// Left border colour.
    pub accent: String,
    pub fill: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            accent: "#3b82f6".to_string(),
            fill: "#f3f4f6".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub heading_size: String,
    /// Vertical space emitted for `[br]`.
    pub break_spacing: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            heading_size: "1.25em".to_string(),
            break_spacing: "0.5em".to_string(),
        }
    }
}

impl Config {
    /// The config bundled with the crate (validated by build.rs).
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            config_path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Config::load`], but a missing file yields the compiled default.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!("No config at {}, using defaults", path.display());
            return Ok(Self::compiled_default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn compiled_default_matches_default_impls() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("oremark.toml");
        fs::write(&path, "dialect = \"linked\"\n\n[excerpt]\nmax_chars = 40\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.dialect, Dialect::Linked);
        assert_eq!(config.excerpt.max_chars, 40);
        assert_eq!(config.excerpt.ellipsis, "...");
        assert_eq!(config.links, LinksConfig::default());
    }

    #[test]
    fn missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        assert!(matches!(Config::load(&path), Err(ConfigError::Read { .. })));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("oremark.toml");
        fs::write(&path, "dialect = \"fancy\"").unwrap();

        let err = Config::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("oremark.toml"));
    }
}
