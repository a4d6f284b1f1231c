//! TOML configuration for the `vfl` tool and other hosts
//!
//! A configuration file bundles layout options with a metrics table and the
//! list of view names that may appear in formats:
//!
//! ```toml
//! views = ["button", "field"]
//!
//! [options]
//! orientation = "H"
//! direction = "leading-to-trailing"
//! standard_spacing = 8
//! superview_margin = 20
//! adjacency = "standard"
//! alignment = ["top", "bottom"]
//!
//! [metrics]
//! padding = 12
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::{Adjacency, FormatAlignment, FormatDirection, LayoutOptions, Metrics};
use crate::parser::Orientation;

/// Errors that can occur when loading or parsing a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Options, metrics and declared views loaded from TOML
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub options: LayoutOptions,
    pub metrics: Metrics,
    /// Declared view names; empty when the file has no `views` list
    pub views: Vec<String>,
}

/// TOML structure for deserializing configs
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    options: Option<TomlOptions>,
    #[serde(default)]
    metrics: HashMap<String, f64>,
    #[serde(default)]
    views: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlOptions {
    orientation: Option<String>,
    direction: Option<String>,
    standard_spacing: Option<f64>,
    superview_margin: Option<f64>,
    adjacency: Option<String>,
    #[serde(default)]
    alignment: Vec<String>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load config from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        let options = match parsed.options {
            Some(options) => options.into_layout_options()?,
            None => LayoutOptions::default(),
        };

        Ok(Config {
            options,
            metrics: parsed.metrics,
            views: parsed.views,
        })
    }
}

impl TomlOptions {
    fn into_layout_options(self) -> Result<LayoutOptions, ConfigError> {
        let mut options = LayoutOptions::new();

        if let Some(orientation) = self.orientation {
            options = options.with_orientation(match orientation.as_str() {
                "H" | "h" | "horizontal" => Orientation::Horizontal,
                "V" | "v" | "vertical" => Orientation::Vertical,
                _ => return Err(invalid("options.orientation", orientation)),
            });
        }

        if let Some(direction) = self.direction {
            options = options.with_direction(match direction.as_str() {
                "leading-to-trailing" => FormatDirection::LeadingToTrailing,
                "left-to-right" => FormatDirection::LeftToRight,
                "right-to-left" => FormatDirection::RightToLeft,
                _ => return Err(invalid("options.direction", direction)),
            });
        }

        if let Some(adjacency) = self.adjacency {
            options = options.with_adjacency(match adjacency.as_str() {
                "standard" => Adjacency::StandardSpacing,
                "flush" => Adjacency::Flush,
                _ => return Err(invalid("options.adjacency", adjacency)),
            });
        }

        if let Some(spacing) = self.standard_spacing {
            options = options.with_standard_spacing(spacing);
        }
        if let Some(margin) = self.superview_margin {
            options = options.with_superview_margin(margin);
        }

        let mut alignment = FormatAlignment::empty();
        for name in self.alignment {
            match FormatAlignment::from_option_name(&name) {
                Some(flag) => alignment |= flag,
                None => return Err(invalid("options.alignment", name)),
            }
        }

        Ok(options.with_alignment(alignment))
    }
}

fn invalid(key: &str, value: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
views = ["button", "field"]

[options]
orientation = "V"
direction = "right-to-left"
standard_spacing = 6
superview_margin = 16.5
adjacency = "flush"
alignment = ["top", "bottom"]

[metrics]
padding = 12
wide = 240.0
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.options.orientation, Orientation::Vertical);
        assert_eq!(config.options.direction, FormatDirection::RightToLeft);
        assert_eq!(config.options.standard_spacing, 6.0);
        assert_eq!(config.options.superview_margin, 16.5);
        assert_eq!(config.options.adjacency, Adjacency::Flush);
        assert_eq!(
            config.options.alignment,
            FormatAlignment::ALL_TOP | FormatAlignment::ALL_BOTTOM
        );
        assert_eq!(config.metrics.get("padding"), Some(&12.0));
        assert_eq!(config.metrics.get("wide"), Some(&240.0));
        assert_eq!(config.views, vec!["button", "field"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.options.standard_spacing, 8.0);
        assert_eq!(config.options.superview_margin, 20.0);
        assert!(config.metrics.is_empty());
        assert!(config.views.is_empty());
    }

    #[test]
    fn test_invalid_orientation() {
        let err = Config::from_str("[options]\norientation = \"diagonal\"").unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value } => {
                assert_eq!(key, "options.orientation");
                assert_eq!(value, "diagonal");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_alignment_name() {
        let err = Config::from_str("[options]\nalignment = [\"middle\"]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Config::from_str("[metrics]\npadding = \"twelve\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/vfl.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
