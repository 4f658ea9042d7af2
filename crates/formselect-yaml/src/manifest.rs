//! Declarative select manifests.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default typeahead inactivity window.
pub const DEFAULT_TYPEAHEAD_TIMEOUT_MS: u64 = 300;

/// Behavior of keyboard navigation at the ends of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Moving past the last option lands on the first, and vice versa
    #[default]
    Wrap,
    /// Moving past either end stays on the end
    Clamp,
}

/// Behavioral configuration for one select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Navigation policy at list ends
    pub navigation: NavigationPolicy,
    /// Typeahead inactivity window in milliseconds
    pub typeahead_timeout_ms: u64,
    /// Whether a selection is required
    pub required: bool,
    /// Form field name used for submission
    pub name: Option<String>,
    /// Whether the whole control is disabled
    pub disabled: bool,
    /// Show validity errors before the first interaction
    pub validate_on_initial_render: bool,
    /// Message shown when a required value is missing
    pub validation_message: Option<String>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationPolicy::Wrap,
            typeahead_timeout_ms: DEFAULT_TYPEAHEAD_TIMEOUT_MS,
            required: false,
            name: None,
            disabled: false,
            validate_on_initial_render: false,
            validation_message: None,
        }
    }
}

impl SelectConfig {
    /// Check the config for values the control cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typeahead_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "typeahead_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.name.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::invalid("name", "must not be empty"));
        }
        Ok(())
    }
}

/// One option entry in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionConfig {
    /// Submitted value
    pub value: String,
    /// Display text (defaults to the value)
    #[serde(default)]
    pub text: Option<String>,
    /// Whether the option can be chosen
    #[serde(default)]
    pub disabled: bool,
}

impl OptionConfig {
    /// Display text, falling back to the value.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.value)
    }
}

/// Select control manifest: options, initial selection and config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectManifest {
    /// Options in display order
    #[serde(default)]
    pub options: Vec<OptionConfig>,
    /// Initially selected value
    #[serde(default)]
    pub selected: Option<String>,
    /// Behavioral configuration
    #[serde(default)]
    pub config: SelectConfig,
}

impl SelectManifest {
    /// Parse and validate a manifest from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the manifest is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse and validate a manifest from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the manifest is invalid.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let manifest: Self = toml::from_str(source)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize manifest to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the manifest for an initial selection the control would reject.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;

        if let Some(selected) = &self.selected {
            // First match wins on duplicate values, same as the registry.
            match self.options.iter().find(|o| &o.value == selected) {
                None => {
                    return Err(ConfigError::invalid(
                        "selected",
                        format!("no option has value '{selected}'"),
                    ))
                }
                Some(option) if option.disabled => {
                    return Err(ConfigError::invalid(
                        "selected",
                        format!("option '{selected}' is disabled"),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
