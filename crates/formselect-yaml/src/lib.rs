//! YAML and TOML configuration for formselect controls.

mod error;
mod manifest;

pub use error::ConfigError;
pub use manifest::{
    NavigationPolicy, OptionConfig, SelectConfig, SelectManifest, DEFAULT_TYPEAHEAD_TIMEOUT_MS,
};
