//! Settings loaded from TOML.
//!
//! - Default values are embedded via `include_str!("default_settings.toml")`
//! - `parse_settings_toml(content)` parses and validates a custom file
//! - A `Settings` value is passed explicitly to the pipelines; nothing here is
//!   global, so flags can override fields before a run starts.

use serde::Deserialize;

use crate::import::JoinMode;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub import: ImportSettings,
    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("default settings TOML must be valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportSettings {
    pub join: JoinMode,
    pub default_output: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSettings {
    pub keys_per_file: usize,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub reflow: bool,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.trim().is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be non-empty".to_string(),
                });
            }
        };
    }

    check_non_empty!(import.default_output);
    check_non_empty!(export.source_language);
    check_non_empty!(export.target_language);

    if s.export.keys_per_file == 0 {
        return Err(SettingsError::InvalidValue {
            field: "export.keys_per_file".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    Ok(())
}
