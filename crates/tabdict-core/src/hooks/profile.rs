use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use super::LanguageHooks;
use crate::unicode::katakana_to_hiragana;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("mapping entries must be single characters: {from:?} = {to:?}")]
    InvalidMapping { from: String, to: String },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("unknown profile '{0}' (available: identity, japanese)")]
    UnknownProfile(String),
}

/// Language profile as written in TOML.
///
/// ```toml
/// [mapping]
/// "ゑ" = "え"
///
/// [key]
/// remove = ["・"]
/// fold_katakana = true
///
/// [definition]
/// remove = ["▽"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageProfile {
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub key: KeyRules,
    #[serde(default)]
    pub definition: DefinitionRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyRules {
    /// Characters deleted from lookup keys.
    #[serde(default)]
    pub remove: Vec<String>,
    /// Fold katakana to hiragana in lookup keys.
    #[serde(default)]
    pub fold_katakana: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionRules {
    /// Substrings deleted from raw definitions.
    #[serde(default)]
    pub remove: Vec<String>,
}

pub fn parse_profile_toml(toml_str: &str) -> Result<LanguageProfile, ProfileError> {
    toml::from_str(toml_str).map_err(|e| ProfileError::Parse(e.to_string()))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// [`LanguageHooks`] driven by a [`LanguageProfile`].
#[derive(Debug, Clone, Default)]
pub struct ProfileHooks {
    mapping: HashMap<char, char>,
    key_remove: Vec<char>,
    fold_katakana: bool,
    definition_remove: Vec<String>,
}

impl ProfileHooks {
    pub fn from_profile(profile: LanguageProfile) -> Result<Self, ProfileError> {
        let mut mapping = HashMap::with_capacity(profile.mapping.len());
        for (from, to) in &profile.mapping {
            match (single_char(from), single_char(to)) {
                (Some(f), Some(t)) => {
                    mapping.insert(f, t);
                }
                _ => {
                    return Err(ProfileError::InvalidMapping {
                        from: from.clone(),
                        to: to.clone(),
                    })
                }
            }
        }

        let key_remove = profile
            .key
            .remove
            .iter()
            .map(|s| {
                single_char(s).ok_or_else(|| ProfileError::InvalidValue {
                    field: "key.remove".to_string(),
                    reason: format!("{s:?} is not a single character"),
                })
            })
            .collect::<Result<Vec<char>, _>>()?;

        if profile.definition.remove.iter().any(|s| s.is_empty()) {
            return Err(ProfileError::InvalidValue {
                field: "definition.remove".to_string(),
                reason: "entries must be non-empty".to_string(),
            });
        }

        Ok(Self {
            mapping,
            key_remove,
            fold_katakana: profile.key.fold_katakana,
            definition_remove: profile.definition.remove,
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ProfileError> {
        Self::from_profile(parse_profile_toml(toml_str)?)
    }

    pub fn open(path: &Path) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

impl LanguageHooks for ProfileHooks {
    fn transform_key(&self, key: &str) -> String {
        let kept: String = key
            .chars()
            .filter(|c| !self.key_remove.contains(c))
            .collect();
        if self.fold_katakana {
            katakana_to_hiragana(&kept)
        } else {
            kept
        }
    }

    fn transform_definition(&self, definition: &str) -> String {
        self.definition_remove
            .iter()
            .fold(definition.to_string(), |acc, s| acc.replace(s.as_str(), ""))
    }

    fn character_mapping(&self) -> &HashMap<char, char> {
        &self.mapping
    }
}
