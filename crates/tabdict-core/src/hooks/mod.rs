//! Per-language transforms applied while building lookup keys.
//!
//! The exporter derives every lookup key as
//! `transform_key(map_chars(term))`, and feeds each raw definition through
//! `transform_definition` before markup escaping. Languages that need none of
//! this use [`IdentityHooks`].

mod profile;

use std::collections::HashMap;
use std::sync::OnceLock;

pub use profile::{
    parse_profile_toml, DefinitionRules, KeyRules, LanguageProfile, ProfileError, ProfileHooks,
};

pub const JAPANESE_PROFILE_TOML: &str = include_str!("../../profiles/japanese.toml");

/// Names accepted by [`from_name`].
pub const BUILTIN_PROFILES: &[&str] = &["identity", "japanese"];

/// A pluggable set of per-language transforms.
pub trait LanguageHooks {
    /// Transform a character-mapped term into its lookup key.
    fn transform_key(&self, key: &str) -> String {
        key.to_string()
    }

    /// Transform a raw definition before it is escaped for markup.
    fn transform_definition(&self, definition: &str) -> String {
        definition.to_string()
    }

    /// Per-character substitutions applied to a term before `transform_key`.
    fn character_mapping(&self) -> &HashMap<char, char> {
        empty_mapping()
    }
}

fn empty_mapping() -> &'static HashMap<char, char> {
    static EMPTY: OnceLock<HashMap<char, char>> = OnceLock::new();
    EMPTY.get_or_init(HashMap::new)
}

/// Leaves keys and definitions untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHooks;

impl LanguageHooks for IdentityHooks {}

/// Replace every character that has an entry in `mapping`.
pub fn map_chars(text: &str, mapping: &HashMap<char, char>) -> String {
    if mapping.is_empty() {
        return text.to_string();
    }
    text.chars()
        .map(|c| mapping.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Create built-in hooks by name.
pub fn from_name(name: &str) -> Result<Box<dyn LanguageHooks>, ProfileError> {
    match name {
        "identity" => Ok(Box::new(IdentityHooks)),
        "japanese" => Ok(Box::new(ProfileHooks::from_toml(JAPANESE_PROFILE_TOML)?)),
        _ => Err(ProfileError::UnknownProfile(name.to_string())),
    }
}
