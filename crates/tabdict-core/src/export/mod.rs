//! Interchange file → Mobipocket key files and OPF manifest.
//!
//! Every record is read into [`KeyGroups`] before any output is opened. Keys
//! are then written in order, `keys_per_file` per HTML file, and the manifest
//! lists those files in the same order.

mod manifest;
mod markup;
mod normalize;
#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::hooks::{map_chars, LanguageHooks};
use crate::settings::ExportSettings;
use crate::tabfile::{is_record_line, TabFileError, TabRecord};

pub use manifest::{manifest_path, write_opf};
pub use markup::{key_file_path, write_key, write_keys, KEY_FILE_FOOTER, KEY_FILE_HEADER};
pub use normalize::{escape_definition, normalize_key};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Parse(#[from] TabFileError),

    #[error("missing key for term '{term}'")]
    MissingKey { term: String },

    #[error("missing definition for term '{term}'")]
    MissingDefinition { term: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One definition of a term, ready for markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    /// Headword as it appears in the interchange file (trimmed).
    pub term: String,
    /// Escaped definition.
    pub definition: String,
    /// The lookup key equals the term's own normalized form.
    pub exact_match: bool,
}

/// Lookup entries grouped by normalized key, iterated in key order.
#[derive(Debug, Default)]
pub struct KeyGroups {
    groups: BTreeMap<String, Vec<LookupEntry>>,
}

impl KeyGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, entry: LookupEntry) {
        self.groups.entry(key).or_default().push(entry);
    }

    pub fn get(&self, key: &str) -> Option<&[LookupEntry]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of entries across all keys.
    pub fn entry_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LookupEntry])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Everything an export run needs. Built once and passed by reference.
pub struct ExportConfig {
    pub hooks: Box<dyn LanguageHooks>,
    pub source_language: String,
    pub target_language: String,
    pub keys_per_file: usize,
    pub reflow: bool,
    pub output_dir: PathBuf,
}

impl ExportConfig {
    pub fn new(
        hooks: Box<dyn LanguageHooks>,
        settings: &ExportSettings,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hooks,
            source_language: settings.source_language.clone(),
            target_language: settings.target_language.clone(),
            keys_per_file: settings.keys_per_file,
            reflow: settings.reflow,
            output_dir: output_dir.into(),
        }
    }
}

#[derive(Debug)]
pub struct ExportSummary {
    pub keys: usize,
    pub entries: usize,
    pub files: usize,
    pub manifest: PathBuf,
}

/// Parse one interchange line and add it to `groups`.
///
/// `line_no` is only used in error messages.
pub fn read_key(
    line: &str,
    line_no: usize,
    config: &ExportConfig,
    groups: &mut KeyGroups,
) -> Result<(), ExportError> {
    let record = TabRecord::parse_line(line, line_no)?;
    let term = record.term.trim();

    let definition = config.hooks.transform_definition(&record.definition);
    let definition = escape_definition(&definition, config.reflow);

    let mapped = map_chars(term, config.hooks.character_mapping());
    let key = normalize_key(&config.hooks.transform_key(&mapped));
    let exact_match = key == normalize_key(&mapped);

    if key.is_empty() {
        return Err(ExportError::MissingKey {
            term: term.to_string(),
        });
    }
    if definition.is_empty() {
        return Err(ExportError::MissingDefinition {
            term: term.to_string(),
        });
    }

    debug!(%key, term, "read key");
    groups.insert(
        key,
        LookupEntry {
            term: term.to_string(),
            definition,
            exact_match,
        },
    );
    Ok(())
}

/// Read every record line from `reader`. Blank and `#` comment lines are
/// skipped; the first bad line aborts the whole read.
pub fn read_keys<R: BufRead>(reader: R, config: &ExportConfig) -> Result<KeyGroups, ExportError> {
    let mut groups = KeyGroups::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if !is_record_line(&line) {
            continue;
        }
        read_key(&line, i + 1, config, &mut groups)?;
    }
    Ok(groups)
}

/// Base name for output files: the input file name without its extension.
pub fn basename(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "dictionary".to_string())
}

/// Convert the interchange file `input` into key files and a manifest under
/// `config.output_dir`, creating the directory if needed.
pub fn export_file(input: &Path, config: &ExportConfig) -> Result<ExportSummary, ExportError> {
    fs::create_dir_all(&config.output_dir)?;

    info!(input = %input.display(), "reading keys");
    let reader = BufReader::new(File::open(input)?);
    let groups = read_keys(reader, config)?;

    let name = basename(input);
    let files = write_keys(&groups, &name, config)?;
    let manifest = write_opf(files, &name, config)?;
    info!(
        keys = groups.len(),
        entries = groups.entry_count(),
        files,
        "export finished"
    );

    Ok(ExportSummary {
        keys: groups.len(),
        entries: groups.entry_count(),
        files,
        manifest,
    })
}
