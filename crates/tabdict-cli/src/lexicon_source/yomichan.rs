use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{read_source_files, LexiconSource, LexiconSourceError};
use tabdict_core::import::RawEntry;

const INDEX_FILE: &str = "index.json";

/// Yomichan term-bank dictionary, unpacked or as the original zip.
///
/// Every `*.json` file whose name does not start with `index` is a term bank:
/// a JSON array of rows
/// `[expression, reading, definition_tags, rules, score, glossary, sequence, term_tags]`.
/// `index.json` carries the dictionary title.
pub struct YomichanSource;

#[derive(Deserialize)]
struct IndexMeta {
    title: Option<String>,
}

fn is_term_bank(name: &str) -> bool {
    name.ends_with(".json") && !name.starts_with("index")
}

/// Text of one glossary item. Plain strings are used as-is, structured items
/// contribute their `text` field; anything else (images, nested content) has
/// no plain-text form.
fn gloss_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("text").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Parse one term-bank file into entries. `file` is only used in messages.
pub(crate) fn parse_term_bank(json: &str, file: &str) -> Result<Vec<RawEntry>, LexiconSourceError> {
    let rows: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| LexiconSourceError::Parse(format!("{file}: {e}")))?;

    let mut entries = Vec::with_capacity(rows.len());
    let mut skipped_glosses = 0usize;
    for (i, row) in rows.iter().enumerate() {
        let fields = row.as_array().ok_or_else(|| {
            LexiconSourceError::Parse(format!("{file}: row {i} is not an array"))
        })?;
        let headword = fields.first().and_then(Value::as_str).ok_or_else(|| {
            LexiconSourceError::Parse(format!("{file}: row {i} has no expression"))
        })?;
        let reading = fields.get(1).and_then(Value::as_str).unwrap_or_default();

        let glossary = fields.get(5).and_then(Value::as_array);
        let definition_parts: Vec<String> = glossary
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let text = gloss_text(item);
                        if text.is_none() {
                            skipped_glosses += 1;
                        }
                        text
                    })
                    .collect()
            })
            .unwrap_or_default();

        entries.push(RawEntry {
            headword: headword.to_string(),
            reading: reading.to_string(),
            definition_parts,
        });
    }

    if skipped_glosses > 0 {
        warn!(file, skipped = skipped_glosses, "skipped glossary items without text");
    }
    debug!(file, entries = entries.len(), "parsed term bank");
    Ok(entries)
}

impl LexiconSource for YomichanSource {
    fn read_batches(&self, path: &Path) -> Result<Vec<Vec<RawEntry>>, LexiconSourceError> {
        let files = read_source_files(path, is_term_bank)?;
        if files.is_empty() {
            return Err(LexiconSourceError::Parse(format!(
                "no term bank *.json files found in {}",
                path.display()
            )));
        }

        files
            .iter()
            .map(|(name, contents)| {
                eprintln!("Reading {name}...");
                parse_term_bank(contents, name)
            })
            .collect()
    }

    fn title(&self, path: &Path) -> Result<Option<String>, LexiconSourceError> {
        let files = read_source_files(path, |name| name == INDEX_FILE)?;
        let Some((_, contents)) = files.first() else {
            return Ok(None);
        };
        let meta: IndexMeta = serde_json::from_str(contents)
            .map_err(|e| LexiconSourceError::Parse(format!("{INDEX_FILE}: {e}")))?;
        Ok(meta.title.filter(|t| !t.trim().is_empty()))
    }
}
