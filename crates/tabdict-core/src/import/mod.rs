//! Lexicon batches → interchange records.
//!
//! Each batch is expanded with reading-only entries, its definition segments
//! are joined, and its headwords are cleaned. The union of all batches is then
//! deduplicated, filtered and sorted by headword.

mod headword;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info};

use crate::settings::ImportSettings;
use crate::tabfile::TabRecord;

pub use headword::{cleanup_headword, reconcile_mixed_script, MIXED_SCRIPT_SEPARATOR};

/// Marks an archaic-reading cross reference in a definition header.
pub const DASH_MARKER: char = '―';

/// One structured lexicon row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub headword: String,
    /// Phonetic reading; empty when the headword is its own reading.
    pub reading: String,
    pub definition_parts: Vec<String>,
}

impl RawEntry {
    pub fn new(headword: &str, reading: &str, definition_parts: &[&str]) -> Self {
        Self {
            headword: headword.to_string(),
            reading: reading.to_string(),
            definition_parts: definition_parts.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How definition segments are joined into one definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Segments separated by a single space.
    #[default]
    Plain,
    /// Segments separated by newlines.
    Line,
    /// Like `Line`, with dash-marked archaic readings removed from each header.
    Simplified,
}

impl JoinMode {
    pub fn join(self, parts: &[String]) -> String {
        match self {
            Self::Plain => parts.join(" "),
            Self::Line => parts.join("\n"),
            Self::Simplified => parts
                .iter()
                .map(|part| strip_dash_marker(part))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl FromStr for JoinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "line" => Ok(Self::Line),
            "simplified" => Ok(Self::Simplified),
            _ => Err(format!(
                "unknown join mode '{s}' (available: plain, line, simplified)"
            )),
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Line => "line",
            Self::Simplified => "simplified",
        })
    }
}

/// Drop the header token right after the first one when it starts with
/// [`DASH_MARKER`]. The header is the segment's first line; anything that
/// does not have that shape is returned unchanged.
fn strip_dash_marker(segment: &str) -> String {
    let (header, body) = match segment.split_once('\n') {
        Some((header, body)) => (header, Some(body)),
        None => (segment, None),
    };
    let mut tokens: Vec<&str> = header.split(' ').collect();
    if !tokens.get(1).is_some_and(|t| t.starts_with(DASH_MARKER)) {
        return segment.to_string();
    }
    tokens.remove(1);
    let header = tokens.join(" ");
    match body {
        Some(body) => format!("{header}\n{body}"),
        None => header,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub join: JoinMode,
}

impl ImportOptions {
    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self {
            join: settings.join,
        }
    }
}

/// Add a reading-keyed copy of every entry that has a reading, then order the
/// batch by reading, descending.
pub fn expand_readings(batch: Vec<RawEntry>) -> Vec<RawEntry> {
    let alternates: Vec<RawEntry> = batch
        .iter()
        .filter(|e| !e.reading.is_empty())
        .map(|e| RawEntry {
            headword: e.reading.clone(),
            ..e.clone()
        })
        .collect();

    let mut rows = batch;
    rows.extend(alternates);
    rows.sort_by(|a, b| b.reading.cmp(&a.reading));
    rows
}

/// Expand one batch and flatten it to `(headword, definition)` rows.
///
/// Definitions still contain literal newlines; rows are neither deduplicated
/// nor filtered here.
pub fn process_batch(batch: Vec<RawEntry>, options: &ImportOptions) -> Vec<(String, String)> {
    expand_readings(batch)
        .into_iter()
        .map(|entry| {
            let definition = options.join.join(&entry.definition_parts);
            let headword =
                cleanup_headword(&reconcile_mixed_script(&entry.headword, &entry.reading));
            (headword, definition)
        })
        .collect()
}

/// Run the whole import over `batches` and return the records to write, in
/// output order.
pub fn import_batches<I>(batches: I, options: &ImportOptions) -> Vec<TabRecord>
where
    I: IntoIterator<Item = Vec<RawEntry>>,
{
    let mut rows: Vec<(String, String)> = Vec::new();
    let mut batch_count = 0usize;
    for batch in batches {
        batch_count += 1;
        let processed = process_batch(batch, options);
        debug!(batch = batch_count, rows = processed.len(), "processed batch");
        rows.extend(processed);
    }
    let total = rows.len();

    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(rows.len());
    rows.retain(|row| seen.insert(row.clone()));
    let unique = rows.len();

    rows.retain(|(headword, definition)| !headword.is_empty() && !definition.is_empty());
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    info!(
        batches = batch_count,
        rows = total,
        duplicates = total - unique,
        empty = unique - rows.len(),
        "import finished"
    );

    rows.into_iter()
        .map(|(headword, definition)| TabRecord::from_plain(headword, &definition))
        .collect()
}
