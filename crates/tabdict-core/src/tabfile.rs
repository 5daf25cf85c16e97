//! Tab-separated interchange format.
//!
//! One record per line: `term\tdefinition`. Newlines inside a definition are
//! stored as the two-character escape `\n` so every record stays on one line,
//! and literal backslashes are doubled.
//! Lines that are blank, or whose first non-whitespace character is `#`, carry
//! no record.

use std::io::{self, Write};

#[derive(Debug, thiserror::Error)]
pub enum TabFileError {
    #[error("bad line {line_no}: '{line}' (expected term<TAB>definition)")]
    MalformedLine { line_no: usize, line: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A record in its serialized form: `definition` holds `\n` escapes, never
/// literal newlines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabRecord {
    pub term: String,
    pub definition: String,
}

impl TabRecord {
    /// Build a record from a plain definition, escaping backslashes and
    /// newlines.
    pub fn from_plain(term: impl Into<String>, definition: &str) -> Self {
        Self {
            term: term.into(),
            definition: definition.replace('\\', "\\\\").replace('\n', "\\n"),
        }
    }

    /// Split `line` on its first tab. Both halves are kept verbatim.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, TabFileError> {
        let (term, definition) = line
            .split_once('\t')
            .ok_or_else(|| TabFileError::MalformedLine {
                line_no,
                line: line.to_string(),
            })?;
        Ok(Self {
            term: term.to_string(),
            definition: definition.to_string(),
        })
    }

    pub fn to_line(&self) -> String {
        format!("{}\t{}", self.term, self.definition)
    }
}

/// Whether `line` carries a record (not blank, not a `#` comment).
pub fn is_record_line(line: &str) -> bool {
    let s = line.trim_start();
    !s.is_empty() && !s.starts_with('#')
}

/// Write one line per record.
pub fn write_records<W: Write>(mut out: W, records: &[TabRecord]) -> io::Result<()> {
    for record in records {
        writeln!(out, "{}", record.to_line())?;
    }
    out.flush()
}
