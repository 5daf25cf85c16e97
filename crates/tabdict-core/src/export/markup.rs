use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::normalize::escape_term;
use super::{ExportConfig, ExportError, KeyGroups, LookupEntry};

pub const KEY_FILE_HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns:idx="www.mobipocket.com" xmlns:mbp="www.mobipocket.com" xmlns:xlink="http://www.w3.org/1999/xlink">
  <body>
    <mbp:pagebreak/>
    <mbp:frameset>
      <mbp:slave-frame display="bottom" device="all" breadth="auto" leftmargin="0" rightmargin="0" bottommargin="0" topmargin="0">
        <div align="center" bgcolor="yellow">
        <a onclick="index_search()">Dictionary Search</a>
        </div>
      </mbp:slave-frame>
      <mbp:pagebreak/>
"#;

pub const KEY_FILE_FOOTER: &str = "
    </mbp:frameset>
  </body>
</html>
";

/// Write `header`, run `body`, then write `footer` and flush.
///
/// The footer is written on every path, including when `body` fails, so a
/// file cut short by an error is still closed. The body's error wins over a
/// footer error.
pub(super) fn write_framed<W, T>(
    out: &mut W,
    header: &str,
    footer: &str,
    body: impl FnOnce(&mut W) -> Result<T, ExportError>,
) -> Result<T, ExportError>
where
    W: Write,
{
    out.write_all(header.as_bytes())?;
    let result = body(out);
    let closed = out.write_all(footer.as_bytes()).and_then(|()| out.flush());
    let value = result?;
    closed?;
    Ok(value)
}

/// Display order inside a key: exact matches first, then shorter terms, then
/// terms in code point order.
fn sort_rank(entry: &LookupEntry) -> (usize, &str) {
    let len = if entry.exact_match {
        0
    } else {
        entry.term.chars().count()
    };
    (len, entry.term.as_str())
}

/// Write all entries of one lookup key.
///
/// Entries sharing a term become one `<idx:entry>` block with a `<p>` per
/// definition.
pub fn write_key<W: Write>(out: &mut W, key: &str, entries: &[LookupEntry]) -> io::Result<()> {
    let mut sorted: Vec<&LookupEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| sort_rank(a).cmp(&sort_rank(b)));

    for block in sorted.chunk_by(|a, b| a.term == b.term) {
        let term = escape_term(&block[0].term);
        write!(
            out,
            r#"
      <idx:entry name="word" scriptable="yes">
        <h2>
          <idx:orth value="{key}">{term}</idx:orth>
        </h2>
"#
        )?;
        for entry in block {
            writeln!(out, "        <p>{}</p>", entry.definition)?;
        }
        writeln!(out, "      </idx:entry>")?;
    }
    debug!(key, entries = entries.len(), "wrote key");
    Ok(())
}

pub fn key_file_path(dir: &Path, name: &str, index: usize) -> PathBuf {
    dir.join(format!("{name}{index}.html"))
}

/// Write every key, in order, to `{name}{index}.html` files of at most
/// `keys_per_file` keys each. Returns the number of files written.
///
/// An empty dictionary still produces one (empty) file so the manifest always
/// has content to reference.
pub fn write_keys(
    groups: &KeyGroups,
    name: &str,
    config: &ExportConfig,
) -> Result<usize, ExportError> {
    let keys: Vec<(&str, &[LookupEntry])> = groups.iter().collect();
    let chunks: Vec<&[(&str, &[LookupEntry])]> = if keys.is_empty() {
        vec![&keys[..]]
    } else {
        keys.chunks(config.keys_per_file.max(1)).collect()
    };

    for (index, chunk) in chunks.iter().enumerate() {
        let path = key_file_path(&config.output_dir, name, index);
        debug!(path = %path.display(), keys = chunk.len(), "writing key file");
        let mut out = BufWriter::new(File::create(&path)?);
        write_framed(&mut out, KEY_FILE_HEADER, KEY_FILE_FOOTER, |out| {
            for (key, entries) in chunk.iter() {
                write_key(out, key, entries)?;
            }
            Ok(())
        })?;
    }

    Ok(chunks.len())
}
