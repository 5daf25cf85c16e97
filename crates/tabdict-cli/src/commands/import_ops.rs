use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use crate::lexicon_source;
use tabdict_core::import::{import_batches, ImportOptions, JoinMode};
use tabdict_core::settings::Settings;
use tabdict_core::tabfile;

/// Interchange file name for a dictionary title: path separators and
/// characters that are awkward in file names become `_`.
pub fn output_name_for_title(title: &str) -> String {
    let name: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{name}.tab")
}

/// Where the interchange file goes: `-o` if given, else a name derived from
/// the dictionary title, else the configured default.
pub fn resolve_output_path(
    output: Option<&str>,
    title: Option<&str>,
    default_output: &str,
) -> PathBuf {
    match (output, title) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some(title)) => PathBuf::from(output_name_for_title(title)),
        (None, None) => PathBuf::from(default_output),
    }
}

pub fn import(
    source_name: &str,
    input: &str,
    output: Option<&str>,
    join: Option<&str>,
    settings: &Settings,
) {
    let source = lexicon_source::from_name(source_name).unwrap_or_else(|| {
        eprintln!("Error: unknown source '{source_name}' (available: yomichan)");
        process::exit(1);
    });

    let input_path = Path::new(input);
    if !input_path.exists() {
        eprintln!("Error: {input} does not exist");
        process::exit(1);
    }

    let mut options = ImportOptions::from_settings(&settings.import);
    if let Some(join) = join {
        options.join = die!(join.parse::<JoinMode>(), "Error: {}");
    }

    let title = match output {
        Some(_) => None,
        None => die!(source.title(input_path), "Error reading dictionary index: {}"),
    };
    let output_path =
        resolve_output_path(output, title.as_deref(), &settings.import.default_output);

    eprintln!("Source: {source_name} (join: {})", options.join);
    let batches = die!(source.read_batches(input_path), "Error reading lexicon: {}");
    let row_count: usize = batches.iter().map(Vec::len).sum();
    eprintln!("Read {} batches ({row_count} entries)", batches.len());

    let records = import_batches(batches, &options);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        die!(fs::create_dir_all(parent), "Error creating {}: {}", parent.display());
    }
    let file = die!(
        File::create(&output_path),
        "Error creating {}: {}",
        output_path.display()
    );
    die!(
        tabfile::write_records(BufWriter::new(file), &records),
        "Error writing {}: {}",
        output_path.display()
    );

    eprintln!("Wrote {} ({} records)", output_path.display(), records.len());
}
