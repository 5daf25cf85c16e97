use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use tabdict_core::export::{self, ExportConfig, KeyGroups};
use tabdict_core::hooks::{self, LanguageHooks, ProfileError, ProfileHooks, BUILTIN_PROFILES};
use tabdict_core::settings::Settings;

/// Resolve `--profile`: a built-in profile name, or a path to a profile TOML.
pub fn load_hooks(profile: Option<&str>) -> Result<Box<dyn LanguageHooks>, ProfileError> {
    match profile {
        None => hooks::from_name("identity"),
        Some(name) if BUILTIN_PROFILES.contains(&name) => hooks::from_name(name),
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                return Err(ProfileError::UnknownProfile(path.display().to_string()));
            }
            Ok(Box::new(ProfileHooks::open(path)?))
        }
    }
}

/// Export-time overrides taken from the command line.
pub struct ExportOptions<'a> {
    pub profile: Option<&'a str>,
    pub source_language: Option<&'a str>,
    pub target_language: Option<&'a str>,
    pub output_dir: &'a str,
}

fn build_config(opts: &ExportOptions<'_>, settings: &Settings) -> ExportConfig {
    let hooks = die!(load_hooks(opts.profile), "Error loading profile: {}");
    let mut config = ExportConfig::new(hooks, &settings.export, PathBuf::from(opts.output_dir));
    if let Some(source) = opts.source_language {
        config.source_language = source.to_string();
    }
    if let Some(target) = opts.target_language {
        config.target_language = target.to_string();
    }
    config
}

pub fn export(input: &str, opts: &ExportOptions<'_>, settings: &Settings) {
    let input_path = Path::new(input);
    if !input_path.is_file() {
        eprintln!("Error: {input} is not a file");
        process::exit(1);
    }

    let config = build_config(opts, settings);
    eprintln!(
        "Exporting {input} ({} -> {}) to {}...",
        config.source_language,
        config.target_language,
        config.output_dir.display()
    );

    let summary = die!(
        export::export_file(input_path, &config),
        "Error exporting dictionary: {}"
    );

    eprintln!(
        "  {} keys, {} entries in {} HTML file(s)",
        summary.keys, summary.entries, summary.files
    );
    eprintln!("Wrote {}", summary.manifest.display());
}

/// What an export of a set of key groups would produce.
#[derive(Debug, PartialEq, Eq)]
pub struct ExportStats {
    pub entries: usize,
    pub keys: usize,
    pub exact_matches: usize,
    /// Key with the most entries; the first such key on ties.
    pub largest_key: Option<(String, usize)>,
    pub files: usize,
}

impl ExportStats {
    pub fn collect(groups: &KeyGroups, keys_per_file: usize) -> Self {
        let exact_matches = groups
            .iter()
            .flat_map(|(_, entries)| entries.iter())
            .filter(|e| e.exact_match)
            .count();
        let mut largest_key: Option<(String, usize)> = None;
        for (key, entries) in groups.iter() {
            if largest_key.as_ref().map_or(true, |(_, n)| entries.len() > *n) {
                largest_key = Some((key.to_string(), entries.len()));
            }
        }
        Self {
            entries: groups.entry_count(),
            keys: groups.len(),
            exact_matches,
            largest_key,
            files: groups.len().div_ceil(keys_per_file.max(1)).max(1),
        }
    }
}

pub fn info(input: &str, profile: Option<&str>, settings: &Settings) {
    let opts = ExportOptions {
        profile,
        source_language: None,
        target_language: None,
        output_dir: ".",
    };
    let config = build_config(&opts, settings);

    let file = die!(File::open(input), "Error opening {input}: {}");
    let groups = die!(
        export::read_keys(BufReader::new(file), &config),
        "Error reading {input}: {}"
    );

    let stats = ExportStats::collect(&groups, config.keys_per_file);
    let largest = stats
        .largest_key
        .map(|(key, count)| format!("{key} ({count})"))
        .unwrap_or_else(|| "-".to_string());

    println!("File:        {input}");
    println!("Entries:     {}", stats.entries);
    println!("Keys:        {}", stats.keys);
    println!("Exact match: {}", stats.exact_matches);
    println!("Largest key: {largest}");
    println!("HTML files:  {} (at {} keys per file)", stats.files, config.keys_per_file);
}
