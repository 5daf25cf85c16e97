mod yomichan;

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use tabdict_core::import::RawEntry;

pub use yomichan::YomichanSource;

/// A pluggable lexicon source that reads structured term batches.
pub trait LexiconSource {
    /// Read every term batch under `path` (a directory or an archive), one
    /// batch per source file, in file-name order.
    fn read_batches(&self, path: &Path) -> Result<Vec<Vec<RawEntry>>, LexiconSourceError>;

    /// Dictionary title from the source's metadata, if it has one.
    fn title(&self, path: &Path) -> Result<Option<String>, LexiconSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconSourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Whether `path` should be read as a zip archive rather than a directory.
pub(crate) fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Read the files under `path` whose base names satisfy `predicate`, as
/// `(name, contents)` pairs sorted by name.
///
/// `path` may be an unpacked directory or a `.zip` archive; archive members
/// are matched on their base name, so nested folders are flattened.
pub(crate) fn read_source_files(
    path: &Path,
    predicate: impl Fn(&str) -> bool,
) -> Result<Vec<(String, String)>, LexiconSourceError> {
    let mut files = if is_archive(path) {
        read_archive_files(path, &predicate)?
    } else {
        read_dir_files(path, &predicate)?
    };
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

fn read_dir_files(
    dir: &Path,
    predicate: &impl Fn(&str) -> bool,
) -> Result<Vec<(String, String)>, LexiconSourceError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if predicate(&name) {
            let contents = fs::read_to_string(entry.path())?;
            files.push((name, contents));
        }
    }
    Ok(files)
}

fn read_archive_files(
    archive_path: &Path,
    predicate: &impl Fn(&str) -> bool,
) -> Result<Vec<(String, String)>, LexiconSourceError> {
    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;
    let mut files = Vec::new();
    for i in 0..archive.len() {
        let mut member = archive.by_index(i)?;
        if member.is_dir() {
            continue;
        }
        // Use only the basename so members cannot name paths outside the archive.
        let name = Path::new(member.name())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.is_empty() || !predicate(&name) {
            continue;
        }
        let mut contents = String::new();
        member.read_to_string(&mut contents)?;
        files.push((name, contents));
    }
    Ok(files)
}

/// Create a `LexiconSource` by name. Returns `None` for unknown source names.
pub fn from_name(name: &str) -> Option<Box<dyn LexiconSource>> {
    match name {
        "yomichan" => Some(Box::new(YomichanSource)),
        _ => None,
    }
}
