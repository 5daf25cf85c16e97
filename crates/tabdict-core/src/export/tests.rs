use std::collections::HashMap;
use std::io::{Cursor, Write};

use super::markup::write_framed;
use super::*;
use crate::hooks::{IdentityHooks, ProfileHooks};
use crate::settings::Settings;

fn config_with(hooks: Box<dyn LanguageHooks>, output_dir: &Path) -> ExportConfig {
    ExportConfig::new(hooks, &Settings::default().export, output_dir)
}

fn identity_config() -> ExportConfig {
    config_with(Box::new(IdentityHooks), Path::new("."))
}

fn read(text: &str, config: &ExportConfig) -> Result<KeyGroups, ExportError> {
    read_keys(Cursor::new(text), config)
}

fn entry(term: &str, definition: &str, exact_match: bool) -> LookupEntry {
    LookupEntry {
        term: term.to_string(),
        definition: definition.to_string(),
        exact_match,
    }
}

fn render_key(key: &str, entries: &[LookupEntry]) -> String {
    let mut buf = Vec::new();
    write_key(&mut buf, key, entries).unwrap();
    String::from_utf8(buf).unwrap()
}

/// Hooks that upper-case keys, so nothing is an exact match.
struct UpperKeys;

impl LanguageHooks for UpperKeys {
    fn transform_key(&self, key: &str) -> String {
        format!("{}x", key.to_uppercase())
    }
}

#[test]
fn read_key_round_trip_scenario() {
    let groups = read("犬\tdog\\nanimal\n", &identity_config()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups.get("犬").unwrap(),
        &[entry("犬", "dog<br/>\nanimal", true)]
    );
}

#[test]
fn read_key_trims_term_and_normalizes_key() {
    let groups = read("  Hello \"World\"  \tgreeting\n", &identity_config()).unwrap();
    let entries = groups.get("hello 'world'").unwrap();
    assert_eq!(entries[0].term, "Hello \"World\"");
    // Normalizing the untransformed term gives the same key.
    assert!(entries[0].exact_match);
}

#[test]
fn read_key_skips_comments_and_blank_lines() {
    let text = "# header comment\n\n   \n  # indented\nword\tdefinition\n";
    let groups = read(text, &identity_config()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups.entry_count(), 1);
}

#[test]
fn read_key_groups_by_normalized_key() {
    let text = "Apple\tfruit\napple\tcompany\nAPPLE\tshouting\n";
    let groups = read(text, &identity_config()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups.get("apple").unwrap().len(), 3);
}

#[test]
fn read_key_definition_hook_runs_before_escaping() {
    let hooks = ProfileHooks::from_toml("[definition]\nremove = [\"<x>\"]\n").unwrap();
    let config = config_with(Box::new(hooks), Path::new("."));
    let groups = read("a\t<x>kept<y>\n", &config).unwrap();
    assert_eq!(groups.get("a").unwrap()[0].definition, "kept&lt;y&gt;");
}

#[test]
fn read_key_mapping_and_key_hook() {
    let hooks = ProfileHooks::from_toml(
        "[mapping]\n\"ゑ\" = \"え\"\n\n[key]\nfold_katakana = true\n",
    )
    .unwrap();
    let config = config_with(Box::new(hooks), Path::new("."));
    let groups = read("ゑびす\tgod\nエビス\tbeer\nえびす\tother\n", &config).unwrap();

    let entries = groups.get("えびす").unwrap();
    assert_eq!(entries.len(), 3);
    // Mapping alone already yields the key.
    assert!(entries[0].exact_match);
    assert_eq!(entries[0].term, "ゑびす");
    // Folding katakana changes the key, so not an exact match.
    assert!(!entries[1].exact_match);
    assert!(entries[2].exact_match);
}

#[test]
fn read_key_missing_definition_names_term() {
    let err = read("word\t\n", &identity_config()).unwrap_err();
    match err {
        ExportError::MissingDefinition { term } => assert_eq!(term, "word"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_key_whitespace_definition_is_missing() {
    let err = read("word\t   \n", &identity_config()).unwrap_err();
    assert!(matches!(err, ExportError::MissingDefinition { term } if term == "word"));
}

#[test]
fn read_key_missing_key_names_term() {
    struct EmptyKeys;
    impl LanguageHooks for EmptyKeys {
        fn transform_key(&self, _key: &str) -> String {
            String::new()
        }
    }
    let config = config_with(Box::new(EmptyKeys), Path::new("."));
    let err = read("word\tdefinition\n", &config).unwrap_err();
    assert!(matches!(err, ExportError::MissingKey { term } if term == "word"));
}

#[test]
fn read_key_malformed_line_halts() {
    let text = "good\tone\nno tab here\nlater\tnever read\n";
    let err = read(text, &identity_config()).unwrap_err();
    match err {
        ExportError::Parse(TabFileError::MalformedLine { line_no, line }) => {
            assert_eq!(line_no, 2);
            assert_eq!(line, "no tab here");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err_message("no tab here").contains("no tab here"));
}

fn err_message(line: &str) -> String {
    read(line, &identity_config()).unwrap_err().to_string()
}

#[test]
fn exact_match_sorts_before_shorter_terms() {
    let entries = vec![entry("ab", "short", false), entry("abcde", "exact", true)];
    let out = render_key("abcde", &entries);
    let exact = out.find(">abcde</idx:orth>").unwrap();
    let short = out.find(">ab</idx:orth>").unwrap();
    assert!(exact < short);
}

#[test]
fn non_exact_terms_sort_by_length_then_term() {
    let entries = vec![
        entry("ccc", "3", false),
        entry("bb", "2b", false),
        entry("aa", "2a", false),
    ];
    let out = render_key("k", &entries);
    let positions: Vec<usize> = ["aa", "bb", "ccc"]
        .iter()
        .map(|t| out.find(&format!(">{t}</idx:orth>")).unwrap())
        .collect();
    assert!(positions[0] < positions[1] && positions[1] < positions[2]);
}

#[test]
fn same_term_shares_one_block() {
    let entries = vec![
        entry("犬", "dog", true),
        entry("いぬ", "dog (kana)", false),
        entry("犬", "hound", true),
    ];
    let out = render_key("犬", &entries);
    assert_eq!(out.matches("<idx:entry").count(), 2);
    assert_eq!(out.matches("<p>").count(), 3);
    assert_eq!(
        out.matches(r#"<idx:orth value="犬">犬</idx:orth>"#).count(),
        1
    );
    // Definitions keep input order within a term.
    assert!(out.find("<p>dog</p>").unwrap() < out.find("<p>hound</p>").unwrap());
}

#[test]
fn write_key_escapes_displayed_term() {
    let out = render_key("a&lt;b", &[entry("a<b", "def", true)]);
    assert!(out.contains(r#"<idx:orth value="a&lt;b">a&lt;b</idx:orth>"#));
}

#[test]
fn every_record_written_once() {
    let text = "犬\tdog\nいぬ\tdog\n犬\thound\ncat\tneko\nCat\tmusical\n";
    let groups = read(text, &identity_config()).unwrap();
    assert_eq!(groups.entry_count(), 5);

    let mut out = Vec::new();
    for (key, entries) in groups.iter() {
        write_key(&mut out, key, entries).unwrap();
    }
    let out = String::from_utf8(out).unwrap();
    for definition in ["dog", "hound", "neko", "musical"] {
        let expected = if definition == "dog" { 2 } else { 1 };
        assert_eq!(
            out.matches(&format!("<p>{definition}</p>")).count(),
            expected,
            "definition {definition}"
        );
    }
}

#[test]
fn framed_writer_closes_on_error() {
    let mut buf = Vec::new();
    let result: Result<(), ExportError> = write_framed(&mut buf, "<head>", "</head>", |out| {
        out.write_all(b"partial")?;
        Err(ExportError::MissingKey {
            term: "x".to_string(),
        })
    });
    assert!(matches!(result, Err(ExportError::MissingKey { .. })));
    assert_eq!(String::from_utf8(buf).unwrap(), "<head>partial</head>");
}

fn export_keys(n: usize, keys_per_file: usize) -> (tempfile::TempDir, usize) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_with(Box::new(IdentityHooks), dir.path());
    config.keys_per_file = keys_per_file;

    let mut groups = KeyGroups::new();
    for i in 0..n {
        groups.insert(format!("k{i:05}"), entry(&format!("k{i:05}"), "d", true));
    }
    let files = write_keys(&groups, "dict", &config).unwrap();
    (dir, files)
}

fn html_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".html"))
        .count()
}

#[test]
fn pagination_file_counts() {
    for (n, per_file, expected) in [(1, 3, 1), (3, 3, 1), (4, 3, 2), (7, 3, 3), (9, 3, 3)] {
        let (dir, files) = export_keys(n, per_file);
        assert_eq!(files, expected, "n={n} per_file={per_file}");
        assert_eq!(html_files(dir.path()), expected, "n={n} per_file={per_file}");
    }
}

#[test]
fn pagination_empty_writes_one_file() {
    let (dir, files) = export_keys(0, 3);
    assert_eq!(files, 1);
    let body = std::fs::read_to_string(key_file_path(dir.path(), "dict", 0)).unwrap();
    assert_eq!(body, format!("{KEY_FILE_HEADER}{KEY_FILE_FOOTER}"));
}

#[test]
fn pagination_default_boundary() {
    let per_file = Settings::default().export.keys_per_file;
    assert_eq!(per_file, 10_000);
    let (_dir, files) = export_keys(per_file, per_file);
    assert_eq!(files, 1);
    let (_dir, files) = export_keys(per_file + 1, per_file);
    assert_eq!(files, 2);
}

#[test]
fn pagination_keeps_key_order_across_files() {
    let (dir, _) = export_keys(5, 2);
    let first = std::fs::read_to_string(key_file_path(dir.path(), "dict", 0)).unwrap();
    let last = std::fs::read_to_string(key_file_path(dir.path(), "dict", 2)).unwrap();
    assert!(first.contains(r#"value="k00000""#));
    assert!(first.contains(r#"value="k00001""#));
    assert!(!first.contains(r#"value="k00002""#));
    assert!(last.contains(r#"value="k00004""#));
    assert!(last.ends_with(KEY_FILE_FOOTER));
}

#[test]
fn manifest_lists_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with(Box::new(IdentityHooks), dir.path());
    let path = write_opf(3, "dict", &config).unwrap();
    assert_eq!(path, manifest_path(dir.path(), "dict"));

    let opf = std::fs::read_to_string(&path).unwrap();
    assert_eq!(opf.matches("<item ").count(), 3);
    assert_eq!(opf.matches("<itemref ").count(), 3);

    let mut last = 0;
    for i in 0..3 {
        let item = opf
            .find(&format!(r#"<item id="dictionary{i}" href="dict{i}.html""#))
            .unwrap();
        assert!(item >= last);
        last = item;
    }
    let spine = opf.find("<spine>").unwrap();
    assert!(spine > last);
    for i in 0..3 {
        let itemref = opf
            .find(&format!(r#"<itemref idref="dictionary{i}"/>"#))
            .unwrap();
        assert!(itemref > last);
        last = itemref;
    }
    assert!(opf.contains("<DictionaryInLanguage>ja</DictionaryInLanguage>"));
    assert!(opf.contains("<DictionaryOutLanguage>ja</DictionaryOutLanguage>"));
    assert!(opf.trim_end().ends_with("</package>"));
}

#[test]
fn manifest_uses_configured_languages() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_with(Box::new(IdentityHooks), dir.path());
    config.target_language = "en".to_string();
    let opf = std::fs::read_to_string(write_opf(1, "jaen", &config).unwrap()).unwrap();
    assert!(opf.contains("<DictionaryOutLanguage>en</DictionaryOutLanguage>"));
    assert!(opf.contains(r#"<dc:Identifier id="uid">jaen</dc:Identifier>"#));
}

#[test]
fn export_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.tab");
    std::fs::write(&input, "# sample\n国\ta country\nくに\ta country\n犬\tdog\\nanimal\n").unwrap();
    let output_dir = dir.path().join("out").join("nested");

    let config = config_with(Box::new(IdentityHooks), &output_dir);
    let summary = export_file(&input, &config).unwrap();
    assert_eq!(summary.keys, 3);
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.files, 1);
    assert_eq!(summary.manifest, output_dir.join("sample.opf"));

    let html = std::fs::read_to_string(output_dir.join("sample0.html")).unwrap();
    assert!(html.starts_with(KEY_FILE_HEADER));
    assert!(html.contains("<p>dog<br/>\nanimal</p>"));
    assert!(html.find(r#"value="くに""#).unwrap() < html.find(r#"value="国""#).unwrap());
}

#[test]
fn export_file_aborts_before_writing_on_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.tab");
    std::fs::write(&input, "ok\tfine\nbroken\n").unwrap();
    let output_dir = dir.path().join("out");

    let config = config_with(Box::new(IdentityHooks), &output_dir);
    assert!(export_file(&input, &config).is_err());
    assert_eq!(html_files(&output_dir), 0);
}

#[test]
fn backslashes_survive_import_and_export() {
    let record = TabRecord::from_plain("path", "C:\\new folder");
    let groups = read(&record.to_line(), &identity_config()).unwrap();
    assert_eq!(groups.get("path").unwrap()[0].definition, "C:\\new folder");
}

#[test]
fn basename_from_input_path() {
    assert_eq!(basename(Path::new("/tmp/daijirin.tab")), "daijirin");
    assert_eq!(basename(Path::new("plain")), "plain");
    assert_eq!(basename(Path::new("/")), "dictionary");
}

#[test]
fn upper_key_hook_disables_exact_match() {
    let config = config_with(Box::new(UpperKeys), Path::new("."));
    let groups = read("dog\tinu\n", &config).unwrap();
    // Lower-cased again by the final normalization.
    let entries = groups.get("dogx").unwrap();
    assert!(!entries[0].exact_match);
}

#[test]
fn empty_mapping_leaves_terms() {
    assert_eq!(map_chars("犬", &HashMap::new()), "犬");
}

mod properties {
    use proptest::prelude::*;

    use super::super::normalize_key;

    fn arb_key() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop::sample::select(vec![
                'a', 'B', 'z', 'Q', '0', ' ', '\t', '"', '\'', '<', '>', '&', ';', 'é', 'É',
                'あ', 'ア', 'ー', '犬', '国', '・',
            ]),
            0..24,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn normalize_key_is_idempotent(key in arb_key()) {
            let once = normalize_key(&key);
            prop_assert_eq!(normalize_key(&once), once);
        }
    }
}
