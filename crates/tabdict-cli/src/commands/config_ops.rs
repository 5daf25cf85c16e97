use std::fs;

use tabdict_core::hooks::ProfileHooks;
use tabdict_core::settings;

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: import.join={}, export.keys_per_file={}, export.source_language={}, export.target_language={}",
        s.import.join, s.export.keys_per_file, s.export.source_language, s.export.target_language
    );
}

pub fn profile_export() {
    print!("{}", tabdict_core::hooks::JAPANESE_PROFILE_TOML);
}

pub fn profile_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let profile = die!(tabdict_core::hooks::parse_profile_toml(&content), "Error: {}");
    let mappings = profile.mapping.len();
    let removed = profile.key.remove.len();
    die!(ProfileHooks::from_profile(profile), "Error: {}");
    println!("OK: {mappings} mappings, {removed} key characters removed");
}
