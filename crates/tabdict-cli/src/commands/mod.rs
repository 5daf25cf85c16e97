/// Unwrap a Result or print the error and exit.
macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod config_ops;
pub mod export_ops;
pub mod import_ops;

use std::fs;

use tabdict_core::settings::{self, Settings};

/// Load settings from `path`, or the embedded defaults when `None`.
pub fn load_settings(path: Option<&str>) -> Settings {
    match path {
        Some(path) => {
            let content = die!(fs::read_to_string(path), "Error reading {path}: {}");
            die!(
                settings::parse_settings_toml(&content),
                "Error in {path}: {}"
            )
        }
        None => Settings::default(),
    }
}
