use clap::{Parser, Subcommand};

use tabdict_cli::commands::{self, config_ops, export_ops, import_ops};
use tabdict_cli::trace_init;

#[derive(Parser)]
#[command(
    name = "tabdict",
    about = "Convert Yomichan dictionaries to tab files and Kindle dictionary sources"
)]
struct Cli {
    /// Settings TOML file (default: built-in settings)
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a lexicon into a tab file
    Import {
        /// Lexicon source format
        #[arg(long, default_value = "yomichan")]
        source: String,
        /// Definition join mode: plain, line or simplified
        #[arg(long)]
        join: Option<String>,
        /// Output tab file (default: derived from the dictionary title)
        #[arg(short, long)]
        output: Option<String>,
        /// Unpacked dictionary directory or .zip archive
        input: String,
    },
    /// Export a tab file as Mobipocket HTML key files and an OPF manifest
    Export {
        /// Language profile: identity, japanese, or a profile TOML path
        #[arg(long)]
        profile: Option<String>,
        /// Source language code written to the manifest
        #[arg(short, long)]
        source: Option<String>,
        /// Target language code written to the manifest
        #[arg(short, long)]
        target: Option<String>,
        /// Output directory
        #[arg(short, long, default_value = "opf")]
        output: String,
        /// Tab file
        file: String,
    },
    /// Show what exporting a tab file would produce
    Info {
        /// Language profile: identity, japanese, or a profile TOML path
        #[arg(long)]
        profile: Option<String>,
        /// Tab file
        file: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Export the built-in Japanese language profile as TOML
    ProfileExport,
    /// Validate a custom language profile TOML file
    ProfileValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    trace_init::init_tracing(cli.verbose, cli.log_json);

    match cli.command {
        Command::Import {
            source,
            join,
            output,
            input,
        } => {
            let settings = commands::load_settings(cli.settings.as_deref());
            import_ops::import(
                &source,
                &input,
                output.as_deref(),
                join.as_deref(),
                &settings,
            );
        }
        Command::Export {
            profile,
            source,
            target,
            output,
            file,
        } => {
            let settings = commands::load_settings(cli.settings.as_deref());
            let opts = export_ops::ExportOptions {
                profile: profile.as_deref(),
                source_language: source.as_deref(),
                target_language: target.as_deref(),
                output_dir: &output,
            };
            export_ops::export(&file, &opts, &settings);
        }
        Command::Info { profile, file } => {
            let settings = commands::load_settings(cli.settings.as_deref());
            export_ops::info(&file, profile.as_deref(), &settings);
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::ProfileExport => config_ops::profile_export(),
        Command::ProfileValidate { file } => config_ops::profile_validate(&file),
    }
}
