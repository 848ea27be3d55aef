use clap::Parser;
use std::path::PathBuf;

use crate::time_utils::{resolve_timezone_name, DEFAULT_TIMEZONE};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Record level readings, validate them against an instrument height and
/// export the results to CSV
///
/// Every flag is optional; values not given on the command line are prompted
/// for interactively.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "level-calc",
    about = "Record and validate surveying level readings",
    version
)]
pub struct Settings {
    /// Instrument height (prompted when omitted)
    #[arg(long)]
    pub instrument_height: Option<String>,

    /// Acceptable variation from the instrument height (prompted when omitted)
    #[arg(long)]
    pub acceptable_variation: Option<String>,

    /// Case name used for the export file (prompted when omitted)
    #[arg(long)]
    pub case_name: Option<String>,

    /// Directory the CSV export is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Reference timezone for session stamps ("auto" for the system timezone)
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Summary format printed after the readings are taken
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub report: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Resolve the `"auto"` timezone and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        settings.timezone = resolve_timezone_name(&settings.timezone);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
