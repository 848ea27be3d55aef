mod bootstrap;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use level_core::report::SessionReport;
use level_core::session::MeasurementSession;
use level_core::settings::Settings;
use level_core::time_utils::{Clock, SystemClock, TimezoneHandler};
use level_io::prompt::{self, EntrySource, PromptReader};
use level_io::CsvFileSink;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;
    bootstrap::ensure_output_dir(&settings.output_dir)?;

    tracing::info!("Level calculator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Timezone: {}, Report: {}, Output: {}",
        settings.timezone,
        settings.report,
        settings.output_dir.display()
    );

    let mut source = PromptReader::stdio();
    let mut stdout = std::io::stdout();
    run(&settings, &SystemClock, &mut source, &mut stdout)?;

    Ok(())
}

/// Drive one session end-to-end and return the path of the written export.
fn run(
    settings: &Settings,
    clock: &dyn Clock,
    source: &mut dyn EntrySource,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    writeln!(out, "Welcome to the level calculator!\n")?;

    let config = prompt::collect_config(
        source,
        settings.instrument_height.as_deref(),
        settings.acceptable_variation.as_deref(),
    )?;

    let timezone = TimezoneHandler::new(&settings.timezone);
    let mut session = MeasurementSession::new(config, clock, &timezone);
    prompt::take_level_points(&mut session, source)?;
    tracing::debug!("Session state:\n{}", session);

    let report = SessionReport::from_session(&session);
    writeln!(out, "{}", report.render(&settings.report)?)?;

    let preset_case = settings
        .case_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    let case_name = match preset_case {
        Some(name) => name,
        None => prompt::read_case_name(source)?.unwrap_or_else(|| {
            let name = session.default_case_name();
            tracing::info!("No case name given, using \"{}\"", name);
            name
        }),
    };

    let mut sink = CsvFileSink::new(&settings.output_dir);
    session.export(&case_name, &mut sink)?;

    let path = sink.path_for(&case_name);
    writeln!(out, "Results exported to {}", path.display())?;
    Ok(path)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
