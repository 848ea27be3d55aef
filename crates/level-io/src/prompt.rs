//! Interactive entry source: prompts the operator and feeds a session.

use std::io::{BufRead, Write};

use level_core::error::{LevelError, Result};
use level_core::session::{
    MeasurementSession, Outcome, SessionConfig, HEIGHT_FIELD, VARIATION_FIELD,
};
use tracing::{debug, warn};

pub const HEIGHT_PROMPT: &str = "Please Enter the Instrument Height of the measurement: ";
pub const VARIATION_PROMPT: &str = "Enter the acceptable variation: ";
pub const LEVEL_PROMPT: &str = "Input Measured level, type (n) to quit: \n";
pub const CASE_NAME_PROMPT: &str = "Enter the case name: ";

// ── EntrySource ───────────────────────────────────────────────────────────────

/// Supplies raw operator input one line at a time.
pub trait EntrySource {
    /// Show `prompt` and read one line without its terminator.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;
}

/// [`EntrySource`] over any reader / writer pair, typically stdin and stdout.
pub struct PromptReader<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect what was prompted.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl PromptReader<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on stdout and read from stdin.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> EntrySource for PromptReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        // Only the terminator is removed; other whitespace is operator input.
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

// ── Session driving ───────────────────────────────────────────────────────────

/// Resolve one configuration value: `preset` when given, otherwise prompt.
///
/// The value is parsed immediately so a bad entry fails before the next
/// prompt. Input that ends before a value is given is reported as an invalid
/// configuration for that value.
pub fn config_value(
    source: &mut dyn EntrySource,
    preset: Option<&str>,
    prompt: &str,
    field: &'static str,
) -> Result<f64> {
    let text = match preset {
        Some(text) => text.to_string(),
        None => source
            .read_line(prompt)?
            .ok_or(LevelError::InvalidConfig {
                field,
                value: String::new(),
            })?,
    };
    SessionConfig::parse_field(field, &text)
}

/// Resolve the instrument height and acceptable variation, prompting for
/// whichever is not preset.
pub fn collect_config(
    source: &mut dyn EntrySource,
    preset_height: Option<&str>,
    preset_variation: Option<&str>,
) -> Result<SessionConfig> {
    let height = config_value(source, preset_height, HEIGHT_PROMPT, HEIGHT_FIELD)?;
    let variation = config_value(source, preset_variation, VARIATION_PROMPT, VARIATION_FIELD)?;
    Ok(SessionConfig::new(height, variation))
}

/// Read level points into `session` until the stop sentinel or end of input.
///
/// Returns the number of entries recorded by this call.
pub fn take_level_points(
    session: &mut MeasurementSession,
    source: &mut dyn EntrySource,
) -> Result<usize> {
    let before = session.entries().len();
    loop {
        let Some(line) = source.read_line(LEVEL_PROMPT)? else {
            warn!("Input ended without the stop sentinel; finishing the session");
            break;
        };
        if session.record(&line) == Outcome::Stop {
            break;
        }
    }
    let recorded = session.entries().len() - before;
    debug!("Took {} level points", recorded);
    Ok(recorded)
}

/// Ask for the export case name.
///
/// An empty answer, or end of input, yields `None`.
pub fn read_case_name(source: &mut dyn EntrySource) -> Result<Option<String>> {
    let name = source.read_line(CASE_NAME_PROMPT)?;
    Ok(name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
