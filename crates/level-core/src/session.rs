//! Measurement session: classifies level readings against the instrument
//! height and derives results, extrema and invalid counts from them.

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::error::{LevelError, Result};
use crate::formatting::{format_level, round_to};
use crate::time_utils::{Clock, TimezoneHandler};

/// Input that ends a session, compared case-insensitively.
pub const STOP_SENTINEL: &str = "n";

/// Decimal places kept on calculated levels.
pub const RESULT_DECIMALS: u32 = 2;

/// Field names used in configuration errors.
pub const HEIGHT_FIELD: &str = "instrument height";
pub const VARIATION_FIELD: &str = "acceptable variation";

const LEVEL_INVALID_PREFIX: &str = "Level Invalid";
const INPUT_INVALID_PREFIX: &str = "Input Invalid";

/// Parse operator text as a reading. Surrounding whitespace is ignored.
fn parse_reading(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

// ── SessionConfig ─────────────────────────────────────────────────────────────

/// Instrument height and tolerance for one session.
///
/// Values are kept verbatim. A zero variation accepts exact readings only and
/// a negative one rejects every reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub instrument_height: f64,
    pub acceptable_variation: f64,
}

impl SessionConfig {
    pub fn new(instrument_height: f64, acceptable_variation: f64) -> Self {
        Self {
            instrument_height,
            acceptable_variation,
        }
    }

    /// Parse both values from operator text.
    ///
    /// Fails with [`LevelError::InvalidConfig`] on the first value that is not
    /// a number.
    pub fn parse(instrument_height: &str, acceptable_variation: &str) -> Result<Self> {
        Ok(Self::new(
            Self::parse_field(HEIGHT_FIELD, instrument_height)?,
            Self::parse_field(VARIATION_FIELD, acceptable_variation)?,
        ))
    }

    /// Parse a single configuration value, naming `field` on failure.
    pub fn parse_field(field: &'static str, text: &str) -> Result<f64> {
        parse_reading(text).ok_or_else(|| LevelError::InvalidConfig {
            field,
            value: text.to_string(),
        })
    }

    /// Whether `value` lies within the acceptable variation (inclusive).
    pub fn accepts(&self, value: f64) -> bool {
        (self.instrument_height - value).abs() <= self.acceptable_variation
    }

    /// Whether `value` is measurably further away than the variation allows.
    ///
    /// False for a deviation that is not a number, so a `nan` reading is
    /// neither accepted nor out of variation.
    pub fn exceeds(&self, value: f64) -> bool {
        (self.instrument_height - value).abs() > self.acceptable_variation
    }
}

// ── Entry ─────────────────────────────────────────────────────────────────────

/// One recorded reading, classified when it was entered.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Numeric and within the acceptable variation.
    Valid { raw: String, value: f64 },
    /// Numeric but further from the instrument height than allowed.
    OutOfVariation { raw: String, value: f64 },
    /// Not a usable number (`nan` included).
    Malformed { raw: String },
}

impl Entry {
    /// Classify `raw` against `config`.
    pub fn classify(raw: &str, config: &SessionConfig) -> Self {
        let raw = raw.to_string();
        match parse_reading(&raw) {
            Some(value) if config.accepts(value) => Entry::Valid { raw, value },
            Some(value) if config.exceeds(value) => Entry::OutOfVariation { raw, value },
            _ => Entry::Malformed { raw },
        }
    }

    /// The operator's text exactly as entered.
    pub fn raw(&self) -> &str {
        match self {
            Entry::Valid { raw, .. }
            | Entry::OutOfVariation { raw, .. }
            | Entry::Malformed { raw } => raw,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Entry::Valid { .. })
    }

    /// Derive the result for this entry under `config`.
    pub fn result(&self, config: &SessionConfig) -> LevelResult {
        match self {
            Entry::Valid { value, .. } => {
                LevelResult::Level(round_to(config.instrument_height - value, RESULT_DECIMALS))
            }
            Entry::OutOfVariation { raw, .. } => LevelResult::LevelInvalid(raw.clone()),
            Entry::Malformed { raw } => LevelResult::InputInvalid(raw.clone()),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}

// ── LevelResult ───────────────────────────────────────────────────────────────

/// Calculated value for one entry, or a marker explaining why there is none.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelResult {
    /// Instrument height minus the reading, rounded to two decimals.
    Level(f64),
    /// Reading was numeric but out of variation; carries the text as entered.
    LevelInvalid(String),
    /// Reading was not a number; carries the text as entered.
    InputInvalid(String),
}

impl LevelResult {
    /// The numeric level, if this result has one.
    pub fn level(&self) -> Option<f64> {
        match self {
            LevelResult::Level(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for LevelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelResult::Level(v) => f.write_str(&format_level(*v)),
            LevelResult::LevelInvalid(raw) => write!(f, "{}: {}", LEVEL_INVALID_PREFIX, raw),
            LevelResult::InputInvalid(raw) => write!(f, "{}: {}", INPUT_INVALID_PREFIX, raw),
        }
    }
}

/// Numbers serialise as JSON numbers, markers as their display text.
impl Serialize for LevelResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            LevelResult::Level(v) => serializer.serialize_f64(*v),
            other => serializer.collect_str(other),
        }
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// What the caller should do after [`MeasurementSession::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Stop,
}

// ── Export ────────────────────────────────────────────────────────────────────

/// One row of the export table; an empty row is a blank line.
pub type ExportRow = Vec<String>;

/// Destination for a session's export rows.
pub trait ExportSink {
    /// Persist `rows` under `case_name`.
    fn write_rows(&mut self, case_name: &str, rows: &[ExportRow]) -> std::io::Result<()>;
}

// ── MeasurementSession ────────────────────────────────────────────────────────

/// A single run of level readings against one instrument setup.
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    config: SessionConfig,
    entries: Vec<Entry>,
    created_at: DateTime<Tz>,
}

impl MeasurementSession {
    /// Start a session, stamping it with `clock` in the handler's timezone.
    pub fn new(config: SessionConfig, clock: &dyn Clock, timezone: &TimezoneHandler) -> Self {
        let created_at = timezone.now(clock);
        info!(
            "Session started at {} (instrument height {}, acceptable variation {})",
            created_at.format("%Y/%m/%d_%H:%M"),
            config.instrument_height,
            config.acceptable_variation
        );
        Self {
            config,
            entries: Vec::new(),
            created_at,
        }
    }

    /// Recorded entries in measurement order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Session stamp in `YYYY/MM/DD_HH:MM` form.
    pub fn session_label(&self) -> String {
        self.created_at.format("%Y/%m/%d_%H:%M").to_string()
    }

    /// Case name safe for use in a file name, derived from the session stamp.
    pub fn default_case_name(&self) -> String {
        self.created_at.format("%Y%m%d_%H%M").to_string()
    }

    /// Record one line of operator input.
    ///
    /// The stop sentinel ends the session without appending anything; every
    /// other input is classified and appended. Callers stop feeding input
    /// once [`Outcome::Stop`] is returned.
    pub fn record(&mut self, raw_input: &str) -> Outcome {
        if raw_input.eq_ignore_ascii_case(STOP_SENTINEL) {
            debug!("Stop sentinel received after {} entries", self.entries.len());
            return Outcome::Stop;
        }

        let entry = Entry::classify(raw_input, &self.config);
        debug!("Recorded entry #{}: {:?}", self.entries.len() + 1, entry);
        self.entries.push(entry);
        Outcome::Continue
    }

    /// One result per entry, in the same order.
    pub fn results(&self) -> Vec<LevelResult> {
        self.entries
            .iter()
            .map(|entry| entry.result(&self.config))
            .collect()
    }

    fn levels(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.result(&self.config).level())
    }

    /// Largest calculated level, or `0.0` when there is no valid entry.
    pub fn highest_point_level(&self) -> f64 {
        self.levels().reduce(f64::max).unwrap_or(0.0)
    }

    /// Smallest calculated level, or `0.0` when there is no valid entry.
    pub fn lowest_point_level(&self) -> f64 {
        self.levels().reduce(f64::min).unwrap_or(0.0)
    }

    pub fn valid_points(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid()).count()
    }

    /// Entries without a numeric result, of either kind.
    pub fn invalid_points(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_valid()).count()
    }

    /// Numeric entries outside the acceptable variation.
    pub fn invalid_level_points(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::OutOfVariation { .. }))
            .count()
    }

    /// Entries that were not numbers.
    pub fn invalid_inputs(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Malformed { .. }))
            .count()
    }

    /// Shape the export table: configuration header and values, a blank row,
    /// then one `(input, result)` row per entry.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let mut rows: Vec<ExportRow> = Vec::with_capacity(self.entries.len() + 4);
        rows.push(vec![
            "Instrument Height".to_string(),
            "Acceptable Variation".to_string(),
        ]);
        rows.push(vec![
            format_level(self.config.instrument_height),
            format_level(self.config.acceptable_variation),
        ]);
        rows.push(Vec::new());
        rows.push(vec![
            "User Inputs".to_string(),
            "Calculated Result".to_string(),
        ]);
        rows.extend(
            self.entries
                .iter()
                .map(|entry| vec![entry.raw().to_string(), entry.result(&self.config).to_string()]),
        );
        rows
    }

    /// Hand the export table to `sink` under `case_name`.
    pub fn export(&self, case_name: &str, sink: &mut dyn ExportSink) -> Result<()> {
        let rows = self.export_rows();
        sink.write_rows(case_name, &rows)?;
        info!(
            "Exported {} entries for case \"{}\"",
            self.entries.len(),
            case_name
        );
        Ok(())
    }
}

impl fmt::Display for MeasurementSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instrument Height: {}", format_level(self.config.instrument_height))?;
        writeln!(
            f,
            "Acceptable Variation: {}",
            format_level(self.config.acceptable_variation)
        )?;
        let points: Vec<&str> = self.entries.iter().map(Entry::raw).collect();
        writeln!(f, "Level Points: [{}]", points.join(", "))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
