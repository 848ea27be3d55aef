//! Core domain layer for the level calculator.
//!
//! Holds the measurement session that classifies level readings, the derived
//! results and summary figures, plus errors, settings, time handling and
//! number formatting shared by the other crates.

pub mod error;
pub mod formatting;
pub mod report;
pub mod session;
pub mod settings;
pub mod time_utils;

pub use error::{LevelError, Result};
pub use session::{
    Entry, ExportRow, ExportSink, LevelResult, MeasurementSession, Outcome, SessionConfig,
};
