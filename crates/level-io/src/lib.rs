//! Session I/O layer for the level calculator.
//!
//! Supplies raw readings to a [`level_core::MeasurementSession`] from an
//! interactive prompt and persists its export rows as a CSV file.

pub mod csv_sink;
pub mod prompt;

pub use csv_sink::CsvFileSink;
pub use prompt::{EntrySource, PromptReader};
