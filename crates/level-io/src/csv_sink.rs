//! CSV export sink: writes a session's rows to `{case_name}_measurement.csv`.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use level_core::session::{ExportRow, ExportSink};
use tracing::info;

/// Suffix appended to the case name to form the export file name.
pub const FILE_SUFFIX: &str = "_measurement.csv";

const LINE_TERMINATOR: &[u8] = b"\r\n";

// ── Encoding ──────────────────────────────────────────────────────────────────

fn csv_to_io(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(err) => err,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", other)),
    }
}

/// Write `rows` as comma-separated lines terminated by `\r\n`.
///
/// A field is quoted only when it holds a comma, a quote or a line break.
/// Rows may differ in length, and an empty row is written as a blank line.
pub fn write_csv<W: Write>(mut writer: W, rows: &[ExportRow]) -> io::Result<()> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .flexible(true);

    for row in rows {
        if row.is_empty() {
            // csv writes an empty record as `""`.
            writer.write_all(LINE_TERMINATOR)?;
        } else {
            let mut wtr = builder.from_writer(&mut writer);
            wtr.write_record(row).map_err(csv_to_io)?;
            wtr.flush()?;
        }
    }
    writer.flush()
}

/// Export file path for `case_name` inside `dir`.
pub fn export_path(dir: &Path, case_name: &str) -> PathBuf {
    dir.join(format!("{}{}", case_name, FILE_SUFFIX))
}

// ── CsvFileSink ───────────────────────────────────────────────────────────────

/// Writes export rows as a comma-separated file in a fixed directory.
///
/// An existing file for the same case is overwritten.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    dir: PathBuf,
}

impl CsvFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the export for `case_name` is written to.
    pub fn path_for(&self, case_name: &str) -> PathBuf {
        export_path(&self.dir, case_name)
    }
}

impl ExportSink for CsvFileSink {
    fn write_rows(&mut self, case_name: &str, rows: &[ExportRow]) -> io::Result<()> {
        let path = self.path_for(case_name);
        write_csv(File::create(&path)?, rows)?;

        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone as _, Utc};
    use level_core::session::{MeasurementSession, SessionConfig};
    use level_core::time_utils::{FixedClock, TimezoneHandler};
    use tempfile::TempDir;

    fn row(fields: &[&str]) -> ExportRow {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn encoded(rows: &[ExportRow]) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, rows).expect("write to memory");
        String::from_utf8(out).expect("utf-8")
    }

    // ── write_csv ─────────────────────────────────────────────────────────────

    #[test]
    fn test_write_csv_plain_fields() {
        assert_eq!(
            encoded(&[row(&["10", "Level Invalid: 10"])]),
            "10,Level Invalid: 10\r\n"
        );
    }

    #[test]
    fn test_write_csv_empty_row_is_blank_line() {
        assert_eq!(
            encoded(&[row(&["a", "b"]), row(&[]), row(&["c"])]),
            "a,b\r\n\r\nc\r\n"
        );
    }

    #[test]
    fn test_write_csv_quotes_special_fields() {
        assert_eq!(
            encoded(&[row(&["1,5", "Input Invalid: 1,5"])]),
            "\"1,5\",\"Input Invalid: 1,5\"\r\n"
        );
        assert_eq!(encoded(&[row(&["say \"hi\""])]), "\"say \"\"hi\"\"\"\r\n");
        assert_eq!(encoded(&[row(&["two\nlines"])]), "\"two\nlines\"\r\n");
    }

    #[test]
    fn test_write_csv_rows_of_differing_length() {
        assert_eq!(
            encoded(&[row(&["a", "b"]), row(&["c"])]),
            "a,b\r\nc\r\n"
        );
    }

    // ── export_path ───────────────────────────────────────────────────────────

    #[test]
    fn test_export_path_naming() {
        assert_eq!(
            export_path(Path::new("/data"), "bridge"),
            PathBuf::from("/data/bridge_measurement.csv")
        );
    }

    // ── CsvFileSink ───────────────────────────────────────────────────────────

    #[test]
    fn test_sink_writes_session_export() {
        let tmp = TempDir::new().expect("tempdir");
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut session = MeasurementSession::new(
            SessionConfig::new(5.0, 1.0),
            &clock,
            &TimezoneHandler::new("UTC"),
        );
        for input in ["5.0", "10", "abc", "n"] {
            session.record(input);
        }

        let mut sink = CsvFileSink::new(tmp.path());
        session.export("site_a", &mut sink).expect("export");

        let path = tmp.path().join("site_a_measurement.csv");
        assert_eq!(sink.path_for("site_a"), path);
        let content = std::fs::read_to_string(&path).expect("read export");
        assert_eq!(
            content,
            "Instrument Height,Acceptable Variation\r\n\
             5.0,1.0\r\n\
             \r\n\
             User Inputs,Calculated Result\r\n\
             5.0,0.0\r\n\
             10,Level Invalid: 10\r\n\
             abc,Input Invalid: abc\r\n"
        );
    }

    #[test]
    fn test_sink_overwrites_existing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let mut sink = CsvFileSink::new(tmp.path());
        sink.write_rows("case", &[row(&["old"])]).expect("first write");
        sink.write_rows("case", &[row(&["new"])]).expect("second write");

        let content =
            std::fs::read_to_string(tmp.path().join("case_measurement.csv")).expect("read");
        assert_eq!(content, "new\r\n");
    }

    #[test]
    fn test_sink_missing_directory_is_io_error() {
        let tmp = TempDir::new().expect("tempdir");
        let mut sink = CsvFileSink::new(tmp.path().join("does-not-exist"));
        let err = sink.write_rows("case", &[row(&["x"])]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
