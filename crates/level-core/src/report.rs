use serde::Serialize;

use crate::error::Result;
use crate::formatting::format_level;
use crate::session::{LevelResult, MeasurementSession};

/// Summary of a finished session, as shown to the operator.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session: String,
    pub results: Vec<LevelResult>,
    pub highest_point_level: f64,
    pub lowest_point_level: f64,
    pub valid_points: usize,
    pub invalid_points: usize,
    pub invalid_inputs: usize,
    pub invalid_level_points: usize,
}

impl SessionReport {
    pub fn from_session(session: &MeasurementSession) -> Self {
        Self {
            session: session.session_label(),
            results: session.results(),
            highest_point_level: session.highest_point_level(),
            lowest_point_level: session.lowest_point_level(),
            valid_points: session.valid_points(),
            invalid_points: session.invalid_points(),
            invalid_inputs: session.invalid_inputs(),
            invalid_level_points: session.invalid_level_points(),
        }
    }

    /// Render as `"json"` (pretty-printed) or, for anything else, plain text.
    pub fn render(&self, format: &str) -> Result<String> {
        if format.eq_ignore_ascii_case("json") {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(self.render_text())
        }
    }

    /// One `name=value` line per figure, grouped into extrema and counts.
    pub fn render_text(&self) -> String {
        let results: Vec<String> = self
            .results
            .iter()
            .map(|r| match r {
                LevelResult::Level(v) => format_level(*v),
                marker => format!("'{}'", marker),
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format!("session={}\n", self.session));
        out.push_str(&format!("results=[{}]\n", results.join(", ")));
        out.push_str(&format!(
            "highest_point_level={}\n",
            format_level(self.highest_point_level)
        ));
        out.push_str(&format!(
            "lowest_point_level={}\n",
            format_level(self.lowest_point_level)
        ));
        out.push('\n');
        out.push_str(&format!("valid_points={}\n", self.valid_points));
        out.push_str(&format!("invalid_points={}\n", self.invalid_points));
        out.push_str(&format!("invalid_inputs={}\n", self.invalid_inputs));
        out.push('\n');
        out.push_str(&format!(
            "invalid_level_points={}\n",
            self.invalid_level_points
        ));
        out
    }
}
