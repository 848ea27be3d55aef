use thiserror::Error;

/// All errors produced by the level calculator.
#[derive(Error, Debug)]
pub enum LevelError {
    /// A session configuration value is not a number.
    #[error("Invalid configuration: {field} must be a number, got \"{value}\"")]
    InvalidConfig { field: &'static str, value: String },

    /// A report could not be serialised to JSON.
    #[error("Failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for I/O errors raised by entry sources and export sinks.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the level crates.
pub type Result<T> = std::result::Result<T, LevelError>;
