//! Output format abstraction.

use nsehist_types::OhlcvRecord;
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Writes `records` in this format with default formatter settings.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write<W: Write + Send>(
        &self,
        records: &[OhlcvRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_with(records, false, writer)
    }

    /// Like [`OutputFormat::write`]; `pretty` indents a JSON array and is
    /// ignored by the line-oriented formats.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_with<W: Write + Send>(
        &self,
        records: &[OhlcvRecord],
        pretty: bool,
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new().write_records(records, writer),
            Self::Json => JsonFormatter::new()
                .with_pretty(pretty)
                .write_records(records, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_records(records, writer),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes OHLCV records to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_records<W: Write + Send>(
        &self,
        records: &[OhlcvRecord],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}
