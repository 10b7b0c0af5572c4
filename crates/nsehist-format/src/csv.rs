//! CSV output format.

use nsehist_types::OhlcvRecord;
use std::io::Write;

use crate::{FormatError, Formatter};

/// Column names, in output order.
pub const CSV_HEADER: [&str; 7] = ["Symbol", "Date", "Open", "High", "Low", "Close", "Volume"];

/// Field delimiter.
const DELIMITER: char = ',';

/// CSV formatter. Always writes the header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Creates a new CSV formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Quotes `field` if it contains the delimiter, a quote or a line break.
    fn escape(field: &str) -> std::borrow::Cow<'_, str> {
        if field.contains([DELIMITER, '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\"")).into()
        } else {
            field.into()
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_records<W: Write + Send>(
        &self,
        records: &[OhlcvRecord],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = DELIMITER;
        writeln!(writer, "{}", CSV_HEADER.join(d.to_string().as_str()))?;

        for record in records {
            // {:?} keeps the decimal point on whole prices (100.0)
            writeln!(
                writer,
                "{}{d}{}{d}{:?}{d}{:?}{d}{:?}{d}{:?}{d}{}",
                Self::escape(&record.symbol),
                Self::escape(&record.date),
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(symbol: &str) -> OhlcvRecord {
        OhlcvRecord::new(symbol, "03-02-2025", 23319.35, 23381.6, 23222.0, 23361.05, 287_513_287)
    }

    #[test]
    fn test_csv_records() {
        let formatter = CsvFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_records(&[record("NIFTY 50")], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines[0], "Symbol,Date,Open,High,Low,Close,Volume");
        assert_eq!(
            lines[1],
            "NIFTY 50,03-02-2025,23319.35,23381.6,23222.0,23361.05,287513287"
        );
    }

    #[test]
    fn test_csv_quotes_awkward_symbols() {
        let formatter = CsvFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_records(&[record("NIFTY 50, \"TRI\"")], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("\"NIFTY 50, \"\"TRI\"\"\",03-02-2025"));
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new().write_records(&[], &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output.into_inner()).unwrap(),
            "Symbol,Date,Open,High,Low,Close,Volume\n"
        );
    }
}
