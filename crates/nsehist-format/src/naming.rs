//! Export file names.

use nsehist_types::{DateRange, Timeframe, format_compact};

use crate::OutputFormat;

/// Replaces spaces and slashes so `symbol` is safe in a file name.
///
/// # Example
///
/// ```
/// use nsehist_format::safe_symbol;
///
/// assert_eq!(safe_symbol("NIFTY 50"), "NIFTY_50");
/// assert_eq!(safe_symbol("M&M/BE"), "M&M_BE");
/// ```
#[must_use]
pub fn safe_symbol(symbol: &str) -> String {
    symbol.replace([' ', '/'], "_")
}

/// Builds the command-line export name:
/// `{symbol}_{timeframe}_{YYYYMMDD}_to_{YYYYMMDD}.{ext}`.
#[must_use]
pub fn export_filename(
    symbol: &str,
    timeframe: Timeframe,
    range: DateRange,
    format: OutputFormat,
) -> String {
    format!(
        "{}_{}_{}_to_{}.{}",
        safe_symbol(symbol),
        timeframe.code(),
        format_compact(range.start),
        format_compact(range.end),
        format.extension()
    )
}

/// Builds the browser download name: `{symbol}.{ext}`.
#[must_use]
pub fn download_filename(symbol: &str, format: OutputFormat) -> String {
    format!("{}.{}", safe_symbol(symbol), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_filename() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
        .unwrap();

        assert_eq!(
            export_filename("NIFTY 50", Timeframe::Weekly, range, OutputFormat::Csv),
            "NIFTY_50_1w_20250101_to_20250331.csv"
        );
        assert_eq!(
            export_filename("TCS", Timeframe::Daily, range, OutputFormat::Ndjson),
            "TCS_1d_20250101_to_20250331.ndjson"
        );
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(
            download_filename("NIFTY Midcap Select", OutputFormat::Csv),
            "NIFTY_Midcap_Select.csv"
        );
    }
}
