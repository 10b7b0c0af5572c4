//! NSE archive URL construction.

use chrono::NaiveDate;

/// Base URL of the equity bhav copy archive.
pub const EQUITY_ARCHIVE_URL: &str = "https://nsearchives.nseindia.com/products/content";

/// Base URL of the index snapshot archive.
pub const INDEX_ARCHIVE_URL: &str = "https://nsearchives.nseindia.com/content/indices";

/// Date format used in archive file names.
const ARCHIVE_DATE_FORMAT: &str = "%d%m%Y";

/// Builds the URL of the equity-with-delivery snapshot for `date`.
///
/// URL format: `{base}/sec_bhavdata_full_{DDMMYYYY}.csv`
///
/// # Example
///
/// ```
/// use nsehist_fetch::url::{EQUITY_ARCHIVE_URL, equity_url};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
/// assert_eq!(
///     equity_url(EQUITY_ARCHIVE_URL, date),
///     "https://nsearchives.nseindia.com/products/content/sec_bhavdata_full_03022025.csv"
/// );
/// ```
#[must_use]
pub fn equity_url(base: &str, date: NaiveDate) -> String {
    format!(
        "{}/sec_bhavdata_full_{}.csv",
        base.trim_end_matches('/'),
        date.format(ARCHIVE_DATE_FORMAT)
    )
}

/// Builds the URL of the index close snapshot for `date`.
///
/// URL format: `{base}/ind_close_all_{DDMMYYYY}.csv`
#[must_use]
pub fn index_url(base: &str, date: NaiveDate) -> String {
    format!(
        "{}/ind_close_all_{}.csv",
        base.trim_end_matches('/'),
        date.format(ARCHIVE_DATE_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_url() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            index_url(INDEX_ARCHIVE_URL, date),
            "https://nsearchives.nseindia.com/content/indices/ind_close_all_31122024.csv"
        );
    }

    #[test]
    fn test_trailing_slash() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(
            equity_url("http://localhost:8080/", date),
            "http://localhost:8080/sec_bhavdata_full_07012025.csv"
        );
    }
}
