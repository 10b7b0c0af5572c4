//! Raw snapshot rows.

use chrono::NaiveDate;
use nsehist_types::{OhlcvRecord, format_date};
use thiserror::Error;

/// A numeric snapshot field that failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} is not a number: '{value}'")]
pub struct RowParseError {
    /// Column the value came from.
    pub field: &'static str,
    /// The raw text.
    pub value: String,
}

/// One row of the equity-with-delivery snapshot (`sec_bhavdata_full`).
///
/// Fields hold the trimmed text of the CSV cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquityRow {
    /// `SYMBOL`
    pub symbol: String,
    /// `SERIES`
    pub series: String,
    /// `OPEN_PRICE`
    pub open: String,
    /// `HIGH_PRICE`
    pub high: String,
    /// `LOW_PRICE`
    pub low: String,
    /// `CLOSE_PRICE`
    pub close: String,
    /// `TTL_TRD_QNTY`
    pub volume: String,
}

impl EquityRow {
    /// Converts the row into a record dated `date`.
    ///
    /// The equity snapshot carries no usable date column, so the record is
    /// stamped with the date the snapshot was requested for.
    ///
    /// # Errors
    ///
    /// Returns an error if a price does not parse.
    pub fn to_record(&self, date: NaiveDate) -> Result<OhlcvRecord, RowParseError> {
        Ok(OhlcvRecord::new(
            self.symbol.clone(),
            format_date(date),
            parse_price("OPEN_PRICE", &self.open)?,
            parse_price("HIGH_PRICE", &self.high)?,
            parse_price("LOW_PRICE", &self.low)?,
            parse_price("CLOSE_PRICE", &self.close)?,
            parse_volume(&self.volume),
        ))
    }
}

/// One row of the index close snapshot (`ind_close_all`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexRow {
    /// `Index Name`
    pub name: String,
    /// `Index Date`, `DD-MM-YYYY`
    pub date: String,
    /// `Open Index Value`
    pub open: String,
    /// `High Index Value`
    pub high: String,
    /// `Low Index Value`
    pub low: String,
    /// `Closing Index Value`
    pub close: String,
    /// `Volume`
    pub volume: String,
}

impl IndexRow {
    /// Converts the row into a record carrying the row's own `Index Date`.
    ///
    /// `requested` is only used when the row's date cell is blank.
    ///
    /// # Errors
    ///
    /// Returns an error if a price does not parse.
    pub fn to_record(&self, requested: NaiveDate) -> Result<OhlcvRecord, RowParseError> {
        let date = if self.date.is_empty() {
            format_date(requested)
        } else {
            self.date.clone()
        };

        Ok(OhlcvRecord::new(
            self.name.clone(),
            date,
            parse_price("Open Index Value", &self.open)?,
            parse_price("High Index Value", &self.high)?,
            parse_price("Low Index Value", &self.low)?,
            parse_price("Closing Index Value", &self.close)?,
            parse_volume(&self.volume),
        ))
    }
}

fn parse_price(field: &'static str, value: &str) -> Result<f64, RowParseError> {
    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowParseError {
            field,
            value: value.to_string(),
        })
}

/// Parses a traded quantity; `-`, blank or otherwise non-numeric text is 0.
fn parse_volume(value: &str) -> u64 {
    let value = value.replace(',', "");
    value.parse::<u64>().unwrap_or_else(|_| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map_or(0, |v| v as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn equity(volume: &str) -> EquityRow {
        EquityRow {
            symbol: "RELIANCE".into(),
            series: "EQ".into(),
            open: "1,290.00".into(),
            high: "1301.5".into(),
            low: "1285.10".into(),
            close: "1299.95".into(),
            volume: volume.into(),
        }
    }

    #[test]
    fn test_equity_to_record() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let record = equity("5123456").to_record(date).unwrap();

        assert_eq!(record.symbol, "RELIANCE");
        assert_eq!(record.date, "03-02-2025");
        assert_relative_eq!(record.open, 1290.0);
        assert_relative_eq!(record.close, 1299.95);
        assert_eq!(record.volume, 5_123_456);
    }

    #[test]
    fn test_volume_placeholders() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        assert_eq!(equity("-").to_record(date).unwrap().volume, 0);
        assert_eq!(equity("").to_record(date).unwrap().volume, 0);
        assert_eq!(equity("1234.0").to_record(date).unwrap().volume, 1234);
    }

    #[test]
    fn test_bad_price() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let mut row = equity("1");
        row.high = "-".into();
        let err = row.to_record(date).unwrap_err();
        assert_eq!(err.field, "HIGH_PRICE");
    }

    #[test]
    fn test_index_keeps_own_date() {
        let requested = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let row = IndexRow {
            name: "Nifty 50".into(),
            date: "31-01-2025".into(),
            open: "23249.5".into(),
            high: "23546.8".into(),
            low: "23170.5".into(),
            close: "23508.4".into(),
            volume: "-".into(),
        };

        let record = row.to_record(requested).unwrap();
        assert_eq!(record.date, "31-01-2025");
        assert_eq!(record.symbol, "Nifty 50");
        assert_eq!(record.volume, 0);

        let undated = IndexRow {
            date: String::new(),
            ..row
        };
        assert_eq!(undated.to_record(requested).unwrap().date, "03-02-2025");
    }
}
