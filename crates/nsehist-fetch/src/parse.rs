//! CSV snapshot parsing.

use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::TryStreamExt;
use thiserror::Error;

use crate::{EquityRow, IndexRow};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const EQUITY_COLUMNS: [&str; 7] = [
    "SYMBOL",
    "SERIES",
    "OPEN_PRICE",
    "HIGH_PRICE",
    "LOW_PRICE",
    "CLOSE_PRICE",
    "TTL_TRD_QNTY",
];

const INDEX_COLUMNS: [&str; 7] = [
    "Index Name",
    "Index Date",
    "Open Index Value",
    "High Index Value",
    "Low Index Value",
    "Closing Index Value",
    "Volume",
];

/// Errors that can occur while parsing a snapshot.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The CSV itself is unreadable.
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    /// A required column is absent from the header.
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}

/// Parses an equity-with-delivery snapshot (`sec_bhavdata_full_*.csv`).
///
/// Headers and cells are whitespace-trimmed; columns are located by name.
///
/// # Errors
///
/// Returns an error if the CSV is unreadable or a required column is missing.
pub async fn parse_equity_snapshot(body: &[u8]) -> Result<Vec<EquityRow>, ParseError> {
    let rows = read_columns(body, &EQUITY_COLUMNS).await?;
    Ok(rows
        .into_iter()
        .map(|[symbol, series, open, high, low, close, volume]| EquityRow {
            symbol,
            series,
            open,
            high,
            low,
            close,
            volume,
        })
        .collect())
}

/// Parses an index close snapshot (`ind_close_all_*.csv`).
///
/// # Errors
///
/// Returns an error if the CSV is unreadable or a required column is missing.
pub async fn parse_index_snapshot(body: &[u8]) -> Result<Vec<IndexRow>, ParseError> {
    let rows = read_columns(body, &INDEX_COLUMNS).await?;
    Ok(rows
        .into_iter()
        .map(|[name, date, open, high, low, close, volume]| IndexRow {
            name,
            date,
            open,
            high,
            low,
            close,
            volume,
        })
        .collect())
}

/// Reads the named columns of every record, in the order given.
///
/// Short records yield empty strings for the missing cells.
async fn read_columns<const N: usize>(
    body: &[u8],
    columns: &[&'static str; N],
) -> Result<Vec<[String; N]>, ParseError> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    let mut reader = AsyncReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .create_reader(body);

    let headers = reader.headers().await?.clone();
    let mut positions = [0usize; N];
    for (slot, &name) in positions.iter_mut().zip(columns) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(ParseError::MissingColumn(name))?;
    }

    let records: Vec<StringRecord> = reader.records().try_collect().await?;

    Ok(records
        .iter()
        .filter(|record| record.iter().any(|cell| !cell.is_empty()))
        .map(|record| positions.map(|i| record.get(i).unwrap_or_default().to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EQUITY_CSV: &str = "\
SYMBOL, SERIES, DATE1, PREV_CLOSE, OPEN_PRICE, HIGH_PRICE, LOW_PRICE, LAST_PRICE, CLOSE_PRICE, AVG_PRICE, TTL_TRD_QNTY, TURNOVER_LACS, NO_OF_TRADES, DELIV_QTY, DELIV_PER
20MICRONS, EQ, 03-Feb-2025, 222.55, 220.00, 224.90, 214.10, 219.00, 218.93, 219.21, 125331, 274.73, 3541, 61532, 49.10
RELIANCE, EQ, 03-Feb-2025, 1265.60, 1255.00, 1262.75, 1241.05, 1250.00, 1251.40, 1251.99, 8956120, 112128.35, 251332, 4563210, 50.95
";

    const INDEX_CSV: &str = "\
Index Name,Index Date,Open Index Value,High Index Value,Low Index Value,Closing Index Value,Points Change,Change(%),Volume,Turnover (Rs. Cr.),P/E,P/B,Div Yield
Nifty 50,03-02-2025,23319.35,23381.60,23222.00,23361.05,-121.10,-0.52,287513287,27215.43,21.52,3.4,1.3
India VIX,03-02-2025,14.02,15.23,13.98,14.65,0.66,4.72,-,-,-,-,-
";

    #[tokio::test]
    async fn test_parse_equity() {
        let rows = parse_equity_snapshot(EQUITY_CSV.as_bytes()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].symbol, "RELIANCE");
        assert_eq!(rows[1].series, "EQ");
        assert_eq!(rows[1].open, "1255.00");
        assert_eq!(rows[1].close, "1251.40");
        assert_eq!(rows[1].volume, "8956120");
    }

    #[tokio::test]
    async fn test_parse_index() {
        let rows = parse_index_snapshot(INDEX_CSV.as_bytes()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Nifty 50");
        assert_eq!(rows[0].date, "03-02-2025");
        assert_eq!(rows[0].close, "23361.05");
        assert_eq!(rows[1].volume, "-");
    }

    #[tokio::test]
    async fn test_bom_and_blank_lines() {
        let body = format!("\u{feff}{INDEX_CSV}\n,,,,,,,,,,,,\n");
        let rows = parse_index_snapshot(body.as_bytes()).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_column() {
        let err = parse_equity_snapshot(b"SYMBOL,SERIES\nABC,EQ\n")
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn("OPEN_PRICE")));
    }
}
