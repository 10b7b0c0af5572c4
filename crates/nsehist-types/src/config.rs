//! Download configuration collected by a front-end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DateRange, InputError, InstrumentType, Timeframe, parse_date};

/// The five inputs of a download: what to fetch, for when, at which granularity.
///
/// Built once from user input and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    instrument_type: InstrumentType,
    symbol: String,
    from: NaiveDate,
    to: NaiveDate,
    timeframe: Timeframe,
}

impl Configuration {
    /// Creates a configuration without the front-end input checks.
    ///
    /// `symbol` is used verbatim; see [`Configuration::from_input`] for the
    /// validating constructor that also resolves the symbol.
    #[must_use]
    pub fn new(
        instrument_type: InstrumentType,
        symbol: impl Into<String>,
        range: DateRange,
        timeframe: Timeframe,
    ) -> Self {
        Self {
            instrument_type,
            symbol: symbol.into(),
            from: range.start,
            to: range.end,
            timeframe,
        }
    }

    /// Validates raw front-end input and builds a configuration.
    ///
    /// The symbol must not be blank and `to` must be strictly after `from`.
    /// Stock symbols are upper-cased; index names are kept as typed (the
    /// fetch loop normalizes them).
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] describing the first failed check.
    pub fn from_input(
        instrument_type: InstrumentType,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
        timeframe: Timeframe,
    ) -> Result<Self, InputError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(InputError::EmptySymbol);
        }
        if to <= from {
            return Err(InputError::EndNotAfterStart { from, to });
        }

        let symbol = match instrument_type {
            InstrumentType::Index => symbol.to_string(),
            InstrumentType::Stock => instrument_type.resolve_symbol(symbol),
        };

        Ok(Self {
            instrument_type,
            symbol,
            from,
            to,
            timeframe,
        })
    }

    /// Like [`Configuration::from_input`], parsing `DD-MM-YYYY` date strings.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if a date does not parse or a check fails.
    pub fn from_strings(
        instrument_type: InstrumentType,
        symbol: &str,
        from: &str,
        to: &str,
        timeframe: Timeframe,
    ) -> Result<Self, InputError> {
        let from = parse_date(from)?;
        let to = parse_date(to)?;
        Self::from_input(instrument_type, symbol, from, to, timeframe)
    }

    /// Returns the instrument type.
    #[must_use]
    pub const fn instrument_type(&self) -> InstrumentType {
        self.instrument_type
    }

    /// Returns the symbol as entered (stock symbols upper-cased).
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the symbol the snapshot is searched for.
    #[must_use]
    pub fn resolved_symbol(&self) -> String {
        self.instrument_type.resolve_symbol(&self.symbol)
    }

    /// Returns the inclusive date range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange {
            start: self.from,
            end: self.to,
        }
    }

    /// Returns the requested output granularity.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_input_valid() {
        let config = Configuration::from_input(
            InstrumentType::Stock,
            " reliance ",
            date(2025, 1, 1),
            date(2025, 1, 31),
            Timeframe::Weekly,
        )
        .unwrap();

        assert_eq!(config.symbol(), "RELIANCE");
        assert_eq!(config.range().total_days(), 31);
        assert_eq!(config.timeframe(), Timeframe::Weekly);
    }

    #[test]
    fn test_index_symbol_resolved_lazily() {
        let config = Configuration::from_input(
            InstrumentType::Index,
            "nifty bank",
            date(2025, 1, 1),
            date(2025, 1, 2),
            Timeframe::Daily,
        )
        .unwrap();

        assert_eq!(config.symbol(), "nifty bank");
        assert_eq!(config.resolved_symbol(), "NIFTY bank");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let err = Configuration::from_input(
            InstrumentType::Index,
            "   ",
            date(2025, 1, 1),
            date(2025, 1, 2),
            Timeframe::Daily,
        )
        .unwrap_err();
        assert_eq!(err, InputError::EmptySymbol);
    }

    #[test]
    fn test_end_must_follow_start() {
        let same_day = Configuration::from_input(
            InstrumentType::Index,
            "NIFTY 50",
            date(2025, 1, 2),
            date(2025, 1, 2),
            Timeframe::Daily,
        );
        assert!(matches!(same_day, Err(InputError::EndNotAfterStart { .. })));

        let reversed = Configuration::from_input(
            InstrumentType::Index,
            "NIFTY 50",
            date(2025, 1, 3),
            date(2025, 1, 2),
            Timeframe::Daily,
        );
        assert!(matches!(reversed, Err(InputError::EndNotAfterStart { .. })));
    }

    #[test]
    fn test_from_strings() {
        let config = Configuration::from_strings(
            InstrumentType::Index,
            "NIFTY 50",
            "01-01-2025",
            "31-01-2025",
            Timeframe::Monthly,
        )
        .unwrap();
        assert_eq!(config.range().start, date(2025, 1, 1));

        let bad = Configuration::from_strings(
            InstrumentType::Index,
            "NIFTY 50",
            "2025-01-01",
            "31-01-2025",
            Timeframe::Monthly,
        );
        assert!(matches!(bad, Err(InputError::Date(_))));
    }
}
