//! The download form.

use chrono::NaiveDate;
use nsehist_lib::{
    Configuration, InputError, InstrumentType, InstrumentTypeParseError, Timeframe,
    TimeframeParseError,
};
use serde::Deserialize;
use thiserror::Error;

/// Date format of `<input type="date">` values.
pub const HTML_DATE_FORMAT: &str = "%Y-%m-%d";

/// Days between the default `from` and `to` dates.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// Errors raised while validating a submitted form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A field failed the input checks.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The instrument radio held an unknown value.
    #[error(transparent)]
    Instrument(#[from] InstrumentTypeParseError),

    /// The timeframe select held an unknown value.
    #[error(transparent)]
    Timeframe(#[from] TimeframeParseError),

    /// A date picker value is not `YYYY-MM-DD`.
    #[error("invalid date '{0}'")]
    Date(String),
}

/// Raw form fields as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DownloadForm {
    /// `index` or `stock`.
    pub instrument: String,
    /// Symbol or index name.
    pub symbol: String,
    /// Start date, `YYYY-MM-DD`.
    pub from: String,
    /// End date, `YYYY-MM-DD`.
    pub to: String,
    /// `1d`, `1w` or `1m`.
    pub timeframe: String,
}

impl DownloadForm {
    /// Validates the form against `today` and builds a configuration.
    ///
    /// # Errors
    ///
    /// Returns the first failed check: unknown instrument or timeframe,
    /// unparseable date, blank symbol, `to` not after `from`, or a date
    /// after `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<Configuration, FormError> {
        let instrument: InstrumentType = self.instrument.parse()?;
        let timeframe: Timeframe = self.timeframe.parse()?;
        let from = parse_html_date(&self.from)?;
        let to = parse_html_date(&self.to)?;

        let config = Configuration::from_input(instrument, &self.symbol, from, to, timeframe)?;

        if to > today {
            return Err(InputError::FutureDate(to).into());
        }

        Ok(config)
    }
}

fn parse_html_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), HTML_DATE_FORMAT)
        .map_err(|_| FormError::Date(value.to_string()))
}

/// Renders a date for an `<input type="date">` value.
#[must_use]
pub fn html_date(date: NaiveDate) -> String {
    date.format(HTML_DATE_FORMAT).to_string()
}
