//! Output granularity definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output granularity of an exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// One record per trading day, as downloaded.
    #[default]
    Daily,
    /// One record per week, weeks ending on Friday.
    Weekly,
    /// One record per calendar month.
    Monthly,
}

impl Timeframe {
    /// Returns the short code used in file names (`1d`, `1w`, `1m`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1w",
            Self::Monthly => "1m",
        }
    }

    /// Returns the menu label, e.g. `Daily (1d)`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily (1d)",
            Self::Weekly => "Weekly (1w)",
            Self::Monthly => "Monthly (1m)",
        }
    }

    /// Returns true if the daily table is exported without resampling.
    #[must_use]
    pub const fn is_daily(&self) -> bool {
        matches!(self, Self::Daily)
    }

    /// Returns all available timeframes in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Daily, Self::Weekly, Self::Monthly]
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1d" | "d" | "d1" | "day" | "daily" => Ok(Self::Daily),
            "2" | "1w" | "w" | "w1" | "week" | "weekly" => Ok(Self::Weekly),
            "3" | "1m" | "m" | "mo" | "month" | "monthly" => Ok(Self::Monthly),
            _ => Err(TimeframeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid timeframe string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeParseError(String);

impl std::fmt::Display for TimeframeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid timeframe '{}', expected one of: 1d, 1w, 1m (or 1, 2, 3)",
            self.0
        )
    }
}

impl std::error::Error for TimeframeParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_codes() {
        assert_eq!(Timeframe::Daily.code(), "1d");
        assert_eq!(Timeframe::Weekly.code(), "1w");
        assert_eq!(Timeframe::Monthly.code(), "1m");
        assert_eq!(Timeframe::Weekly.to_string(), "1w");
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("1".parse::<Timeframe>().unwrap(), Timeframe::Daily);
        assert_eq!("2".parse::<Timeframe>().unwrap(), Timeframe::Weekly);
        assert_eq!("3".parse::<Timeframe>().unwrap(), Timeframe::Monthly);
        assert_eq!("1W".parse::<Timeframe>().unwrap(), Timeframe::Weekly);
        assert_eq!("monthly".parse::<Timeframe>().unwrap(), Timeframe::Monthly);
        assert!("4".parse::<Timeframe>().is_err());
    }
}
