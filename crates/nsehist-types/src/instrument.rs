//! Instrument type selection.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::normalize_index_name;

/// Which NSE snapshot a request is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    /// An index, looked up by index name in the indices snapshot.
    #[default]
    Index,
    /// A stock or ETF, looked up by trading symbol in the equity snapshot.
    Stock,
}

impl InstrumentType {
    /// Returns the instrument type as a lowercase identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Stock => "stock",
        }
    }

    /// Returns the human-facing label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Index => "Index",
            Self::Stock => "Stock/ETF",
        }
    }

    /// Returns true for indices.
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index)
    }

    /// Resolves raw user input to the symbol that is searched for.
    ///
    /// Index names go through [`normalize_index_name`]; stock and ETF
    /// symbols are trimmed and upper-cased since NSE lists them in capitals.
    #[must_use]
    pub fn resolve_symbol(&self, input: &str) -> String {
        match self {
            Self::Index => normalize_index_name(input.trim()),
            Self::Stock => input.trim().to_uppercase(),
        }
    }

    /// Returns all instrument types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Index, Self::Stock]
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for InstrumentType {
    type Err = InstrumentTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "index" | "indices" | "idx" => Ok(Self::Index),
            "stock" | "etf" | "stock/etf" | "equity" => Ok(Self::Stock),
            _ => Err(InstrumentTypeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid instrument type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentTypeParseError(String);

impl std::fmt::Display for InstrumentTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid instrument type '{}', expected one of: index, stock",
            self.0
        )
    }
}

impl std::error::Error for InstrumentTypeParseError {}
