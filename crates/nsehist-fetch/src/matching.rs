//! Picking the requested instrument out of a snapshot.

use crate::{EquityRow, IndexRow};

/// Returns the first row whose `SYMBOL` equals `symbol` exactly.
///
/// Matching is case-sensitive with no fallback; callers upper-case the
/// symbol beforehand.
#[must_use]
pub fn find_equity_row<'a>(rows: &'a [EquityRow], symbol: &str) -> Option<&'a EquityRow> {
    rows.iter().find(|row| row.symbol == symbol)
}

/// Returns the row for index `name`.
///
/// An exact `Index Name` match wins; otherwise the first row whose name
/// contains `name`, ignoring case.
#[must_use]
pub fn find_index_row<'a>(rows: &'a [IndexRow], name: &str) -> Option<&'a IndexRow> {
    rows.iter().find(|row| row.name == name).or_else(|| {
        let needle = name.to_lowercase();
        rows.iter()
            .find(|row| row.name.to_lowercase().contains(&needle))
    })
}
