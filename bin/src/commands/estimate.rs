//! Estimate command implementation.

use anyhow::Result;
use nsehist_lib::prelude::*;
use nsehist_lib::parse_date;

/// Prints the estimated request count, records and run time for a range.
pub(crate) fn estimate(from: &str, to: Option<&str>, timeframe: &str) -> Result<()> {
    let timeframe: Timeframe = timeframe.parse()?;
    let from = parse_date(from)?;
    let to = match to {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let range = DateRange::new(from, to)?;

    let estimate = Estimator::default().estimate(range, timeframe);

    println!("Range:     {range}");
    println!("Timeframe: {}", timeframe.label());
    println!();
    println!("{}", Estimator::format_estimate(&estimate));

    Ok(())
}
