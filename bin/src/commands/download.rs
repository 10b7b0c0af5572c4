//! Download command implementation.
//!
//! The interactive pipeline driven from flags: validate, fetch, resample,
//! write.

use crate::display::{self, Format};
use anyhow::{Context, Result};
use inquire::Confirm;
use nsehist_lib::prelude::*;
use nsehist_lib::{format_date, parse_date};
use std::path::PathBuf;

/// Download data for one symbol or index.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn download(
    symbol: &str,
    index: bool,
    from: &str,
    to: Option<&str>,
    timeframe: &str,
    output: Option<PathBuf>,
    format: Format,
    pretty: bool,
    yes: bool,
    quiet: bool,
) -> Result<()> {
    let instrument = if index {
        InstrumentType::Index
    } else {
        InstrumentType::Stock
    };
    let timeframe: Timeframe = timeframe.parse()?;
    let from = parse_date(from)?;
    let to = match to {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };

    let config = Configuration::from_input(instrument, symbol, from, to, timeframe)?;
    tracing::debug!(
        symbol = %config.resolved_symbol(),
        from = %format_date(from),
        to = %format_date(to),
        timeframe = timeframe.code(),
        "download requested"
    );

    if !quiet {
        let estimate = Estimator::default().estimate(config.range(), timeframe);
        display::print_settings(&config, &estimate);
    }

    if !yes
        && !Confirm::new("Proceed with download?")
            .with_default(true)
            .prompt()
            .context("Confirmation cancelled")?
    {
        println!("Download cancelled by user.");
        return Ok(());
    }

    let Some(done) = super::fetch(&config, quiet).await? else {
        return Ok(());
    };

    if !quiet {
        display::print_summary(&done);
    }

    let output = output.unwrap_or_else(|| display::default_output(&done, &config, format));
    display::write_output(&done, &output, format, pretty)?;

    if !quiet {
        println!("\nOutput written to: {}", output.display());
    }

    Ok(())
}
