//! CLI command implementations.

pub(crate) mod download;
pub(crate) mod estimate;
pub(crate) mod interactive;
pub(crate) mod web;

use crate::display;
use anyhow::{Context, Result};
use nsehist_lib::prelude::*;
use nsehist_lib::format_date;

/// Runs the fetch loop against the NSE archives with a progress bar.
///
/// Returns `None` when nothing matched; the no-data guidance has already
/// been printed.
pub(crate) async fn fetch(config: &Configuration, quiet: bool) -> Result<Option<Download>> {
    let client = ArchiveClient::with_defaults().context("Failed to build HTTP client")?;
    let fetcher = DailyFetcher::new(client, Pacing::cli_default());

    let progress = display::progress_bar(config.range().total_days() as u64, quiet)?;
    let mut on_day = |day: &DayProgress| {
        progress.set_position(day.position as u64);
        progress.set_message(format!(
            "{} | {} trading days",
            format_date(day.date),
            day.matched
        ));
    };

    let outcome = download(&fetcher, config, &mut on_day).await?;
    progress.finish_and_clear();

    match outcome {
        DownloadOutcome::Completed(done) => {
            if !quiet {
                display::print_completion(done.report());
            }
            Ok(Some(done))
        }
        DownloadOutcome::NoData(report) => {
            if !quiet {
                display::print_completion(&report);
            }
            display::print_no_data(config);
            Ok(None)
        }
    }
}
