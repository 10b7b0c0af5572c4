//! Display utilities and output formatting for the nsehist CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use nsehist_lib::{
    Configuration, Download, DownloadEstimate, Estimator, FetchReport, OhlcvRecord, OutputFormat,
    export_filename, normalize_index_name, write_file,
};
use std::path::{Path, PathBuf};

/// Rows shown from each end of the table.
const PREVIEW_ROWS: usize = 5;

/// Output format for downloaded data.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum Format {
    #[default]
    Csv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

pub(crate) fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("  NSE Historical Data Downloader");
    println!("  Daily / Weekly / Monthly OHLCV from NSE bhav copies");
    println!("{}", "=".repeat(60));
    println!();
}

/// Prints the settings about to be used.
pub(crate) fn print_settings(config: &Configuration, estimate: &DownloadEstimate) {
    println!("\nDownload settings:");
    println!("  Type:      {}", config.instrument_type().label());
    if config.instrument_type().is_index() {
        println!("  Index:     {}", normalize_index_name(config.symbol()));
    } else {
        println!("  Symbol:    {}", config.symbol());
    }
    println!("  Range:     {}", config.range());
    println!("  Timeframe: {}", config.timeframe().label());
    println!(
        "  Estimate:  ~{} records, ~{}",
        estimate.records,
        Estimator::format_duration(estimate.duration)
    );
    println!();
}

/// Creates the per-day progress bar.
pub(crate) fn progress_bar(total: u64, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}",
            )
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Prints the per-run counters and the first failures.
pub(crate) fn print_completion(report: &FetchReport) {
    let stats = report.stats();
    println!("\n{}", "-".repeat(60));
    println!("Download complete");
    println!("  Trading days downloaded: {}", stats.matched);
    println!("  Holidays/weekends:       {}", stats.holidays);
    if stats.unmatched > 0 {
        println!("  Symbol not listed:       {}", stats.unmatched);
    }
    println!("  Failed downloads:        {}", stats.failed);
    for failure in report.failures() {
        println!("    {}: {}", failure.date.format("%d-%m-%Y"), failure.message);
    }
    println!("{}", "-".repeat(60));
}

pub(crate) fn print_no_data(config: &Configuration) {
    println!("\nNo data found for {}.", config.resolved_symbol());
    println!("Please check:");
    println!("  - the symbol or index name is spelled as NSE lists it");
    println!("    (e.g. \"NIFTY 50\", \"NIFTY BANK\", RELIANCE, TCS)");
    println!("  - the date range contains trading days");
    println!("  - the instrument type matches the symbol");
}

/// Prints the data summary and the head and tail of the table.
pub(crate) fn print_summary(download: &Download) {
    let table = download.table();
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return;
    };

    println!("\nData summary:");
    println!("  Symbol:        {}", first.symbol);
    println!("  Records:       {}", table.len());
    println!("  Date range:    {} to {}", first.date, last.date);
    println!("  Timeframe:     {}", download.timeframe().label());
    if let (Some(high), Some(low)) = (table.max_close(), table.min_close()) {
        println!("  Highest close: {high:.2}");
        println!("  Lowest close:  {low:.2}");
    }

    println!("\nFirst {PREVIEW_ROWS} records:");
    print_rows(table.head(PREVIEW_ROWS));
    if table.len() > PREVIEW_ROWS {
        println!("\nLast {PREVIEW_ROWS} records:");
        print_rows(table.tail(PREVIEW_ROWS));
    }
}

fn print_rows(rows: &[OhlcvRecord]) {
    println!(
        "{:<14} {:<12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "SYMBOL", "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"
    );
    for r in rows {
        println!(
            "{:<14} {:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14}",
            r.symbol, r.date, r.open, r.high, r.low, r.close, r.volume
        );
    }
}

/// Returns the default output path for a download.
///
/// The symbol comes from the data itself, so index files carry the name
/// NSE printed rather than what was typed.
pub(crate) fn default_output(download: &Download, config: &Configuration, format: Format) -> PathBuf {
    let symbol = download
        .table()
        .symbol()
        .map_or_else(|| config.resolved_symbol(), str::to_string);
    PathBuf::from(export_filename(
        &symbol,
        config.timeframe(),
        config.range(),
        format.into(),
    ))
}

/// Writes the download's table to `path`.
pub(crate) fn write_output(
    download: &Download,
    path: &Path,
    format: Format,
    pretty: bool,
) -> Result<()> {
    write_file(path, format.into(), pretty, download.table().records())
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nsehist_lib::{
        DailyFetcher, DateRange, DownloadOutcome, IndexRow, InstrumentType, MemorySource,
        NoPacing, NoProgress, Timeframe, download,
    };

    async fn nifty_bank_download() -> (Download, Configuration) {
        let day = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let source = MemorySource::new().with_index(
            day,
            vec![IndexRow {
                name: "Nifty Bank".into(),
                date: "03-02-2025".into(),
                open: "49000".into(),
                high: "49500".into(),
                low: "48800".into(),
                close: "49210.55".into(),
                volume: "-".into(),
            }],
        );
        let config = Configuration::new(
            InstrumentType::Index,
            "nifty bank",
            DateRange::new(day, NaiveDate::from_ymd_opt(2025, 2, 4).unwrap()).unwrap(),
            Timeframe::Daily,
        );
        let fetcher = DailyFetcher::new(source, NoPacing);
        let DownloadOutcome::Completed(done) =
            download(&fetcher, &config, &mut NoProgress).await.unwrap()
        else {
            panic!("expected data");
        };
        (done, config)
    }

    #[tokio::test]
    async fn test_default_output_uses_data_symbol() {
        let (done, config) = nifty_bank_download().await;
        assert_eq!(
            default_output(&done, &config, Format::Csv),
            PathBuf::from("Nifty_Bank_1d_20250203_to_20250204.csv")
        );
    }

    #[tokio::test]
    async fn test_write_output() {
        let (done, _) = nifty_bank_download().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_output(&done, &path, Format::Csv, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Symbol,Date,Open,High,Low,Close,Volume"));
        assert!(text.contains("Nifty Bank,03-02-2025"));
    }

    #[tokio::test]
    async fn test_write_output_pretty_json() {
        let (done, _) = nifty_bank_download().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_output(&done, &path, Format::Json, true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"Symbol\": \"Nifty Bank\""));
    }
}
