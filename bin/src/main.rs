//! nsehist CLI - historical NSE end-of-day OHLCV from the daily bhav copies.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "nsehist")]
#[command(about = "Historical NSE end-of-day data downloader", long_about = None)]
#[command(version)]
struct Cli {
    /// Omit to run the interactive downloader
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily, weekly or monthly OHLCV without prompts
    Download {
        /// Stock symbol or index name (e.g., "NIFTY 50", RELIANCE)
        symbol: String,

        /// Treat the symbol as an index name
        #[arg(long, conflicts_with = "stock")]
        index: bool,

        /// Treat the symbol as a stock or ETF (default)
        #[arg(long)]
        stock: bool,

        /// Start date (DD-MM-YYYY)
        #[arg(short, long)]
        from: String,

        /// End date (DD-MM-YYYY). Defaults to today.
        #[arg(short, long)]
        to: Option<String>,

        /// Timeframe: 1d, 1w or 1m
        #[arg(short = 'T', long, default_value = "1d")]
        timeframe: String,

        /// Output file path. Defaults to <symbol>_<tf>_<from>_to_<to>.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Estimate records and run time for a range
    Estimate {
        /// Start date (DD-MM-YYYY)
        #[arg(short, long)]
        from: String,

        /// End date (DD-MM-YYYY). Defaults to today.
        #[arg(short, long)]
        to: Option<String>,

        /// Timeframe: 1d, 1w or 1m
        #[arg(short = 'T', long, default_value = "1d")]
        timeframe: String,
    },

    /// Serve the browser front-end
    Web {
        /// Listen address
        #[arg(short, long, default_value = nsehist_web::DEFAULT_BIND)]
        bind: SocketAddr,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Option<Commands>, quiet: bool) -> Result<()> {
    match command {
        None => commands::interactive::interactive(quiet).await,
        Some(Commands::Download {
            symbol,
            index,
            stock: _,
            from,
            to,
            timeframe,
            output,
            format,
            pretty,
            yes,
        }) => {
            commands::download::download(
                &symbol,
                index,
                &from,
                to.as_deref(),
                &timeframe,
                output,
                format,
                pretty,
                yes,
                quiet,
            )
            .await
        }
        Some(Commands::Estimate {
            from,
            to,
            timeframe,
        }) => commands::estimate::estimate(&from, to.as_deref(), &timeframe),
        Some(Commands::Web { bind }) => commands::web::web(bind).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // the web server handles Ctrl+C itself
    if matches!(cli.command, Some(Commands::Web { .. })) {
        return run(cli.command, cli.quiet).await;
    }

    tokio::select! {
        result = run(cli.command, cli.quiet) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nDownload cancelled by user.");
            Ok(())
        }
    }
}
