use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "dcaval")]
#[command(
    version,
    about = "Dollar-cost-average valuation series for a tradable asset"
)]
#[command(
    long_about = "Sample an asset's price at a fixed cadence over a date window, optionally aligned to a weekday, and value a fixed purchase quantity at each sample with a running total."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch prices for every sample date and append the valuation report
    Run {
        /// Path to the YAML or TOML run configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Read prices from a local CSV table instead of the HTTP endpoint
        #[arg(long = "prices-csv")]
        prices_csv: Option<PathBuf>,

        /// Do not wait between price requests
        #[arg(long = "no-delay")]
        no_delay: bool,

        /// Override the report destination
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the sample dates for a window without fetching prices
    Dates {
        /// Window start
        #[arg(long)]
        start: String,

        /// Window end
        #[arg(long)]
        end: String,

        /// Align to this weekday (0 = Monday .. 6 = Sunday)
        #[arg(long)]
        weekday: Option<u8>,

        /// Days between samples
        #[arg(long, default_value_t = 7)]
        cycle: i64,

        /// strftime format of --start/--end and of the printed dates
        #[arg(long, default_value = "%d-%m-%Y")]
        format: String,
    },
}
