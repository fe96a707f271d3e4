mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{formatters, Cli, Commands};
use colored::Colorize;
use dcaval::config::{Config, ScheduleSpec};
use dcaval::pipeline;
use dcaval::reports::CsvReportSink;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    // Initialize logging
    init_logging(cli.verbose, cli.log_file.as_deref(), cli.no_color)?;

    match cli.command {
        Commands::Run {
            config,
            prices_csv,
            no_delay,
            output,
        } => handle_run(&config, prices_csv, no_delay, output, cli.json),

        Commands::Dates {
            start,
            end,
            weekday,
            cycle,
            format,
        } => handle_dates(&start, &end, weekday, cycle, &format, cli.json),
    }
}

/// Logs go to stderr, and additionally to `log_file` when given.
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool, log_file: Option<&Path>, no_color: bool) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_directive = if verbose { "dcaval=debug" } else { "dcaval=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color && std::io::stderr().is_terminal());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

/// Handle run command
fn handle_run(
    config_path: &Path,
    prices_csv: Option<PathBuf>,
    no_delay: bool,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    info!("Loading configuration from {}", config_path.display());
    let mut config = Config::load(config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

    if prices_csv.is_some() {
        config.prices_csv = prices_csv;
    }
    if no_delay {
        config.request_interval_secs = Some(0);
    }
    if let Some(path) = output {
        config.output = path;
    }

    let settings = config.settings().context("Invalid configuration")?;
    let mut source = pipeline::build_source(&settings)?;
    let mut sink = CsvReportSink::new(&settings.output, &settings.date_format, &settings.currency);

    let report = pipeline::run(&settings, &mut source, &mut sink)
        .with_context(|| format!("Valuation run for {} failed", settings.asset))?;

    if json {
        println!(
            "{}",
            formatters::format_report_json(
                &report,
                &settings.asset,
                &settings.currency,
                &settings.date_format
            )
        );
    } else {
        println!(
            "{}",
            formatters::format_report_table(
                &report,
                &settings.asset,
                &settings.currency,
                &settings.date_format
            )
        );
        println!(
            "{} Report appended to {}",
            "✓".green().bold(),
            sink.path().display()
        );
    }

    Ok(())
}

/// Handle dates command
fn handle_dates(
    start: &str,
    end: &str,
    weekday: Option<u8>,
    cycle: i64,
    format: &str,
    json: bool,
) -> Result<()> {
    let schedule = ScheduleSpec::parse(start, end, format, weekday, Some(cycle))?;
    let dates = pipeline::plan(&schedule)?;

    if json {
        println!("{}", formatters::format_dates_json(&dates, format));
    } else {
        print!("{}", formatters::format_dates_list(&dates, format));
    }
    Ok(())
}
