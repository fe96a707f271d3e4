//! Run configuration
//!
//! A run is described by one YAML or TOML file, read once at startup. The
//! key names of the older `queryMaker_config.yml` layout (`prod_name`,
//! `furl`, `desired_weekday`, ...) are accepted as aliases.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DcaError, Result};
use crate::pricing::throttle::DEFAULT_REQUEST_INTERVAL;
use crate::schedule::{weekday_from_index, DateWindow, DEFAULT_CYCLE_DAYS};

pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";
pub const DEFAULT_CURRENCY: &str = "usd";

/// Raw configuration as written in the file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub start_date: String,
    pub end_date: String,

    #[serde(alias = "prod_name")]
    pub asset: String,

    #[serde(alias = "prod_amount")]
    pub quantity: Decimal,

    /// Price URL template, see [`crate::pricing::HttpPriceSource`]
    #[serde(default, alias = "furl")]
    pub endpoint: Option<String>,

    #[serde(alias = "result_file_name")]
    pub output: PathBuf,

    /// Target weekday, Monday = 0 .. Sunday = 6
    #[serde(default, alias = "desired_weekday")]
    pub weekday: Option<u8>,

    #[serde(default, alias = "days_per_period")]
    pub cycle_days: Option<i64>,

    #[serde(default = "default_date_format", alias = "date_fmt")]
    pub date_format: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub request_interval_secs: Option<u64>,

    /// Offline price table used instead of `endpoint`
    #[serde(default)]
    pub prices_csv: Option<PathBuf>,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Where prices come from for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSourceSpec {
    Http { endpoint: String },
    Table { path: PathBuf },
}

/// Validated settings for a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub window: DateWindow,
    pub weekday: Option<Weekday>,
    pub cycle_days: i64,
    pub asset: String,
    pub quantity: Decimal,
    pub date_format: String,
    pub currency: String,
    pub request_interval: Duration,
    pub source: PriceSourceSpec,
    pub output: PathBuf,
}

impl RunSettings {
    pub fn schedule(&self) -> ScheduleSpec {
        ScheduleSpec {
            window: self.window,
            weekday: self.weekday,
            cycle_days: self.cycle_days,
        }
    }
}

impl Config {
    /// Load a config file, picking the format from its extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DcaError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("yml") | Some("yaml") => Self::from_yaml_str(&contents),
            other => Err(DcaError::config(format!(
                "unsupported config format {:?} (expected .yml, .yaml or .toml)",
                other.unwrap_or("")
            ))),
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| DcaError::config(format!("invalid YAML config: {}", e)))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| DcaError::config(format!("invalid TOML config: {}", e)))
    }

    /// Validate the raw values into [`RunSettings`].
    pub fn settings(&self) -> Result<RunSettings> {
        let schedule = ScheduleSpec::parse(
            &self.start_date,
            &self.end_date,
            &self.date_format,
            self.weekday,
            self.cycle_days,
        )?;

        if self.asset.trim().is_empty() {
            return Err(DcaError::config("asset must not be empty"));
        }
        if self.currency.trim().is_empty() {
            return Err(DcaError::config("currency must not be empty"));
        }

        let source = match (&self.prices_csv, &self.endpoint) {
            (Some(path), _) => PriceSourceSpec::Table { path: path.clone() },
            (None, Some(endpoint)) => PriceSourceSpec::Http {
                endpoint: endpoint.clone(),
            },
            (None, None) => {
                return Err(DcaError::config(
                    "either endpoint or prices_csv must be set",
                ))
            }
        };

        let request_interval = self
            .request_interval_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_INTERVAL);

        Ok(RunSettings {
            window: schedule.window,
            weekday: schedule.weekday,
            cycle_days: schedule.cycle_days,
            asset: self.asset.trim().to_string(),
            quantity: self.quantity,
            date_format: self.date_format.clone(),
            currency: self.currency.trim().to_lowercase(),
            request_interval,
            source,
            output: self.output.clone(),
        })
    }
}

/// The date-window part of a run: bounds, alignment target and cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSpec {
    pub window: DateWindow,
    pub weekday: Option<Weekday>,
    pub cycle_days: i64,
}

impl ScheduleSpec {
    /// Parse and validate schedule fields as they appear in config or on the
    /// command line.
    pub fn parse(
        start_date: &str,
        end_date: &str,
        date_format: &str,
        weekday: Option<u8>,
        cycle_days: Option<i64>,
    ) -> Result<Self> {
        check_date_format(date_format)?;
        let start = parse_date("start_date", start_date, date_format)?;
        let end = parse_date("end_date", end_date, date_format)?;
        if start > end {
            return Err(DcaError::config(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }

        let weekday = match weekday {
            Some(index) => Some(weekday_from_index(index).ok_or_else(|| {
                DcaError::config(format!(
                    "weekday must be between 0 (Monday) and 6 (Sunday), got {}",
                    index
                ))
            })?),
            None => None,
        };

        let cycle_days = cycle_days.unwrap_or(DEFAULT_CYCLE_DAYS);
        if cycle_days <= 0 {
            return Err(DcaError::config(format!(
                "cycle_days must be positive, got {}",
                cycle_days
            )));
        }

        Ok(Self {
            window: DateWindow::new(start, end),
            weekday,
            cycle_days,
        })
    }
}

/// Reject formats that cannot render a bare date.
///
/// Chrono parses a date with time fields like `%H` in the format, but
/// formatting a `NaiveDate` with them fails, so the format is checked by
/// rendering one.
pub fn check_date_format(format: &str) -> Result<()> {
    let mut rendered = String::new();
    let sample = NaiveDate::default();
    if write!(rendered, "{}", sample.format(format)).is_err() || rendered.trim().is_empty() {
        return Err(DcaError::config(format!(
            "date_format '{}' cannot format a calendar date",
            format
        )));
    }
    Ok(())
}

/// Parse a date field, naming the field on failure.
pub fn parse_date(field: &str, value: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), format).map_err(|e| {
        DcaError::config(format!(
            "invalid {} '{}' for format '{}': {}",
            field, value, format, e
        ))
    })
}
