//! Integration tests for the dcaval library
//!
//! These tests verify end-to-end functionality through the public API:
//! - Weekday alignment of window bounds
//! - Weekly sample generation
//! - Valuation totals
//! - Full runs against an offline price table and a CSV report

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use dcaval::config::Config;
use dcaval::pipeline;
use dcaval::pricing::{PriceSource, PriceTable};
use dcaval::reports::CsvReportSink;
use dcaval::schedule::{align, generate, weekday_from_index, DateWindow};
use dcaval::valuation::accumulate;
use dcaval::DcaError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_alignment_scenarios() {
    let window = |start, end| DateWindow::new(start, end);

    assert_eq!(
        align(window(date(2022, 1, 3), date(2022, 6, 30)), Weekday::Sun).start,
        date(2022, 1, 9)
    );
    assert_eq!(
        align(window(date(2022, 1, 1), date(2022, 6, 30)), Weekday::Tue).start,
        date(2022, 1, 4)
    );
    assert_eq!(
        align(window(date(2022, 1, 1), date(2022, 6, 30)), Weekday::Sat).end,
        date(2022, 6, 25)
    );
    assert_eq!(
        align(window(date(2022, 1, 1), date(2022, 6, 30)), Weekday::Tue).end,
        date(2022, 6, 28)
    );
}

#[test]
fn test_aligned_weekly_samples_share_weekday() {
    for index in 0..7u8 {
        let weekday = weekday_from_index(index).unwrap();
        let window = align(DateWindow::new(date(2022, 1, 1), date(2022, 6, 30)), weekday);
        let dates = generate(window, 7);

        assert_eq!(dates[0], window.start);
        assert!(dates.iter().all(|d| d.weekday() == weekday));
        assert!(*dates.last().unwrap() <= window.end);
        assert!(window.end - *dates.last().unwrap() < Duration::days(7));
    }
}

#[test]
fn test_valuation_of_half_unit() -> Result<()> {
    let dates = [date(2022, 1, 2), date(2022, 1, 9), date(2022, 1, 16)];
    let prices = [dec!(100), dec!(110), dec!(90)];

    let report = accumulate::<_, DcaError>(
        &dates,
        |d| {
            let i = dates.iter().position(|x| *x == d).unwrap();
            Ok(prices[i])
        },
        dec!(0.5),
    )?;

    let values: Vec<String> = report.points.iter().map(|p| p.value.to_string()).collect();
    assert_eq!(values, ["50.00000", "55.00000", "45.00000"]);
    assert_eq!(report.total_value.to_string(), "150.00000");
    Ok(())
}

#[test]
fn test_full_run_against_price_table() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let report_path = temp_dir.path().join("btc_dca.csv");

    let mut config = Config::load(fixture("btc_sundays.yml"))?;
    config.prices_csv = Some(fixture("btc_jan_2022.csv").into());
    config.output = report_path.clone();
    config.request_interval_secs = Some(0);
    let settings = config.settings()?;

    let mut source = pipeline::build_source(&settings)?;
    let mut sink = CsvReportSink::new(&settings.output, &settings.date_format, &settings.currency);
    let report = pipeline::run(&settings, &mut source, &mut sink)?;

    assert_eq!(report.len(), 5);
    assert_eq!(report.points[0].date, date(2022, 1, 2));
    assert_eq!(report.points[4].date, date(2022, 1, 30));
    assert_eq!(report.total_value, dec!(2056.4169));

    let written = std::fs::read_to_string(&report_path)?;
    assert!(written.ends_with("#sum: 2056.41690USD\n"));
    Ok(())
}

#[test]
fn test_failed_run_leaves_no_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let report_path = temp_dir.path().join("btc_dca.csv");

    let mut config = Config::load(fixture("btc_sundays.yml"))?;
    config.prices_csv = Some(fixture("btc_jan_2022_gap.csv").into());
    config.output = report_path.clone();
    let settings = config.settings()?;

    let mut source = pipeline::build_source(&settings)?;
    let mut sink = CsvReportSink::new(&settings.output, &settings.date_format, &settings.currency);
    let err = pipeline::run(&settings, &mut source, &mut sink).unwrap_err();

    assert!(matches!(err, DcaError::PriceLookup { date: d, .. } if d == date(2022, 1, 30)));
    assert!(!report_path.exists());
    Ok(())
}

#[test]
fn test_price_table_as_trait_object() -> Result<()> {
    let mut table: Box<dyn PriceSource> =
        Box::new(PriceTable::load(fixture("btc_jan_2022.csv"), "%d-%m-%Y")?);
    let price: Decimal = table.fetch("bitcoin", date(2022, 1, 16))?;
    assert_eq!(price, dec!(43097.88));
    Ok(())
}
