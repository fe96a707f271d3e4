//! Run orchestration
//!
//! Window alignment, sample generation, pricing and report persistence, in
//! that order. The report reaches the sink only after every sample date has
//! been priced.

use chrono::NaiveDate;
use tracing::info;

use crate::config::{PriceSourceSpec, RunSettings, ScheduleSpec};
use crate::error::{DcaError, Result};
use crate::pricing::{HttpPriceSource, PriceSource, PriceTable, Throttle, Throttled};
use crate::reports::ReportSink;
use crate::schedule::{align_optional, generate};
use crate::valuation::{accumulate, ValuationReport};

/// Sample dates for a run, without fetching anything.
///
/// Fails with [`DcaError::AlignmentDegenerate`] when weekday alignment leaves
/// the start after the end.
pub fn plan(schedule: &ScheduleSpec) -> Result<Vec<NaiveDate>> {
    let window = align_optional(schedule.window, schedule.weekday);
    if schedule.weekday.is_some() && window.is_inverted() {
        return Err(DcaError::AlignmentDegenerate {
            start: window.start,
            end: window.end,
        });
    }

    let dates = generate(window, schedule.cycle_days);
    info!(
        "Planned {} samples from {} to {} every {} days",
        dates.len(),
        window.start,
        window.end,
        schedule.cycle_days
    );
    Ok(dates)
}

/// Price every planned date and hand the report to `sink`.
pub fn run<S, K>(settings: &RunSettings, source: &mut S, sink: &mut K) -> Result<ValuationReport>
where
    S: PriceSource + ?Sized,
    K: ReportSink + ?Sized,
{
    let dates = plan(&settings.schedule())?;

    let report = accumulate(
        &dates,
        |date| {
            source
                .fetch(&settings.asset, date)
                .map_err(|err| DcaError::PriceLookup { date, source: err })
        },
        settings.quantity,
    )?;
    info!(
        "Valued {} samples of {} {}: total {}",
        report.len(),
        settings.quantity,
        settings.asset,
        report.total_value
    );

    sink.write(&report)?;
    Ok(report)
}

/// Build the configured price source.
///
/// HTTP sources are wrapped in a [`Throttle`] using the configured request
/// interval; local price tables are not throttled.
pub fn build_source(settings: &RunSettings) -> Result<Box<dyn PriceSource>> {
    match &settings.source {
        PriceSourceSpec::Http { endpoint } => {
            let http = HttpPriceSource::new(
                endpoint.clone(),
                settings.date_format.clone(),
                settings.currency.clone(),
            )?;
            Ok(Box::new(Throttled::new(
                http,
                Throttle::new(settings.request_interval),
            )))
        }
        PriceSourceSpec::Table { path } => {
            Ok(Box::new(PriceTable::load(path, &settings.date_format)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceError;
    use crate::reports::MemorySink;
    use crate::schedule::DateWindow;
    use chrono::{Datelike, Duration, Weekday};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn settings(start: NaiveDate, end: NaiveDate, weekday: Option<Weekday>) -> RunSettings {
        RunSettings {
            window: DateWindow::new(start, end),
            weekday,
            cycle_days: 7,
            asset: "bitcoin".to_string(),
            quantity: dec!(0.5),
            date_format: "%d-%m-%Y".to_string(),
            currency: "usd".to_string(),
            request_interval: std::time::Duration::ZERO,
            source: PriceSourceSpec::Table {
                path: PathBuf::from("unused.csv"),
            },
            output: PathBuf::from("unused-report.csv"),
        }
    }

    /// Prices every date at 100 + days since 2022-01-01, optionally failing on one date
    struct Linear {
        fail_on: Option<NaiveDate>,
        calls: Vec<NaiveDate>,
    }

    impl PriceSource for Linear {
        fn fetch(&mut self, asset: &str, date: NaiveDate) -> std::result::Result<Decimal, PriceError> {
            self.calls.push(date);
            if Some(date) == self.fail_on {
                return Err(PriceError::NotFound {
                    asset: asset.to_string(),
                    date,
                });
            }
            Ok(Decimal::from(100 + (date - date_2022()).num_days()))
        }
    }

    fn date_2022() -> NaiveDate {
        date(2022, 1, 1)
    }

    #[test]
    fn test_plan_aligns_to_weekday_then_steps_weekly() {
        let dates = plan(&settings(date(2022, 1, 1), date(2022, 6, 30), Some(Weekday::Tue)).schedule())
            .unwrap();

        assert_eq!(dates[0], date(2022, 1, 4));
        assert_eq!(*dates.last().unwrap(), date(2022, 6, 28));
        assert_eq!(dates.len(), 26);
        assert!(dates.iter().all(|d| d.weekday() == Weekday::Tue));
    }

    #[test]
    fn test_plan_without_weekday_keeps_raw_start() {
        let dates = plan(&settings(date(2022, 1, 1), date(2022, 1, 20), None).schedule()).unwrap();
        assert_eq!(dates, vec![date(2022, 1, 1), date(2022, 1, 8), date(2022, 1, 15)]);
    }

    #[test]
    fn test_plan_rejects_inverted_aligned_window() {
        // Monday..Wednesday aligned to Friday
        let err = plan(&settings(date(2022, 1, 3), date(2022, 1, 5), Some(Weekday::Fri)).schedule())
            .unwrap_err();
        assert!(matches!(
            err,
            DcaError::AlignmentDegenerate { start, end }
                if start == date(2022, 1, 7) && end == date(2021, 12, 31)
        ));
    }

    #[test]
    fn test_run_prices_each_sample_and_writes_once() {
        let settings = settings(date(2022, 1, 2), date(2022, 1, 16), None);
        let mut source = Linear {
            fail_on: None,
            calls: Vec::new(),
        };
        let mut sink = MemorySink::default();

        let report = run(&settings, &mut source, &mut sink).unwrap();

        assert_eq!(source.calls, vec![date(2022, 1, 2), date(2022, 1, 9), date(2022, 1, 16)]);
        let values: Vec<Decimal> = report.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(50.5), dec!(54), dec!(57.5)]);
        assert_eq!(report.total_value, dec!(162));
        assert_eq!(sink.reports, vec![report]);
    }

    #[test]
    fn test_late_price_failure_writes_nothing() {
        let settings = settings(date(2022, 1, 2), date(2022, 1, 30), None);
        let mut source = Linear {
            fail_on: Some(date(2022, 1, 30)),
            calls: Vec::new(),
        };
        let mut sink = MemorySink::default();

        let err = run(&settings, &mut source, &mut sink).unwrap_err();

        assert!(matches!(err, DcaError::PriceLookup { date: d, .. } if d == date(2022, 1, 30)));
        assert_eq!(source.calls.len(), 5);
        assert!(sink.reports.is_empty());
    }

    #[test]
    fn test_overflowing_value_writes_nothing() {
        let mut settings = settings(date(2022, 1, 2), date(2022, 1, 16), None);
        settings.quantity = dec!(2);
        let mut table = PriceTable::default();
        table.insert("bitcoin", date(2022, 1, 2), Decimal::MAX);
        let mut sink = MemorySink::default();

        let err = run(&settings, &mut table, &mut sink).unwrap_err();

        assert!(matches!(
            err,
            DcaError::Valuation(crate::valuation::ValuationError::Overflow { date: d })
                if d == date(2022, 1, 2)
        ));
        assert!(sink.reports.is_empty());
    }

    #[test]
    fn test_run_accepts_boxed_sources() {
        let settings = settings(date(2022, 1, 2), date(2022, 1, 8), None);
        let mut table = PriceTable::default();
        table.insert("bitcoin", date(2022, 1, 2), dec!(46458.85));
        let mut source: Box<dyn PriceSource> = Box::new(table);
        let mut sink = MemorySink::default();

        let report = run(&settings, &mut source, &mut sink).unwrap();
        assert_eq!(report.total_value.to_string(), "23229.42500");
        assert_eq!(report.points[0].date + Duration::days(6), date(2022, 1, 8));
    }
}
