use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::DateWindow;

/// Produce the sample dates for `window`, one every `cycle_days` days.
///
/// The first date is always `window.start`. The number of whole periods is
/// `day_span / cycle_days` with integer division (truncating toward zero),
/// clamped at zero, so an inverted window yields just the start date. The
/// result has `periods + 1` elements and none lies past `window.end` when the
/// window is well-formed.
///
/// `cycle_days` must be positive; the config layer rejects anything else.
pub fn generate(window: DateWindow, cycle_days: i64) -> Vec<NaiveDate> {
    debug_assert!(cycle_days > 0, "cycle length must be positive");

    let step = Duration::days(cycle_days);
    let periods = (window.day_span() / cycle_days).max(0);
    debug!("{} whole periods of {} days in window", periods, cycle_days);

    let mut dates = Vec::with_capacity(periods as usize + 1);
    let mut current = window.start;
    dates.push(current);
    for _ in 0..periods {
        current += step;
        dates.push(current);
    }

    debug!("Generated {} sample dates", dates.len());
    dates
}
