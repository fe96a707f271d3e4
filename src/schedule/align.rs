use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use super::DateWindow;
use crate::utils::pretty_date;

/// Snap both ends of `window` onto `weekday`.
///
/// The start moves forward to the first occurrence of `weekday` on or after
/// it; the end moves backward to the last occurrence on or before it. The two
/// bounds are adjusted independently, so a window narrower than a week can
/// come back inverted.
pub fn align(window: DateWindow, weekday: Weekday) -> DateWindow {
    let target = i64::from(weekday.num_days_from_monday());

    let start_diff = weekday_index(window.start) - target;
    debug!("Start weekday is {} days off target", start_diff);
    let start = if start_diff > 0 {
        window.start + Duration::days(7 - start_diff)
    } else if start_diff < 0 {
        window.start + Duration::days(start_diff.abs())
    } else {
        window.start
    };
    debug!(
        "Aligned start: {} -> {}",
        pretty_date(window.start),
        pretty_date(start)
    );

    let end_index = weekday_index(window.end);
    let end_diff = end_index - target;
    debug!("End weekday is {} days off target", end_diff);
    let end = if end_diff > 0 {
        window.end - Duration::days(end_diff)
    } else if end_diff < 0 {
        window.end - Duration::days(7 - target + end_index)
    } else {
        window.end
    };
    debug!(
        "Aligned end: {} -> {}",
        pretty_date(window.end),
        pretty_date(end)
    );

    DateWindow { start, end }
}

/// Align only when a target weekday was requested.
pub fn align_optional(window: DateWindow, weekday: Option<Weekday>) -> DateWindow {
    match weekday {
        Some(w) => align(window, w),
        None => window,
    }
}

fn weekday_index(date: NaiveDate) -> i64 {
    i64::from(date.weekday().num_days_from_monday())
}
