//! Recurrence rule expansion
//!
//! Expands `(start, end, frequency, interval)` into concrete calendar dates.
//! Month and year steps follow RFC 5545: a candidate whose day-of-month does
//! not exist in the target month is skipped rather than clamped, so a rule
//! starting on the 31st only lands in 31-day months.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};
use tracing::warn;
use wiss_domain::{EventDate, Frequency};

/// Expand a recurrence description into ordered dates.
///
/// - no `start` gives no dates
/// - no `end` gives the single date `start`
/// - `end` before `start` also gives the single date `start`
/// - otherwise every `interval` `frequency` units from `start` through `end`
///   inclusive
///
/// An `interval` of 0 is treated as 1.
pub fn generate_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    frequency: Frequency,
    interval: u32,
) -> Vec<NaiveDate> {
    let Some(start) = start else {
        return Vec::new();
    };
    let Some(end) = end else {
        return vec![start];
    };
    if end < start {
        warn!(%start, %end, "Recurrence ends before it starts; using the start date only");
        return vec![start];
    }

    let step = interval.max(1);
    match frequency {
        Frequency::Daily => step_days(start, end, u64::from(step)),
        Frequency::Weekly => step_days(start, end, u64::from(step) * 7),
        Frequency::Monthly => step_months(start, end, step),
        Frequency::Yearly => step_years(start, end, step),
    }
}

/// Dates produced by one stored recurrence row.
pub fn dates_for(rule: &EventDate) -> Vec<NaiveDate> {
    generate_dates(Some(rule.start_date), rule.end_date, rule.frequency, rule.interval)
}

/// Deduplicated union of the dates produced by every row.
pub fn expand_rules<'a, I>(rules: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a EventDate>,
{
    rules.into_iter().flat_map(dates_for).collect()
}

fn step_days(start: NaiveDate, end: NaiveDate, days: u64) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= end) {
        dates.push(date);
        current = date.checked_add_days(Days::new(days));
    }
    dates
}

fn step_months(start: NaiveDate, end: NaiveDate, step: u32) -> Vec<NaiveDate> {
    let origin = i64::from(start.year()) * 12 + i64::from(start.month0());
    let last = i64::from(end.year()) * 12 + i64::from(end.month0());

    let mut dates = Vec::new();
    let mut month_index = origin;
    while month_index <= last {
        let year = i32::try_from(month_index.div_euclid(12)).ok();
        let month = u32::try_from(month_index.rem_euclid(12)).ok().map(|m| m + 1);
        if let (Some(year), Some(month)) = (year, month) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, start.day()) {
                if date <= end {
                    dates.push(date);
                }
            }
        }
        month_index += i64::from(step);
    }
    dates
}

fn step_years(start: NaiveDate, end: NaiveDate, step: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut year = i64::from(start.year());
    while year <= i64::from(end.year()) {
        let candidate = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, start.month(), start.day()));
        if let Some(date) = candidate.filter(|d| *d <= end) {
            dates.push(date);
        }
        year += i64::from(step);
    }
    dates
}
