use crate::error::{Error, Result};
use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeZone,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Default layout for date strings exchanged with the market data sources.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Offset of Indochina Time, the reference timezone of the Vietnamese market.
pub const UTC7_OFFSET_SECS: i32 = 7 * 3600;

// Layouts accepted by `date_string_to_timestamp_utc7`, tried in order.
// Ambiguous slash and dash dates are month-first, as dateutil reads them.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%Y%m%d"];

fn utc7() -> Option<FixedOffset> {
    FixedOffset::east_opt(UTC7_OFFSET_SECS)
}

/// Parse `text` with `format`. Date-only layouts resolve to midnight.
pub fn convert_date(text: &str, format: &str) -> Result<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(text, format) {
        Ok(datetime) => Ok(datetime),
        Err(datetime_err) => match NaiveDate::parse_from_str(text, format) {
            Ok(date) => Ok(date.and_time(chrono::NaiveTime::MIN)),
            Err(_) => Err(datetime_err.into()),
        },
    }
}

/// Re-format a date string from `origin_format` to `new_format`.
pub fn convert_text_dateformat(text: &str, origin_format: &str, new_format: &str) -> Result<String> {
    let datetime = convert_date(text, origin_format)?;

    // DelayedFormat reports unknown specifiers through fmt::Error
    let mut out = String::new();
    write!(out, "{}", datetime.format(new_format))
        .map_err(|_| Error::InvalidFormat(new_format.to_string()))?;
    Ok(out)
}

/// Anything that can be read as a naive date/time. Strings are parsed with
/// [`DEFAULT_DATE_FORMAT`].
pub trait DateInput {
    fn to_naive_datetime(&self) -> Result<NaiveDateTime>;
}

impl DateInput for str {
    fn to_naive_datetime(&self) -> Result<NaiveDateTime> {
        convert_date(self, DEFAULT_DATE_FORMAT)
    }
}

impl DateInput for String {
    fn to_naive_datetime(&self) -> Result<NaiveDateTime> {
        self.as_str().to_naive_datetime()
    }
}

impl DateInput for NaiveDate {
    fn to_naive_datetime(&self) -> Result<NaiveDateTime> {
        Ok(self.and_time(chrono::NaiveTime::MIN))
    }
}

impl DateInput for NaiveDateTime {
    fn to_naive_datetime(&self) -> Result<NaiveDateTime> {
        Ok(*self)
    }
}

impl<T: DateInput + ?Sized> DateInput for &T {
    fn to_naive_datetime(&self) -> Result<NaiveDateTime> {
        (**self).to_naive_datetime()
    }
}

/// Coarse magnitude of the gap between two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMark {
    Hours,
    Days,
    Months,
    Years,
}

impl TimeMark {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeMark::Hours => "hours",
            TimeMark::Days => "days",
            TimeMark::Months => "months",
            TimeMark::Years => "years",
        }
    }
}

impl fmt::Display for TimeMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar-aware difference between two date/times, normalized so that every
/// component carries the same sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeDelta {
    pub years: i32,
    pub months: i32,
    pub days: i64,
    pub seconds: i64,
}

fn shift_months(datetime: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    // chrono clamps the day to the end of the target month
    if months >= 0 {
        datetime.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        datetime.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

impl RelativeDelta {
    /// Difference `later - earlier`, counting whole months first and then the
    /// remaining days and seconds.
    pub fn between(later: NaiveDateTime, earlier: NaiveDateTime) -> Result<Self> {
        let out_of_range = || Error::OutOfRange(format!("{} - {}", later, earlier));

        let mut months =
            (later.year() - earlier.year()) * 12 + (later.month() as i32 - earlier.month() as i32);
        let mut anchor = shift_months(earlier, months).ok_or_else(out_of_range)?;

        // Step back one month at a time while the anchor overshoots `later`
        let step = if later < earlier { 1 } else { -1 };
        while (later < earlier && later > anchor) || (later >= earlier && later < anchor) {
            months += step;
            anchor = shift_months(earlier, months).ok_or_else(out_of_range)?;
        }

        let remainder = later - anchor;
        let days = remainder.num_days();
        let seconds = (remainder - chrono::Duration::days(days)).num_seconds();

        Ok(Self {
            years: months / 12,
            months: months % 12,
            days,
            seconds,
        })
    }
}

/// Classify the gap between `start_date` and `end_date` as hours, days,
/// months or years (years take precedence over months, months over days).
pub fn date_difference_description<S, E>(start_date: &S, end_date: &E) -> Result<TimeMark>
where
    S: DateInput + ?Sized,
    E: DateInput + ?Sized,
{
    let start = start_date.to_naive_datetime()?;
    let end = end_date.to_naive_datetime()?;
    let delta = RelativeDelta::between(start, end)?;

    let mark = if delta.years != 0 {
        TimeMark::Years
    } else if delta.months != 0 {
        TimeMark::Months
    } else if delta.days != 0 {
        TimeMark::Days
    } else {
        TimeMark::Hours
    };
    Ok(mark)
}

/// Read `value` as a UTC instant and return the epoch seconds of its UTC+7
/// wall-clock time, i.e. the UTC timestamp shifted forward by seven hours.
///
/// Returns `None` when the input cannot be read as a date or falls outside
/// chrono's supported range.
pub fn datetime_to_timestamp_utc7<D: DateInput + ?Sized>(value: &D) -> Option<i64> {
    let naive = value.to_naive_datetime().ok()?;
    let wall_clock = naive.checked_add_signed(chrono::Duration::seconds(UTC7_OFFSET_SECS.into()))?;
    Some(wall_clock.and_utc().timestamp())
}

/// Parse a wall-clock string in UTC+7 and return its Unix timestamp.
///
/// Slash dates are month-first: `03/04/2024` is 4 March 2024.
/// Strings carrying an explicit offset (RFC 3339) keep that offset. Returns
/// `None` for anything that matches none of the accepted layouts.
pub fn date_string_to_timestamp_utc7(date_string: &str) -> Option<i64> {
    let trimmed = date_string.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.timestamp());
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        });

    match naive {
        Some(naive) => utc7()?.from_local_datetime(&naive).single().map(|dt| dt.timestamp()),
        None => {
            tracing::debug!(input = %date_string, "Unrecognized date string");
            None
        }
    }
}
