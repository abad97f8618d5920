//! Date-span arithmetic for the "time remaining" readout.
//!
//! The calculator maps a start/end date pair to a tagged outcome that the
//! command layer renders into the display string shown next to milestone
//! records. "Now" is always an explicit parameter so callers (and tests) can
//! pin the clock.

use crate::error::ParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Display text for a range whose end date precedes its start date.
pub const INVALID_RANGE_MSG: &str = "Invalid: End date before start date";

/// Result of a span computation.
///
/// `Empty` covers absent input, `InvalidRange` an end date earlier than the
/// start date. Both are data, not errors: the owning form shows them in the
/// same read-only field as a valid readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpanOutcome {
    Empty,
    InvalidRange,
    Remaining { days: i64, hours: i64, minutes: i64 },
}

impl SpanOutcome {
    pub fn render(&self) -> String {
        match self {
            SpanOutcome::Empty => String::new(),
            SpanOutcome::InvalidRange => INVALID_RANGE_MSG.to_string(),
            SpanOutcome::Remaining {
                days,
                hours,
                minutes,
            } => format!("{}d : {}h : {}m", days, hours, minutes),
        }
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y",
];

/// Parse a date-picker style value into a calendar date.
///
/// Tries RFC 3339 first, then the fixed formats above, then any configured
/// extra formats. First hit wins.
pub fn parse_calendar_date(input: &str, extra_formats: &[String]) -> Result<NaiveDate, ParseError> {
    let input = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.date_naive());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(datetime.date());
        }
    }

    for format in extra_formats {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }

    Err(ParseError::Date(input.to_string()))
}

/// Compute the time remaining between two date strings, as of `now`.
///
/// Absent or blank input short-circuits to `Empty` without parsing. When the
/// start date is today, the lower bound is `now` itself rather than midnight,
/// so the hour/minute fields count down what is left of the current day. For
/// any other start date the result is an inclusive day count with zeroed
/// hours and minutes.
pub fn compute_span(
    start: Option<&str>,
    end: Option<&str>,
    now: NaiveDateTime,
) -> Result<SpanOutcome, ParseError> {
    compute_span_with_formats(start, end, now, &[])
}

pub fn compute_span_with_formats(
    start: Option<&str>,
    end: Option<&str>,
    now: NaiveDateTime,
    extra_formats: &[String],
) -> Result<SpanOutcome, ParseError> {
    let (start, end) = match (nonblank(start), nonblank(end)) {
        (Some(s), Some(e)) => (s, e),
        _ => return Ok(SpanOutcome::Empty),
    };

    let start_day = parse_calendar_date(start, extra_formats)?;
    let end_day = parse_calendar_date(end, extra_formats)?;
    let today = now.date();

    if start_day == today {
        if end_day == today {
            // Count down from now to the end of today
            let (hours, minutes) = left_of_today(now);
            return Ok(SpanOutcome::Remaining {
                days: 0,
                hours,
                minutes,
            });
        }
        if end_day < start_day {
            return Ok(SpanOutcome::InvalidRange);
        }
        let days = (end_day - today).num_days();
        let (hours, minutes) = left_of_today(now);
        return Ok(SpanOutcome::Remaining {
            days,
            hours,
            minutes,
        });
    }

    if end_day < start_day {
        return Ok(SpanOutcome::InvalidRange);
    }

    // Start is in the past or future: inclusive day count, both ends counted
    let days = (end_day - start_day).num_days() + 1;
    Ok(SpanOutcome::Remaining {
        days,
        hours: 0,
        minutes: 0,
    })
}

/// Whole minutes between `now` and 23:59:59.999 of the same day, split into
/// hours and a minute remainder. Sub-minute residue is truncated.
fn left_of_today(now: NaiveDateTime) -> (i64, i64) {
    let end_of_day = now
        .date()
        .and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
    let total_minutes = (end_of_day - now).num_minutes();
    (total_minutes / 60, total_minutes % 60)
}

fn nonblank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
