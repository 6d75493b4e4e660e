//! Partial-precision dates, date-times and times
//!
//! Records carry temporal data as strings, so comparison operators try to
//! read both operands as temporal values first. Two temporal values compare
//! at the lesser of their precisions.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cmp::Ordering;

use crate::value::{DatePrecision, DateTimePrecision, TimePrecision, Value, ValueData};

/// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
pub fn parse_date_value(input: &str) -> Option<Value> {
    let (date, precision) = parse_date(input)?;
    Some(Value::date_with_precision(date, precision))
}

/// Parse `hh:mm`, `hh:mm:ss` or `hh:mm:ss.fff`
pub fn parse_time_value(input: &str) -> Option<Value> {
    let (time, precision) = parse_time(input)?;
    if precision == TimePrecision::Hour {
        return None;
    }
    Some(Value::time_with_precision(time, precision))
}

/// Parse `YYYY-MM-DDThh[:mm[:ss[.fff]]][Z|+hh:mm|-hh:mm]`; a bare `YYYY[-MM[-DD]]T`
/// is a date-time with date precision.
pub fn parse_datetime_value(input: &str) -> Option<Value> {
    let (date_part, rest) = input.split_once('T')?;
    let (date, date_precision) = parse_date(date_part)?;

    if rest.is_empty() {
        let value = NaiveDateTime::new(date, NaiveTime::MIN);
        return Some(Value::datetime_with_precision_and_offset(
            value,
            date_precision.into(),
            None,
        ));
    }

    if date_precision != DatePrecision::Day {
        return None;
    }

    let (time_part, offset) = split_timezone(rest)?;
    let (time, time_precision) = parse_time(time_part)?;
    let precision = match time_precision {
        TimePrecision::Hour => DateTimePrecision::Hour,
        TimePrecision::Minute => DateTimePrecision::Minute,
        TimePrecision::Second => DateTimePrecision::Second,
        TimePrecision::Millisecond => DateTimePrecision::Millisecond,
    };

    Some(Value::datetime_with_precision_and_offset(
        NaiveDateTime::new(date, time),
        precision,
        offset,
    ))
}

/// Read a string as whichever temporal form it matches
pub fn parse_temporal(input: &str) -> Option<Value> {
    let s = input.trim();
    if s.contains('T') {
        parse_datetime_value(s)
    } else if s.contains(':') {
        parse_time_value(s)
    } else {
        parse_date_value(s)
    }
}

pub fn is_temporal(value: &Value) -> bool {
    matches!(
        value.data(),
        ValueData::Date { .. } | ValueData::DateTime { .. } | ValueData::Time { .. }
    )
}

/// Read a value as temporal: temporal values as-is, strings when they parse
pub fn as_temporal(value: &Value) -> Option<Value> {
    match value.data() {
        ValueData::String(s) => parse_temporal(s),
        _ if is_temporal(value) => Some(value.clone()),
        _ => None,
    }
}

/// Compare two temporal values at their common precision.
///
/// Returns `None` when the values are not both temporal, or when a
/// time-of-day is compared with a date.
pub fn compare_temporal(left: &Value, right: &Value) -> Option<Ordering> {
    match (Instant::of(left)?, Instant::of(right)?) {
        (Instant::Calendar(a), Instant::Calendar(b)) => Some(compare_calendar(&a, &b)),
        (Instant::Clock(a, pa), Instant::Clock(b, pb)) => {
            let len = (pa.min(pb) as usize) + 1;
            let ka = clock_components(a);
            let kb = clock_components(b);
            Some(ka[..len].cmp(&kb[..len]))
        }
        _ => None,
    }
}

/// Compare two strings chronologically when both parse as temporal values
pub fn compare_temporal_strings(left: &str, right: &str) -> Option<Ordering> {
    compare_temporal(&parse_temporal(left)?, &parse_temporal(right)?)
}

struct CalendarInstant {
    local: NaiveDateTime,
    precision: DateTimePrecision,
    offset: Option<i32>,
}

enum Instant {
    Calendar(CalendarInstant),
    Clock(NaiveTime, TimePrecision),
}

impl Instant {
    fn of(value: &Value) -> Option<Self> {
        match value.data() {
            ValueData::Date { value, precision } => Some(Instant::Calendar(CalendarInstant {
                local: NaiveDateTime::new(*value, NaiveTime::MIN),
                precision: (*precision).into(),
                offset: None,
            })),
            ValueData::DateTime {
                value,
                precision,
                offset,
            } => Some(Instant::Calendar(CalendarInstant {
                local: *value,
                precision: *precision,
                offset: *offset,
            })),
            ValueData::Time { value, precision } => Some(Instant::Clock(*value, *precision)),
            _ => None,
        }
    }
}

fn compare_calendar(a: &CalendarInstant, b: &CalendarInstant) -> Ordering {
    let precision = a.precision.min(b.precision);
    let len = (precision as usize) + 1;

    // Date-level comparisons use the dates as written; once a time of day
    // takes part, both sides are normalized to UTC (no offset reads as UTC).
    let (left, right) = if precision <= DateTimePrecision::Day {
        (a.local, b.local)
    } else {
        (to_utc(a), to_utc(b))
    };

    calendar_components(left)[..len].cmp(&calendar_components(right)[..len])
}

fn to_utc(instant: &CalendarInstant) -> NaiveDateTime {
    match instant.offset {
        Some(seconds) => instant.local - Duration::seconds(i64::from(seconds)),
        None => instant.local,
    }
}

fn calendar_components(value: NaiveDateTime) -> [i64; 7] {
    [
        i64::from(value.year()),
        i64::from(value.month()),
        i64::from(value.day()),
        i64::from(value.hour()),
        i64::from(value.minute()),
        i64::from(value.second()),
        i64::from(value.nanosecond() / 1_000_000),
    ]
}

fn clock_components(value: NaiveTime) -> [u32; 4] {
    [
        value.hour(),
        value.minute(),
        value.second(),
        value.nanosecond() / 1_000_000,
    ]
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_date(input: &str) -> Option<(NaiveDate, DatePrecision)> {
    let mut parts = input.split('-');
    let year = parts.next().filter(|p| all_digits(p, 4))?.parse().ok()?;
    let month = match parts.next() {
        Some(m) if all_digits(m, 2) => Some(m.parse().ok()?),
        Some(_) => return None,
        None => None,
    };
    let day = match parts.next() {
        Some(d) if all_digits(d, 2) && month.is_some() => Some(d.parse().ok()?),
        Some(_) => return None,
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }

    match (month, day) {
        (None, _) => Some((NaiveDate::from_ymd_opt(year, 1, 1)?, DatePrecision::Year)),
        (Some(m), None) => Some((NaiveDate::from_ymd_opt(year, m, 1)?, DatePrecision::Month)),
        (Some(m), Some(d)) => Some((NaiveDate::from_ymd_opt(year, m, d)?, DatePrecision::Day)),
    }
}

fn parse_time(input: &str) -> Option<(NaiveTime, TimePrecision)> {
    let (main, fraction) = match input.split_once('.') {
        Some((main, fraction)) => (main, Some(fraction)),
        None => (input, None),
    };

    let fields: Vec<&str> = main.split(':').collect();
    if !fields.iter().all(|f| all_digits(f, 2)) {
        return None;
    }
    let number = |i: usize| -> Option<u32> { fields.get(i).map_or(Some(0), |f| f.parse().ok()) };
    let (hour, minute, second) = (number(0)?, number(1)?, number(2)?);

    let precision = match (fields.len(), fraction) {
        (1, None) => TimePrecision::Hour,
        (2, None) => TimePrecision::Minute,
        (3, None) => TimePrecision::Second,
        (3, Some(_)) => TimePrecision::Millisecond,
        _ => return None,
    };

    let millis = match fraction {
        Some(f) if !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()) => {
            let digits: String = f.chars().take(3).collect();
            format!("{:0<3}", digits).parse::<u32>().ok()?
        }
        Some(_) => return None,
        None => 0,
    };

    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    Some((time, precision))
}

/// Split a trailing `Z` or `±hh:mm` offset from a time string
fn split_timezone(rest: &str) -> Option<(&str, Option<i32>)> {
    if let Some(stripped) = rest.strip_suffix('Z') {
        return Some((stripped, Some(0)));
    }

    if let Some(pos) = rest.rfind(['+', '-']) {
        let (time, tz) = rest.split_at(pos);
        let bytes = tz.as_bytes();
        if tz.len() != 6 || bytes[3] != b':' {
            return None;
        }
        let sign = if bytes[0] == b'-' { -1 } else { 1 };
        let hours: i32 = tz[1..3].parse().ok()?;
        let minutes: i32 = tz[4..6].parse().ok()?;
        if hours > 14 || minutes > 59 {
            return None;
        }
        return Some((time, Some(sign * (hours * 3600 + minutes * 60))));
    }

    Some((rest, None))
}

pub(crate) fn format_date(value: NaiveDate, precision: DatePrecision) -> String {
    match precision {
        DatePrecision::Year => value.format("%Y").to_string(),
        DatePrecision::Month => value.format("%Y-%m").to_string(),
        DatePrecision::Day => value.format("%Y-%m-%d").to_string(),
    }
}

pub(crate) fn format_time(value: NaiveTime, precision: TimePrecision) -> String {
    match precision {
        TimePrecision::Hour => value.format("%H").to_string(),
        TimePrecision::Minute => value.format("%H:%M").to_string(),
        TimePrecision::Second => value.format("%H:%M:%S").to_string(),
        TimePrecision::Millisecond => value.format("%H:%M:%S%.3f").to_string(),
    }
}

pub(crate) fn format_datetime(
    value: NaiveDateTime,
    precision: DateTimePrecision,
    offset: Option<i32>,
) -> String {
    let date = value.date();
    let time_precision = match precision {
        DateTimePrecision::Year => return format!("{}T", format_date(date, DatePrecision::Year)),
        DateTimePrecision::Month => return format!("{}T", format_date(date, DatePrecision::Month)),
        DateTimePrecision::Day => return format!("{}T", format_date(date, DatePrecision::Day)),
        DateTimePrecision::Hour => TimePrecision::Hour,
        DateTimePrecision::Minute => TimePrecision::Minute,
        DateTimePrecision::Second => TimePrecision::Second,
        DateTimePrecision::Millisecond => TimePrecision::Millisecond,
    };
    let mut out = format!(
        "{}T{}",
        date.format("%Y-%m-%d"),
        format_time(value.time(), time_precision)
    );

    match offset {
        Some(0) => out.push('Z'),
        Some(seconds) => {
            let sign = if seconds < 0 { '-' } else { '+' };
            let abs = seconds.abs();
            out.push_str(&format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60));
        }
        None => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &str, b: &str) -> Option<Ordering> {
        compare_temporal_strings(a, b)
    }

    #[test]
    fn test_rejects_non_temporal_strings() {
        for s in ["daily", "2016-2017", "kg", "http://unitsofmeasure.org", "12", "2016-13-01"] {
            assert!(parse_temporal(s).is_none(), "{} should not parse", s);
        }
    }

    #[test]
    fn test_date_precision() {
        let value = parse_temporal("2016-06").unwrap();
        assert!(matches!(
            value.data(),
            ValueData::Date {
                precision: DatePrecision::Month,
                ..
            }
        ));
        assert_eq!(value.to_string(), "2016-06");
    }

    #[test]
    fn test_date_ordering() {
        assert_eq!(cmp("2016-06-06", "2016-06-16"), Some(Ordering::Less));
        assert_eq!(cmp("2016-06-06", "2016-06-01"), Some(Ordering::Greater));
    }

    #[test]
    fn test_datetime_with_offsets() {
        assert_eq!(
            cmp("2016-06-06T10:55:34+01:00", "2016-06-16T09:44:23+01:00"),
            Some(Ordering::Less)
        );
        // Same instant written in two offsets
        assert_eq!(
            cmp("2016-06-06T10:00:00+01:00", "2016-06-06T09:00:00Z"),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_mixed_precision_truncates() {
        assert_eq!(cmp("2016-06-06", "2016-06-06T23:59:59+05:00"), Some(Ordering::Equal));
        assert_eq!(cmp("2016", "2016-12-31"), Some(Ordering::Equal));
        assert_eq!(cmp("2016-06", "2016-07-01"), Some(Ordering::Less));
    }

    #[test]
    fn test_times() {
        assert_eq!(cmp("10:30", "10:30:59"), Some(Ordering::Equal));
        assert_eq!(cmp("10:30:00.250", "10:30:00.100"), Some(Ordering::Greater));
        assert_eq!(cmp("10:30", "2016-06-06"), None);
    }

    #[test]
    fn test_datetime_formatting() {
        let value = parse_temporal("2016-06-06T10:55:34+01:00").unwrap();
        assert_eq!(value.to_string(), "2016-06-06T10:55:34+01:00");
        let utc = parse_temporal("2016-06-06T10:55Z").unwrap();
        assert_eq!(utc.to_string(), "2016-06-06T10:55Z");
    }
}
