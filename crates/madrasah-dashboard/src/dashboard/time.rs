//! Local-calendar helpers shared by the derivations.

use super::error::DerivationError;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;
use std::sync::LazyLock;

static TIME_OF_DAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?").unwrap());

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parses a backend date or timestamp into a local naive date-time.
///
/// Accepts RFC 3339 (converted to the local zone), naive timestamps and
/// plain `YYYY-MM-DD` dates (midnight).
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, DerivationError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| DerivationError::InvalidDate(raw.to_string()))
}

/// Parses an optional date field, treating absence as an error too.
pub fn parse_optional(raw: Option<&str>) -> Result<NaiveDateTime, DerivationError> {
    match raw {
        Some(value) => parse_datetime(value),
        None => Err(DerivationError::InvalidDate(String::new())),
    }
}

/// True when `raw` is a plain date with no time component.
pub fn is_date_only(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_ok()
}

/// Parses `H:MM`, `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, DerivationError> {
    let caps = TIME_OF_DAY_REGEX
        .captures(raw)
        .ok_or_else(|| DerivationError::InvalidTime(raw.to_string()))?;

    let field = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    NaiveTime::from_hms_opt(field(1), field(2), field(3))
        .ok_or_else(|| DerivationError::InvalidTime(raw.to_string()))
}

/// First and last day of the month containing `today`, both inclusive.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let next_month = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(today);

    (start, end)
}

/// True when `date` falls in the same calendar month and year as `now`.
pub fn same_month(date: NaiveDateTime, now: NaiveDateTime) -> bool {
    date.year() == now.year() && date.month() == now.month()
}

/// Matches an English or Malay weekday name against `day`.
pub fn weekday_matches(name: &str, day: Weekday) -> bool {
    parse_weekday(name) == Some(day)
}

/// Resolves a weekday name, case-insensitively.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let day = match name.trim().to_lowercase().as_str() {
        "monday" | "mon" | "isnin" => Weekday::Mon,
        "tuesday" | "tue" | "selasa" => Weekday::Tue,
        "wednesday" | "wed" | "rabu" => Weekday::Wed,
        "thursday" | "thu" | "khamis" => Weekday::Thu,
        "friday" | "fri" | "jumaat" => Weekday::Fri,
        "saturday" | "sat" | "sabtu" => Weekday::Sat,
        "sunday" | "sun" | "ahad" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();

        assert_eq!(parse_datetime("2026-10-16 08:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("2026-10-16T08:30:00.000").unwrap(), expected);
        assert_eq!(
            parse_datetime("2026-10-16").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap().and_time(NaiveTime::MIN)
        );
        assert!(parse_datetime("not a date").is_err());
        assert!(parse_optional(None).is_err());
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            parse_time_of_day("8:05").unwrap(),
            NaiveTime::from_hms_opt(8, 5, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("14:30:15").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 15).unwrap()
        );
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("pagi").is_err());
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 10, 31).unwrap());

        let (_, end) = month_bounds(NaiveDate::from_ymd_opt(2028, 2, 3).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());

        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn test_weekday_names() {
        assert!(weekday_matches("Jumaat", Weekday::Fri));
        assert!(weekday_matches("friday", Weekday::Fri));
        assert!(weekday_matches(" AHAD ", Weekday::Sun));
        assert!(!weekday_matches("Isnin", Weekday::Tue));
        assert_eq!(parse_weekday("someday"), None);
    }
}
