use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("unrecognized date: {0}")]
    Unrecognized(String),
}

/// Bucketed distance between a timestamp and now
#[derive(Clone, Debug, PartialEq)]
pub enum RelativeTime {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
    /// Older than a week
    Date(DateTime<Utc>),
}

/// Bucket the elapsed time between `then` and `now`.
///
/// All divisions floor, so a timestamp in the future lands in `JustNow`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> RelativeTime {
    let diff = (now - then).num_milliseconds();

    let minutes = diff.div_euclid(MINUTE_MS);
    let hours = diff.div_euclid(HOUR_MS);
    let days = diff.div_euclid(DAY_MS);

    if minutes < 1 {
        RelativeTime::JustNow
    } else if minutes < 60 {
        RelativeTime::Minutes(minutes)
    } else if hours < 24 {
        RelativeTime::Hours(hours)
    } else if days < 7 {
        RelativeTime::Days(days)
    } else {
        RelativeTime::Date(then)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

impl RelativeTime {
    /// Render for display; absolute dates use `locale`
    pub fn render(&self, locale: &str) -> String {
        match self {
            RelativeTime::JustNow => "just now".to_string(),
            RelativeTime::Minutes(n) => plural(*n, "minute"),
            RelativeTime::Hours(n) => plural(*n, "hour"),
            RelativeTime::Days(n) => plural(*n, "day"),
            RelativeTime::Date(dt) => format_locale_date(dt, locale),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn format_locale_date(dt: &DateTime<Utc>, locale: &str) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(dt.timestamp_millis() as f64));
    date.to_locale_date_string(locale, &wasm_bindgen::JsValue::UNDEFINED).into()
}

#[cfg(not(target_arch = "wasm32"))]
fn format_locale_date(dt: &DateTime<Utc>, _locale: &str) -> String {
    dt.format("%Y/%-m/%-d").to_string()
}

/// `YYYY` or `YYYY-MM`, the first day of that period at UTC midnight
fn parse_partial_date(input: &str) -> Option<DateTime<Utc>> {
    let (year, month) = input.split_once('-').unwrap_or((input, "01"));
    if year.len() != 4
        || month.len() != 2
        || !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit())
    {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Parse the date formats the server emits.
///
/// Accepts RFC 3339, ISO 8601 without an offset (read as UTC), and the
/// date-only forms `YYYY-MM-DD`, `YYYY-MM` and `YYYY`. Bare numbers are
/// years, never epoch timestamps.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, TimeError> {
    let input = input.trim();

    if let Some(dt) = parse_partial_date(input) {
        return Ok(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimeError::Unrecognized(input.to_string()))
}

/// Format a date string relative to the current time (e.g. "5 minutes ago")
pub fn format_date(input: &str, locale: &str) -> Result<String, TimeError> {
    let then = parse_date(input)?;
    Ok(relative_time(then, Utc::now()).render(locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_just_now() {
        let then = now() - Duration::seconds(30);
        assert_eq!(relative_time(then, now()), RelativeTime::JustNow);
        assert_eq!(relative_time(then, now()).render("zh-CN"), "just now");
    }

    #[test]
    fn test_future_is_just_now() {
        let then = now() + Duration::seconds(30);
        assert_eq!(relative_time(then, now()), RelativeTime::JustNow);
        let then = now() + Duration::days(3);
        assert_eq!(relative_time(then, now()), RelativeTime::JustNow);
    }

    #[test]
    fn test_minute_bucket() {
        let then = now() - Duration::seconds(61);
        assert_eq!(relative_time(then, now()).render("zh-CN"), "1 minute ago");
        let then = now() - Duration::minutes(59) - Duration::seconds(59);
        assert_eq!(relative_time(then, now()), RelativeTime::Minutes(59));
    }

    #[test]
    fn test_hour_bucket() {
        let then = now() - Duration::minutes(90);
        assert_eq!(relative_time(then, now()), RelativeTime::Hours(1));
        assert_eq!(relative_time(then, now()).render("zh-CN"), "1 hour ago");
        let then = now() - Duration::hours(23);
        assert_eq!(relative_time(then, now()).render("zh-CN"), "23 hours ago");
    }

    #[test]
    fn test_day_bucket() {
        let then = now() - Duration::hours(24);
        assert_eq!(relative_time(then, now()), RelativeTime::Days(1));
        let then = now() - Duration::days(6);
        assert_eq!(relative_time(then, now()).render("zh-CN"), "6 days ago");
    }

    #[test]
    fn test_old_dates_are_absolute() {
        let then = now() - Duration::days(10);
        assert_eq!(relative_time(then, now()), RelativeTime::Date(then));
        assert_eq!(relative_time(then, now()).render("zh-CN"), "2024/6/5");
    }

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_date("2024-06-15T10:30:00Z").unwrap(), expected);
        assert_eq!(parse_date("2024-06-15T12:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_date("2024-06-15T10:30:00").unwrap(), expected);
        assert_eq!(parse_date("2024-06-15T10:30:00.123456").unwrap().timestamp(), expected.timestamp());
        assert_eq!(parse_date("2024-06-15 10:30:00").unwrap(), expected);
        assert_eq!(
            parse_date("2024-06-15").unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_year_and_month() {
        assert_eq!(
            parse_date("2024").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("2024-06").unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_date("2024-13").is_err());
    }

    #[test]
    fn test_digit_strings_are_not_timestamps() {
        assert!(parse_date("1718445000000").is_err());
        assert!(parse_date("20240").is_err());
        assert!(parse_date("-2024").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_date("yesterday"), Err(TimeError::Unrecognized(_))));
        assert!(parse_date("").is_err());
        assert!(format_date("not a date", "zh-CN").is_err());
    }
}
