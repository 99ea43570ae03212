//! Dates in India Standard Time.
//!
//! Every date the dashboard shows is read and displayed in IST (UTC+05:30,
//! no daylight saving). Functions that need "now" come in two flavours: a
//! convenience form that reads the system clock and an `_at` form that takes
//! the current instant, which is what the tests use.
//!
//! # Examples
//!
//! ```rust
//! use covidash::dates::{format_date, parse_india_date};
//! use covidash::locale::LocaleTable;
//! use chrono::Utc;
//!
//! let en = LocaleTable::english();
//! assert_eq!(format_date("2020-04-05", "dd MMM", &en).unwrap(), "05 Apr");
//! assert_eq!(format_date("", "dd MMM", &en).unwrap(), "");
//!
//! let date = parse_india_date(Some("2020-04-05"), Utc::now()).unwrap();
//! assert_eq!(date.to_rfc3339(), "2020-04-05T00:00:00+05:30");
//! ```

use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc,
};

use crate::locale::LocaleTable;

/// Offset of India Standard Time from UTC.
pub const IST: FixedOffset = match FixedOffset::east_opt(5 * 3600 + 30 * 60) {
    Some(offset) => offset,
    None => panic!("IST offset out of range"),
};

/// Error returned when a date or a format pattern can't be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The input is not a recognised date or timestamp.
    Invalid {
        /// The offending input.
        input: String,
    },
    /// The pattern contains a letter that is not a supported token.
    UnsupportedToken(char),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { input } => write!(f, "invalid date: {:?}", input),
            Self::UnsupportedToken(c) => {
                write!(f, "format string contains an unescaped latin character `{}`", c)
            }
        }
    }
}

impl std::error::Error for DateError {}

/// The IST offset.
pub fn india_offset() -> FixedOffset {
    IST
}

/// The current instant in IST.
pub fn india_date() -> DateTime<FixedOffset> {
    india_date_at(Utc::now())
}

/// `now` in IST.
pub fn india_date_at(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    now.with_timezone(&IST)
}

/// Today's IST date as `YYYY-MM-DD`.
pub fn india_date_iso() -> String {
    india_date_iso_at(Utc::now())
}

/// The IST date of `now` as `YYYY-MM-DD`.
pub fn india_date_iso_at(now: DateTime<Utc>) -> String {
    iso_date(&india_date_at(now))
}

/// This time yesterday, in IST.
pub fn india_date_yesterday() -> DateTime<FixedOffset> {
    india_date_yesterday_at(Utc::now())
}

/// One calendar day before `now`, in IST.
pub fn india_date_yesterday_at(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    india_date_at(now) - TimeDelta::days(1)
}

/// Yesterday's IST date as `YYYY-MM-DD`.
pub fn india_date_yesterday_iso() -> String {
    india_date_yesterday_iso_at(Utc::now())
}

/// The IST date before `now` as `YYYY-MM-DD`.
pub fn india_date_yesterday_iso_at(now: DateTime<Utc>) -> String {
    iso_date(&india_date_yesterday_at(now))
}

fn iso_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a dashboard date into IST.
///
/// - `None` or `""`: `now`
/// - `YYYY-MM-DD`: midnight IST on that date
/// - RFC 3339 with an offset: that instant, shown in IST
/// - `YYYY-MM-DDTHH:MM:SS` without an offset: that wall-clock time in IST
pub fn parse_india_date(
    input: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<FixedOffset>, DateError> {
    match input {
        None | Some("") => Ok(india_date_at(now)),
        Some(s) => parse_explicit(s),
    }
}

fn parse_explicit(input: &str) -> Result<DateTime<FixedOffset>, DateError> {
    let s = input.trim();

    if is_iso_date(s) {
        if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return local_ist(midnight, input);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&IST));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return local_ist(naive, input);
        }
    }

    Err(DateError::Invalid {
        input: input.to_string(),
    })
}

fn local_ist(naive: NaiveDateTime, input: &str) -> Result<DateTime<FixedOffset>, DateError> {
    IST.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| DateError::Invalid {
            input: input.to_string(),
        })
}

/// `^\d{4}-\d{2}-\d{2}$`
fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

/// Parse `input` as an IST date and format it with a date-fns style pattern.
///
/// An empty input formats to an empty string.
///
/// | Token | Output |
/// |-------|--------|
/// | `yyyy` / `yy` / `y` | 2021 / 21 / 2021 |
/// | `MMMM` / `MMM` / `MM` / `M` | April / Apr / 04 / 4 |
/// | `do` / `dd` / `d` | 5th / 05 / 5 |
/// | `EEEE` / `EEE` | Monday / Mon |
/// | `HH` / `H` / `hh` / `h` | 15 / 15 / 03 / 3 |
/// | `mm` / `m` / `ss` / `s` | minutes / seconds |
/// | `a` / `aaa` | PM / pm |
/// | `p` / `pp` | 3:07 PM / 3:07:09 PM |
///
/// Text in single quotes is copied as is; `''` is a literal quote.
pub fn format_date(input: &str, pattern: &str, locale: &LocaleTable) -> Result<String, DateError> {
    if input.is_empty() {
        return Ok(String::new());
    }
    let date = parse_explicit(input)?;
    format_datetime(&date, pattern, locale)
}

/// Format an already-parsed date, after converting it to IST.
pub fn format_datetime<Tz: TimeZone>(
    date: &DateTime<Tz>,
    pattern: &str,
    locale: &LocaleTable,
) -> Result<String, DateError> {
    let date = date.with_timezone(&IST);
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            i += 1;
            if chars.get(i) == Some(&'\'') {
                out.push('\'');
                i += 1;
                continue;
            }
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                out.push(chars[i]);
                i += 1;
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        i += run;

        match c {
            'y' => {
                let year = date.year();
                if run == 2 {
                    out.push_str(&format!("{:02}", year.rem_euclid(100)));
                } else {
                    out.push_str(&format!("{:0width$}", year, width = run));
                }
            }
            'M' => {
                let month0 = date.month0();
                match run {
                    1 => out.push_str(&date.month().to_string()),
                    2 => out.push_str(&format!("{:02}", date.month())),
                    3 => out.push_str(locale.month_short(month0)),
                    4 => out.push_str(locale.month(month0)),
                    _ => out.extend(locale.month(month0).chars().take(1)),
                }
            }
            'd' if run == 1 && chars.get(i) == Some(&'o') => {
                i += 1;
                out.push_str(&ordinal(date.day(), locale));
            }
            'd' => out.push_str(&pad(date.day(), run)),
            'E' => {
                let from_sunday = date.weekday().num_days_from_sunday();
                match run {
                    1..=3 => out.push_str(locale.weekday_short(from_sunday)),
                    4 => out.push_str(locale.weekday(from_sunday)),
                    _ => out.extend(locale.weekday(from_sunday).chars().take(1)),
                }
            }
            'H' => out.push_str(&pad(date.hour(), run)),
            'h' => out.push_str(&pad(date.hour12().1, run)),
            'm' => out.push_str(&pad(date.minute(), run)),
            's' => out.push_str(&pad(date.second(), run)),
            'a' => {
                let period = locale.day_period(date.hour());
                if run == 3 {
                    out.push_str(&period.to_lowercase());
                } else {
                    out.push_str(period);
                }
            }
            'p' => {
                out.push_str(&format!("{}:{:02}", date.hour12().1, date.minute()));
                if run >= 2 {
                    out.push_str(&format!(":{:02}", date.second()));
                }
                out.push(' ');
                out.push_str(locale.day_period(date.hour()));
            }
            other => return Err(DateError::UnsupportedToken(other)),
        }
    }

    Ok(out)
}

fn pad(value: u32, width: usize) -> String {
    format!("{:0width$}", value, width = width.min(2))
}

fn ordinal(day: u32, locale: &LocaleTable) -> String {
    if !locale.code.starts_with("en") {
        return day.to_string();
    }
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

/// How long ago `timestamp` was, relative to the system clock.
pub fn format_last_updated(timestamp: &str, locale: &LocaleTable) -> Result<String, DateError> {
    format_last_updated_at(timestamp, Utc::now(), locale)
}

/// How far `timestamp` is from `now`, in words ("about 2 hours").
pub fn format_last_updated_at(
    timestamp: &str,
    now: DateTime<Utc>,
    locale: &LocaleTable,
) -> Result<String, DateError> {
    let then = parse_explicit(timestamp)?;
    Ok(format_distance(&then, &india_date_at(now), locale))
}

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2520;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

/// The distance between two instants in words, without a suffix.
///
/// The order of the arguments doesn't matter.
pub fn format_distance(
    a: &DateTime<FixedOffset>,
    b: &DateTime<FixedOffset>,
    locale: &LocaleTable,
) -> String {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    let phrases = &locale.distance;

    let seconds = (*later - *earlier).num_seconds();
    let minutes = (seconds as f64 / 60.0).round() as i64;
    let nearest = |unit: i64| (minutes as f64 / unit as f64).round() as i64;

    if minutes < 2 {
        return if minutes == 0 {
            phrases.less_than_x_minutes.render(1)
        } else {
            phrases.x_minutes.render(minutes)
        };
    }
    if minutes < 45 {
        return phrases.x_minutes.render(minutes);
    }
    if minutes < 90 {
        return phrases.about_x_hours.render(1);
    }
    if minutes < MINUTES_IN_DAY {
        return phrases.about_x_hours.render(nearest(60));
    }
    if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        return phrases.x_days.render(1);
    }
    if minutes < MINUTES_IN_MONTH {
        return phrases.x_days.render(nearest(MINUTES_IN_DAY));
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        return phrases.about_x_months.render(nearest(MINUTES_IN_MONTH));
    }

    let months = difference_in_months(later, earlier);
    if months < 12 {
        return phrases.x_months.render(nearest(MINUTES_IN_MONTH));
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => phrases.about_x_years.render(years),
        3..=8 => phrases.over_x_years.render(years),
        _ => phrases.almost_x_years.render(years + 1),
    }
}

/// Whole calendar months from `earlier` to `later`, both taken in IST.
fn difference_in_months(later: &DateTime<FixedOffset>, earlier: &DateTime<FixedOffset>) -> i64 {
    let later = later.with_timezone(&IST);
    let earlier = earlier.with_timezone(&IST);
    let mut months = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month())
        - i64::from(earlier.month());
    if months > 0 && (later.day(), later.time()) < (earlier.day(), earlier.time()) {
        months -= 1;
    }
    months
}

/// Whole days from `earlier` to `later`, truncated toward zero.
pub fn difference_in_days<A: TimeZone, B: TimeZone>(later: &DateTime<A>, earlier: &DateTime<B>) -> i64 {
    later
        .with_timezone(&Utc)
        .signed_duration_since(earlier.with_timezone(&Utc))
        .num_days()
}
