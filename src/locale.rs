//! Locale tables for date formatting.
//!
//! A [`LocaleTable`] is plain, immutable data passed to each formatter call.
//! There is no process-wide "current locale": the host application decides
//! which table applies and hands it over explicitly.
//!
//! ```rust
//! use covidash::locale::{locale_shorthand, LocaleTable};
//!
//! let english = LocaleTable::english();
//! assert_eq!(english.month(0), "January");
//! assert_eq!(locale_shorthand("en"), Some("enUS"));
//! ```

/// Month names, weekday names and relative-distance phrases for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocaleTable {
    /// Identifier such as `enUS` or `hi`.
    pub code: String,
    /// Full month names, January first.
    pub months: [String; 12],
    /// Abbreviated month names, January first.
    pub months_short: [String; 12],
    /// Full weekday names, Sunday first.
    pub weekdays: [String; 7],
    /// Abbreviated weekday names, Sunday first.
    pub weekdays_short: [String; 7],
    /// Morning and afternoon markers, in that order.
    pub day_periods: [String; 2],
    /// Phrases used by [`format_last_updated`](crate::dates::format_last_updated).
    pub distance: DistancePhrases,
}

/// Relative-distance phrases, one pair per unit of granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistancePhrases {
    /// "less than a minute"
    pub less_than_x_minutes: Plural,
    /// "3 minutes"
    pub x_minutes: Plural,
    /// "about 2 hours"
    pub about_x_hours: Plural,
    /// "4 days"
    pub x_days: Plural,
    /// "about 1 month"
    pub about_x_months: Plural,
    /// "5 months"
    pub x_months: Plural,
    /// "about 1 year"
    pub about_x_years: Plural,
    /// "over 2 years"
    pub over_x_years: Plural,
    /// "almost 3 years"
    pub almost_x_years: Plural,
}

/// A singular and a plural template. `{{count}}` is replaced by the count.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plural {
    /// Used when the count is exactly one.
    pub one: String,
    /// Used for every other count.
    pub other: String,
}

impl Plural {
    fn new(one: &str, other: &str) -> Self {
        Self {
            one: one.to_string(),
            other: other.to_string(),
        }
    }

    /// Render the phrase for `count`.
    pub fn render(&self, count: i64) -> String {
        if count == 1 {
            self.one.clone()
        } else {
            self.other.replace("{{count}}", &count.to_string())
        }
    }
}

impl LocaleTable {
    /// The built-in en-US table.
    pub fn english() -> Self {
        Self {
            code: "enUS".to_string(),
            months: strings([
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]),
            months_short: strings([
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            weekdays: strings([
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]),
            weekdays_short: strings(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
            day_periods: strings(["AM", "PM"]),
            distance: DistancePhrases {
                less_than_x_minutes: Plural::new("less than a minute", "less than {{count}} minutes"),
                x_minutes: Plural::new("1 minute", "{{count}} minutes"),
                about_x_hours: Plural::new("about 1 hour", "about {{count}} hours"),
                x_days: Plural::new("1 day", "{{count}} days"),
                about_x_months: Plural::new("about 1 month", "about {{count}} months"),
                x_months: Plural::new("1 month", "{{count}} months"),
                about_x_years: Plural::new("about 1 year", "about {{count}} years"),
                over_x_years: Plural::new("over 1 year", "over {{count}} years"),
                almost_x_years: Plural::new("almost 1 year", "almost {{count}} years"),
            },
        }
    }

    /// Full month name, `month0` counted from 0 for January.
    pub fn month(&self, month0: u32) -> &str {
        &self.months[month0 as usize % 12]
    }

    /// Abbreviated month name, `month0` counted from 0 for January.
    pub fn month_short(&self, month0: u32) -> &str {
        &self.months_short[month0 as usize % 12]
    }

    /// Full weekday name, counted from 0 for Sunday.
    pub fn weekday(&self, from_sunday: u32) -> &str {
        &self.weekdays[from_sunday as usize % 7]
    }

    /// Abbreviated weekday name, counted from 0 for Sunday.
    pub fn weekday_short(&self, from_sunday: u32) -> &str {
        &self.weekdays_short[from_sunday as usize % 7]
    }

    /// AM/PM marker for a 24-hour clock hour.
    pub fn day_period(&self, hour: u32) -> &str {
        &self.day_periods[usize::from(hour >= 12)]
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::english()
    }
}

fn strings<const N: usize>(names: [&str; N]) -> [String; N] {
    names.map(str::to_string)
}

/// Map a dashboard language code to its locale identifier.
///
/// Returns `None` for languages the dashboard does not ship.
pub fn locale_shorthand(language: &str) -> Option<&'static str> {
    let code = match language {
        "en" | "en-US" => "enUS",
        "hi" => "hi",
        "te" => "te",
        "kn" => "kn",
        "gu" => "gu",
        "ta" => "ta",
        "bn" => "bn",
        "mr" => "mr",
        "ml" => "ml",
        "pa" => "pa",
        "or" => "or",
        "as" => "as",
        _ => return None,
    };
    Some(code)
}
