//! Indian-style number formatting.
//!
//! Numbers are grouped the en-IN way (`12,34,567`) with at most one
//! fraction digit, and large values abbreviate to thousands (K), lakhs (L)
//! and crores (Cr).
//!
//! ```rust
//! use covidash::number::{abbreviate_number, format_indian, format_number, NumberStyle};
//! use covidash::statistic::Statistic;
//!
//! assert_eq!(format_indian(1234567.89), "12,34,567.9");
//! assert_eq!(abbreviate_number(2_50_00_000.0), "2.5Cr");
//! assert_eq!(format_number(0.0, NumberStyle::Plain, Some(Statistic::Tested)), "-");
//! assert_eq!(format_number(12.34, NumberStyle::Percent, None), "12.3%");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::statistic::Statistic;

/// Placeholder shown when there is no number to show.
pub const MISSING: &str = "-";

/// How [`format_number`] renders a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NumberStyle {
    /// Grouped, one fraction digit at most.
    #[default]
    Plain,
    /// Abbreviated with K, L or Cr.
    Short,
    /// Floored to an integer first.
    Int,
    /// Followed by a percent sign.
    #[cfg_attr(feature = "serde", serde(rename = "%"))]
    Percent,
}

impl FromStr for NumberStyle {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`NumberStyle::Plain`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "short" => Self::Short,
            "int" => Self::Int,
            "%" => Self::Percent,
            _ => Self::Plain,
        })
    }
}

impl fmt::Display for NumberStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Short => "short",
            Self::Int => "int",
            Self::Percent => "%",
        })
    }
}

/// Format `value` with en-IN grouping and at most one fraction digit.
///
/// Rounds half away from zero. A value that rounds to zero prints as `0`,
/// never `-0`.
pub fn format_indian(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let digits = round_to_tenths(value.abs());
    let (int_digits, frac_digit) = digits.split_at(digits.len() - 1);

    let mut out = String::with_capacity(digits.len() + digits.len() / 2 + 2);
    if value < 0.0 && digits.bytes().any(|d| d != b'0') {
        out.push('-');
    }
    out.push_str(&group_indian(int_digits));
    if frac_digit != "0" {
        out.push('.');
        out.push_str(frac_digit);
    }
    out
}

/// Digits of `magnitude` in tenths, rounded half up on its exact decimal
/// expansion. Always at least two digits: `0.35` gives `"03"`.
fn round_to_tenths(magnitude: f64) -> String {
    // Thirty places separates every double from the nearest `x.x5` boundary.
    let exact = format!("{:.30}", magnitude);
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut fraction = fraction.bytes();
    let tenth = fraction.next().unwrap_or(b'0');
    let round_up = fraction.next().is_some_and(|d| d >= b'5');

    let mut digits: Vec<u8> = whole.bytes().chain(std::iter::once(tenth)).collect();
    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }
    digits.into_iter().map(char::from).collect()
}

/// Insert en-IN separators: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last3) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    let lead = head.len() % 2;
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (i + 2 - lead) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(last3);
    out
}

/// Abbreviate `value` into Indian units.
///
/// | Magnitude | Divisor | Suffix |
/// |-----------|---------|--------|
/// | < 1e3 | 1 | |
/// | < 1e5 | 1e3 | K |
/// | < 1e7 | 1e5 | L |
/// | < 1e10 | 1e7 | Cr |
/// | < 1e14 | 1e10 | K Cr |
/// | otherwise | 1e14 | L Cr |
///
/// Non-finite input has no sensible abbreviation and renders as `-`.
pub fn abbreviate_number(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let magnitude = value.abs();
    let (divisor, suffix) = if magnitude < 1e3 {
        (1.0, "")
    } else if magnitude < 1e5 {
        (1e3, "K")
    } else if magnitude < 1e7 {
        (1e5, "L")
    } else if magnitude < 1e10 {
        (1e7, "Cr")
    } else if magnitude < 1e14 {
        (1e10, "K Cr")
    } else {
        (1e14, "L Cr")
    };
    format!("{}{}", format_indian(value / divisor), suffix)
}

/// Format a statistic value for display.
///
/// `NaN` renders as `-`, and so does `0` for statistics where zero means
/// "not reported" (see [`Statistic::zero_is_missing`]).
pub fn format_number(value: f64, style: NumberStyle, statistic: Option<Statistic>) -> String {
    if value.is_nan() || (value == 0.0 && statistic.is_some_and(Statistic::zero_is_missing)) {
        return MISSING.to_string();
    }
    match style {
        NumberStyle::Short => abbreviate_number(value),
        NumberStyle::Int => format_indian(value.floor()),
        NumberStyle::Percent => format!("{}%", format_indian(value)),
        NumberStyle::Plain => format_indian(value),
    }
}
