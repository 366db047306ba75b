//! Numeric constants and lenient number parsing.
//!
//! The editor stores most numbers the way the user typed them, so a rate
//! may arrive as `0.5`, `"0.500"` or `"0.5%"`. Everything here follows the
//! same rule: read the longest numeric prefix, and fall back to a documented
//! default when there is none.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gem cost of one standard multi. Used as the default step cost, the cost
/// of every universal-phase multi, and the normalization anchor.
pub const STANDARD_MULTI_GEM_COST: u32 = 50;

/// Independent base-rate draws in one multi.
pub const BASE_DRAWS_PER_MULTI: i32 = 10;

/// Pulls in one standard multi (10 base draws plus the final poster draw).
pub const PULLS_PER_STANDARD_MULTI: f64 = 11.0;

/// Cumulative pull chance above which the target counts as guaranteed.
pub const GUARANTEED_THRESHOLD: f64 = 0.9999;

/// Below this, a probability is treated as zero when deciding outcomes.
pub const PROBABILITY_EPSILON: f64 = 1e-9;

/// Below this, remaining probability mass no longer contributes to expected cost.
pub const MASS_EPSILON: f64 = 1e-12;

/// A number as stored by the editor: either a JSON number or decimal text.
///
/// # Examples
///
/// ```rust
/// use sugostat::LooseNumber;
///
/// let rate: LooseNumber = serde_json::from_str("\"0.500\"").unwrap();
/// assert_eq!(rate.to_f64(), Some(0.5));
///
/// let cost: LooseNumber = serde_json::from_str("75").unwrap();
/// assert_eq!(cost.to_int(), Some(75));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    /// A JSON number.
    Number(f64),
    /// Text typed into an input field.
    Text(String),
}

impl LooseNumber {
    /// Parse as a float, `None` if there is no numeric prefix.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(n) if n.is_finite() => Some(*n),
            LooseNumber::Number(_) => None,
            LooseNumber::Text(s) => parse_float_prefix(s),
        }
    }

    /// Parse as an integer (truncating), `None` if there is no numeric prefix.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            LooseNumber::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            LooseNumber::Number(_) => None,
            LooseNumber::Text(s) => parse_int_prefix(s),
        }
    }
}

impl From<f64> for LooseNumber {
    fn from(n: f64) -> Self {
        LooseNumber::Number(n)
    }
}

impl From<u32> for LooseNumber {
    fn from(n: u32) -> Self {
        LooseNumber::Number(f64::from(n))
    }
}

impl From<&str> for LooseNumber {
    fn from(s: &str) -> Self {
        LooseNumber::Text(s.to_string())
    }
}

impl fmt::Display for LooseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseNumber::Number(n) => write!(f, "{}", n),
            LooseNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Read the longest decimal prefix of `s` (after leading whitespace).
///
/// Accepts an optional sign, digits, one decimal point and an exponent.
/// Trailing garbage is ignored, so `"3%"` reads as `3.0`.
///
/// # Examples
///
/// ```rust
/// use sugostat::numeric::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix(" 0.75 "), Some(0.75));
/// assert_eq!(parse_float_prefix("3%"), Some(3.0));
/// assert_eq!(parse_float_prefix(".5"), Some(0.5));
/// assert_eq!(parse_float_prefix("abc"), None);
/// ```
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it carries at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read the longest integer prefix of `s` (after leading whitespace).
///
/// # Examples
///
/// ```rust
/// use sugostat::numeric::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("75 gems"), Some(75));
/// assert_eq!(parse_int_prefix("12.9"), Some(12));
/// assert_eq!(parse_int_prefix("-3"), Some(-3));
/// assert_eq!(parse_int_prefix("x1"), None);
/// ```
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<i64>().ok()
}

/// Convert an optional percentage field to a probability in `[0, 1]`.
///
/// Missing or unparsable input resolves to 0.
pub fn percent_to_probability(value: Option<&LooseNumber>) -> f64 {
    let percent = value.and_then(LooseNumber::to_f64).unwrap_or(0.0);
    (percent / 100.0).clamp(0.0, 1.0)
}

/// Parse an optional integer field, falling back to `default` when the
/// value is missing, unparsable or not positive.
pub fn positive_int_or(value: Option<&LooseNumber>, default: u32) -> u32 {
    value
        .and_then(LooseNumber::to_int)
        .filter(|n| *n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(default)
}

/// Probability that a multi yields nothing: ten misses at `base_rate`
/// followed by a miss at `final_poster_rate`.
pub fn multi_miss_probability(base_rate: f64, final_poster_rate: f64) -> f64 {
    (1.0 - base_rate).powi(BASE_DRAWS_PER_MULTI) * (1.0 - final_poster_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix_edge_cases() {
        assert_eq!(parse_float_prefix("0.500"), Some(0.5));
        assert_eq!(parse_float_prefix("-1.5"), Some(-1.5));
        assert_eq!(parse_float_prefix("1e2"), Some(100.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_parse_int_prefix_edge_cases() {
        assert_eq!(parse_int_prefix("50"), Some(50));
        assert_eq!(parse_int_prefix("  +8"), Some(8));
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("+"), None);
    }

    #[test]
    fn test_loose_number_from_json() {
        let text: LooseNumber = serde_json::from_str("\"2.5\"").unwrap();
        let number: LooseNumber = serde_json::from_str("2.5").unwrap();
        assert_eq!(text.to_f64(), Some(2.5));
        assert_eq!(number.to_f64(), Some(2.5));
        assert_eq!(number.to_int(), Some(2));
    }

    #[test]
    fn test_percent_to_probability_defaults() {
        assert_eq!(percent_to_probability(None), 0.0);
        assert_eq!(percent_to_probability(Some(&LooseNumber::from("abc"))), 0.0);
        assert_eq!(percent_to_probability(Some(&LooseNumber::from("50"))), 0.5);
        assert_eq!(percent_to_probability(Some(&LooseNumber::from(250.0))), 1.0);
        assert_eq!(percent_to_probability(Some(&LooseNumber::from(-5.0))), 0.0);
    }

    #[test]
    fn test_positive_int_or() {
        assert_eq!(positive_int_or(None, 50), 50);
        assert_eq!(positive_int_or(Some(&LooseNumber::from("0")), 50), 50);
        assert_eq!(positive_int_or(Some(&LooseNumber::from("-10")), 50), 50);
        assert_eq!(positive_int_or(Some(&LooseNumber::from(40u32)), 50), 40);
        assert_eq!(positive_int_or(Some(&LooseNumber::from("75.9")), 50), 75);
    }

    #[test]
    fn test_multi_miss_probability() {
        assert_eq!(multi_miss_probability(0.0, 0.0), 1.0);
        assert_eq!(multi_miss_probability(1.0, 0.0), 0.0);
        assert_eq!(multi_miss_probability(0.0, 1.0), 0.0);
        let p = multi_miss_probability(0.005, 0.03);
        assert!((p - 0.995f64.powi(10) * 0.97).abs() < 1e-15);
    }
}
