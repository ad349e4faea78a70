//! Extraction of numeric values from free-form spreadsheet cells.
//!
//! Cells look like `"1,200 cc"`, `"$89,990"`, `"322 km/h"` or `"2.5 sec"`.
//! Only the first numeric run in a cell is used, so a range such as
//! `"150-200 hp"` yields `150`. A cell with no digits is absent, not an
//! error.

use std::sync::OnceLock;

use regex::Regex;

static DIGIT_RUN_RE: OnceLock<Regex> = OnceLock::new();
static DECIMAL_RUN_RE: OnceLock<Regex> = OnceLock::new();

fn digit_run_regex() -> &'static Regex {
    DIGIT_RUN_RE.get_or_init(|| {
        // A run must start with a digit so a stray separator is never a match.
        Regex::new(r"\d[\d,]*")
            .unwrap_or_else(|error| panic!("digit run regex failed to compile: {error}"))
    })
}

fn decimal_run_regex() -> &'static Regex {
    DECIMAL_RUN_RE.get_or_init(|| {
        Regex::new(r"\d+(?:\.\d*)?|\.\d+")
            .unwrap_or_else(|error| panic!("decimal run regex failed to compile: {error}"))
    })
}

/// Failure to represent an extracted digit run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    /// The digit run does not fit in 64 bits.
    #[error("number {digits} is too large")]
    Overflow {
        /// Digits after separators were removed.
        digits: String,
    },
}

/// Extract the first integer from a cell, ignoring thousands separators.
///
/// # Examples
/// ```
/// use car_catalogue::domain::field_parser::parse_numeric;
///
/// assert_eq!(parse_numeric(Some("1,200 cc")), Ok(Some(1200)));
/// assert_eq!(parse_numeric(Some("")), Ok(None));
/// assert_eq!(parse_numeric(None), Ok(None));
/// ```
pub fn parse_numeric(value: Option<&str>) -> Result<Option<u64>, FieldParseError> {
    let Some(run) = value.and_then(|cell| digit_run_regex().find(cell)) else {
        return Ok(None);
    };
    let digits: String = run.as_str().chars().filter(|ch| *ch != ',').collect();
    digits
        .parse::<u64>()
        .map(Some)
        .map_err(|_| FieldParseError::Overflow { digits })
}

/// Extract a price from a currency-formatted cell.
///
/// Currency symbols and trailing text fall outside the captured run, so
/// `"$1,100,000 "` yields `1100000`.
pub fn parse_price(value: Option<&str>) -> Result<Option<u64>, FieldParseError> {
    parse_numeric(value)
}

/// Extract the first decimal number from a cell.
///
/// # Examples
/// ```
/// use car_catalogue::domain::field_parser::parse_float;
///
/// assert_eq!(parse_float(Some("2.5 sec")), Some(2.5));
/// assert_eq!(parse_float(Some("N/A")), None);
/// ```
#[must_use]
pub fn parse_float(value: Option<&str>) -> Option<f64> {
    let run = value.and_then(|cell| decimal_run_regex().find(cell))?;
    run.as_str().parse::<f64>().ok()
}
