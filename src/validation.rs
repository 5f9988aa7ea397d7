// ✅ Field Validator
// Amount, date and region rules shared by interactive entry and file import
//
// Interactive entry turns a failure into a corrective message and asks again.
// Import turns the same failure into an `Invalid` field that travels to the report.

use crate::calendar::{max_day, MAX_YEAR, MIN_YEAR};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Text written in place of a field that failed validation
pub const INVALID_MARKER: &str = "?";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Why a raw field was rejected. Messages are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be a number, got '{0}'.")]
    AmountNotNumber(String),

    #[error("Amount must be greater than zero.")]
    AmountNotPositive,

    #[error("{field} must be a whole number, got '{raw}'.")]
    NotAnInteger { field: String, raw: String },

    #[error("{field} must be between {low} and {high}.")]
    OutOfRange { field: String, low: i64, high: i64 },

    #[error("{0} is not in a valid date format (yyyy-mm-dd).")]
    DateFormat(String),

    #[error("Year of the date must be between {} and {}.", MIN_YEAR, MAX_YEAR)]
    DateYear,

    #[error("Region must be one of the following: {}.", Region::valid_codes().join(", "))]
    UnknownRegion(String),
}

// ============================================================================
// AMOUNT
// ============================================================================

/// A sales amount, or the marker for one that could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Amount {
    Valid(f64),
    Invalid,
}

impl Amount {
    pub fn is_valid(&self) -> bool {
        matches!(self, Amount::Valid(_))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Valid(v) => write!(f, "{}", v),
            Amount::Invalid => f.write_str(INVALID_MARKER),
        }
    }
}

/// Parse a real number. Sign is not checked here; see [`require_positive`].
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::AmountNotNumber(trimmed.to_string())),
    }
}

pub fn require_positive(amount: f64) -> Result<f64, ValidationError> {
    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(ValidationError::AmountNotPositive)
    }
}

/// Import-side amount rule: any parseable number is kept, zero and
/// negatives included. Only interactive entry insists on a positive value.
pub fn validate_amount(raw: &str) -> Amount {
    match parse_amount(raw) {
        Ok(v) => Amount::Valid(v),
        Err(_) => Amount::Invalid,
    }
}

// ============================================================================
// SALES DATE
// ============================================================================

/// A calendar date in [MIN_YEAR, MAX_YEAR], or the invalid marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesDate {
    Valid(NaiveDate),
    Invalid,
}

impl SalesDate {
    pub fn is_valid(&self) -> bool {
        matches!(self, SalesDate::Valid(_))
    }

    /// Month number, or None when the date is invalid
    pub fn month(&self) -> Option<u32> {
        match self {
            SalesDate::Valid(d) => Some(d.month()),
            SalesDate::Invalid => None,
        }
    }
}

impl fmt::Display for SalesDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalesDate::Valid(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            SalesDate::Invalid => f.write_str(INVALID_MARKER),
        }
    }
}

fn digits(bytes: &[u8]) -> Option<u32> {
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(bytes.iter().fold(0, |acc, b| acc * 10 + u32::from(b - b'0')))
}

/// Strict `YYYY-MM-DD` check: exact length, dashes at 4 and 7, digits
/// elsewhere, month 1-12, day within the month, year in range.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = raw.as_bytes();
    let format_error = || ValidationError::DateFormat(raw.to_string());

    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(format_error());
    }

    let (year, month, day) = match (digits(&bytes[..4]), digits(&bytes[5..7]), digits(&bytes[8..])) {
        (Some(y), Some(m), Some(d)) => (y as i32, m, d),
        _ => return Err(format_error()),
    };

    if !(1..=12).contains(&month) || !(1..=max_day(year, month)).contains(&day) {
        return Err(format_error());
    }

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ValidationError::DateYear);
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(format_error)
}

pub fn validate_date_string(raw: &str) -> SalesDate {
    match parse_date(raw) {
        Ok(d) => SalesDate::Valid(d),
        Err(_) => SalesDate::Invalid,
    }
}

// ============================================================================
// REGION
// ============================================================================

/// Sales region keyed by a one-letter code.
///
/// `Unrecognized` only arises on the import path, where the code comes from
/// the filename and is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    West,
    Mountain,
    Central,
    East,
    Unrecognized(String),
}

impl Region {
    /// Membership lookup for interactive entry
    pub fn from_code(code: &str) -> Option<Region> {
        match code {
            "w" => Some(Region::West),
            "m" => Some(Region::Mountain),
            "c" => Some(Region::Central),
            "e" => Some(Region::East),
            _ => None,
        }
    }

    /// Lookup that keeps unknown codes instead of rejecting them
    pub fn from_trusted_code(code: &str) -> Region {
        Region::from_code(code).unwrap_or_else(|| Region::Unrecognized(code.to_string()))
    }

    pub fn code(&self) -> &str {
        match self {
            Region::West => "w",
            Region::Mountain => "m",
            Region::Central => "c",
            Region::East => "e",
            Region::Unrecognized(code) => code,
        }
    }

    /// Display name; None for an unrecognized code
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Region::West => Some("West"),
            Region::Mountain => Some("Mountain"),
            Region::Central => Some("Central"),
            Region::East => Some("East"),
            Region::Unrecognized(_) => None,
        }
    }

    pub fn valid_codes() -> Vec<&'static str> {
        vec!["w", "m", "c", "e"]
    }
}

pub fn validate_region_code(code: &str) -> bool {
    Region::from_code(code).is_some()
}

/// Display name for a code. None when the code is not a member.
pub fn region_name(code: &str) -> Option<&'static str> {
    Region::from_code(code).and_then(|r| r.name())
}

pub fn parse_region(code: &str) -> Result<Region, ValidationError> {
    Region::from_code(code).ok_or_else(|| ValidationError::UnknownRegion(code.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
