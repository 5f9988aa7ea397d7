// 📅 Calendar Utility
// Leap years, month lengths and fiscal quarters for sales dates

/// Earliest year accepted in a sales date
pub const MIN_YEAR: i32 = 2000;

/// Latest year accepted in a sales date
pub const MAX_YEAR: i32 = 2999;

/// Gregorian leap-year rule
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`.
///
/// `month` must be in 1..=12; anything else falls through to 31.
pub fn max_day(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Quarter (1-4) of a month.
///
/// Returns 0 for any value outside 1..=12. The report uses that 0 to show
/// "no quarter" for rows whose date did not validate.
pub fn quarter(month: u32) -> u32 {
    match month {
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        10..=12 => 4,
        _ => 0,
    }
}

// ============================================================================
// TESTS
// ============================================================================
