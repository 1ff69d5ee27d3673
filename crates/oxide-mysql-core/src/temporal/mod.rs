//! Temporal values.
//!
//! [`Time`] packs a DATE, DATETIME or TIMESTAMP into one `u64`: the date and
//! time-of-day fields in the high 60 bits and a 4-bit tag holding the type
//! and the fractional seconds precision (fsp) in the low bits. [`Duration`]
//! is a signed nanosecond offset used for TIME values.
//!
//! The parsers accept the same loose literal syntax MySQL does. They report
//! problems through [`Error`](crate::error::Error) values and, for
//! recoverable truncations, through the warnings of a
//! [`Context`](crate::context::Context).

mod calendar;
mod core_time;
mod duration;
mod format;
mod interval;
mod parse;
mod str_to_date;
mod time;

pub use calendar::{
    calc_daynr, calc_weekday, days_in_month, get_date_from_daynr, is_leap_year, WeekMode,
};
pub use core_time::{CoreTime, Time, TimeType};
pub use duration::{parse_duration, Duration, DurationResult, MAX_TIME, MIN_TIME};
pub use format::{format_int_width_n, MONTH_NAMES, WEEKDAY_NAMES};
pub use interval::{
    extract_datetime_num, extract_duration_num, extract_duration_value, is_clock_unit,
    is_date_unit, is_microsecond_unit, parse_duration_value, IntervalUnit, IntervalValue,
};
pub use parse::{
    adjust_year, adjust_year_checked, get_frac_index, get_fsp, get_timezone, is_date_format,
    parse_date, parse_date_format, parse_datetime, parse_time, parse_time_from_float_string,
    parse_time_from_float64, parse_time_from_decimal, parse_time_from_int64, parse_time_from_num,
    parse_time_from_year, parse_timestamp, parse_year, TimezoneSuffix,
};
pub use str_to_date::{date_fsp, get_format_type};
pub(crate) use parse::parse_datetime_from_num;
pub use time::{time_from_days, MAX_DATETIME, MAX_TIMESTAMP, MIN_DATETIME, MIN_TIMESTAMP};

use crate::error::{Error, Result};
use crate::mysql::{DEFAULT_FSP, MAX_FSP, MIN_FSP, UNSPECIFIED_FSP};

/// Smallest YEAR value.
pub const MIN_YEAR: i64 = 1901;
/// Largest YEAR value.
pub const MAX_YEAR: i64 = 2155;
/// Largest hour a TIME value can hold.
pub const TIME_MAX_HOUR: i64 = 838;
/// Largest minute a TIME value can hold.
pub const TIME_MAX_MINUTE: i64 = 59;
/// Largest second a TIME value can hold.
pub const TIME_MAX_SECOND: i64 = 59;
/// `838:59:59` as an `HHMMSS` number.
pub const TIME_MAX_VALUE: i64 = TIME_MAX_HOUR * 10000 + TIME_MAX_MINUTE * 100 + TIME_MAX_SECOND;
/// `838:59:59` in seconds.
pub const TIME_MAX_VALUE_SECONDS: i64 =
    TIME_MAX_HOUR * 3600 + TIME_MAX_MINUTE * 60 + TIME_MAX_SECOND;
/// The zero datetime as text.
pub const ZERO_DATETIME_STR: &str = "0000-00-00 00:00:00";
/// The zero date as text.
pub const ZERO_DATE_STR: &str = "0000-00-00";

pub(crate) const NANOS_PER_MICRO: i64 = 1_000;
pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const MICROS_PER_SECOND: i64 = 1_000_000;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Validates a fractional seconds precision.
///
/// An unspecified fsp becomes the default of 0. Values outside `0..=6` are
/// rejected.
pub fn check_fsp(fsp: i32) -> Result<i32> {
    if fsp == UNSPECIFIED_FSP {
        return Ok(DEFAULT_FSP);
    }
    if !(MIN_FSP..=MAX_FSP).contains(&fsp) {
        return Err(Error::TooBigPrecision {
            fsp: i64::from(fsp),
            column: "CAST".to_string(),
            max: MAX_FSP as u64,
        });
    }
    Ok(fsp)
}

/// Parses the digits after a decimal point into microseconds rounded to
/// `fsp` digits.
///
/// Returns the microseconds and whether rounding overflowed into the next
/// second, e.g. `"999"` at fsp 2.
pub fn parse_frac(s: &str, fsp: i32) -> Result<(u32, bool)> {
    if s.is_empty() {
        return Ok((0, false));
    }
    let fsp = check_fsp(fsp)? as usize;
    let bad = || Error::BadNumber(s.to_string());
    if fsp >= s.len() {
        let v: u32 = s.parse().map_err(|_| bad())?;
        return Ok((v * 10u32.pow((MAX_FSP as usize - s.len()) as u32), false));
    }
    let v: u64 = s[..=fsp].parse().map_err(|_| bad())?;
    let rounded = (v + 5) / 10;
    if rounded >= 10u64.pow(fsp as u32) {
        return Ok((0, true));
    }
    let micro = rounded * 10u64.pow((MAX_FSP as usize - fsp) as u32);
    Ok((micro as u32, false))
}

/// MySQL's notion of punctuation: every printable ASCII symbol.
pub(crate) const fn is_punctuation(c: u8) -> bool {
    matches!(c, b'!'..=b'/' | b':'..=b'@' | b'['..=b'`' | b'{'..=b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_fsp() {
        assert_eq!(check_fsp(UNSPECIFIED_FSP).unwrap(), 0);
        assert_eq!(check_fsp(3).unwrap(), 3);
        assert_eq!(check_fsp(6).unwrap(), 6);
        assert_eq!(check_fsp(7).unwrap_err().code(), 1426);
        assert!(check_fsp(-2).is_err());
    }

    #[test]
    fn test_parse_frac() {
        assert_eq!(parse_frac("", 6).unwrap(), (0, false));
        assert_eq!(parse_frac("123456", 6).unwrap(), (123_456, false));
        assert_eq!(parse_frac("12", 6).unwrap(), (120_000, false));
        assert_eq!(parse_frac("1236", 3).unwrap(), (124_000, false));
        assert_eq!(parse_frac("0312", 2).unwrap(), (30_000, false));
        assert_eq!(parse_frac("999", 2).unwrap(), (0, true));
        assert_eq!(parse_frac("999999", 0).unwrap(), (0, true));
        assert_eq!(parse_frac("4", 0).unwrap(), (0, false));
    }

    #[test]
    fn test_is_punctuation() {
        assert!(is_punctuation(b'-'));
        assert!(is_punctuation(b':'));
        assert!(is_punctuation(b'~'));
        assert!(!is_punctuation(b' '));
        assert!(!is_punctuation(b'7'));
        assert!(!is_punctuation(b'T'));
    }
}
