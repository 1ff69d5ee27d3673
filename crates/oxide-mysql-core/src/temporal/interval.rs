//! `INTERVAL` units: extracting fields from temporal values and parsing
//! interval expressions such as `'1 2:3:4.5' DAY_MICROSECOND`.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::core_time::Time;
use super::duration::{Duration, MAX_TIME};
use super::{
    NANOS_PER_MICRO, NANOS_PER_SECOND, SECONDS_PER_DAY, TIME_MAX_HOUR, TIME_MAX_MINUTE,
    TIME_MAX_VALUE_SECONDS,
};
use crate::error::{Error, Lossy, LossyResult, Result, DATETIME_STR, TIME_STR};
use crate::mysql::{MAX_FSP, MIN_FSP};

static FRAC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9]{0,6}").expect("valid fraction prefix regex"));
static DIGIT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+").expect("valid digit run regex"));

const NANOS_PER_DAY: i64 = SECONDS_PER_DAY * NANOS_PER_SECOND;
const MICROS_PER_DAY: i64 = NANOS_PER_DAY / NANOS_PER_MICRO;

/// An `INTERVAL` unit keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalUnit {
    Microsecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
    SecondMicrosecond,
    MinuteMicrosecond,
    MinuteSecond,
    HourMicrosecond,
    HourSecond,
    HourMinute,
    DayMicrosecond,
    DaySecond,
    DayMinute,
    DayHour,
    YearMonth,
}

impl IntervalUnit {
    /// The SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Microsecond => "MICROSECOND",
            Self::Second => "SECOND",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Quarter => "QUARTER",
            Self::Year => "YEAR",
            Self::SecondMicrosecond => "SECOND_MICROSECOND",
            Self::MinuteMicrosecond => "MINUTE_MICROSECOND",
            Self::MinuteSecond => "MINUTE_SECOND",
            Self::HourMicrosecond => "HOUR_MICROSECOND",
            Self::HourSecond => "HOUR_SECOND",
            Self::HourMinute => "HOUR_MINUTE",
            Self::DayMicrosecond => "DAY_MICROSECOND",
            Self::DaySecond => "DAY_SECOND",
            Self::DayMinute => "DAY_MINUTE",
            Self::DayHour => "DAY_HOUR",
            Self::YearMonth => "YEAR_MONTH",
        }
    }

    /// Units that carry an hour, minute, second or microsecond field.
    #[must_use]
    pub const fn is_clock(self) -> bool {
        !matches!(
            self,
            Self::Day | Self::Week | Self::Month | Self::Quarter | Self::Year | Self::YearMonth
        )
    }

    /// Units that carry a year, quarter, month, week or day field.
    #[must_use]
    pub const fn is_date(self) -> bool {
        matches!(
            self,
            Self::Day
                | Self::Week
                | Self::Month
                | Self::Quarter
                | Self::Year
                | Self::DayMicrosecond
                | Self::DaySecond
                | Self::DayMinute
                | Self::DayHour
                | Self::YearMonth
        )
    }

    /// Units that carry a microsecond field.
    #[must_use]
    pub const fn is_microsecond(self) -> bool {
        matches!(
            self,
            Self::Microsecond
                | Self::SecondMicrosecond
                | Self::MinuteMicrosecond
                | Self::HourMicrosecond
                | Self::DayMicrosecond
        )
    }

    /// For composite units, the last field present and the number of
    /// fields the expression may hold.
    const fn composite(self) -> Option<(usize, usize)> {
        Some(match self {
            Self::SecondMicrosecond => (MICRO, 2),
            Self::MinuteMicrosecond => (MICRO, 3),
            Self::MinuteSecond => (SECOND, 2),
            Self::HourMicrosecond => (MICRO, 4),
            Self::HourSecond => (SECOND, 3),
            Self::HourMinute => (MINUTE, 2),
            Self::DayMicrosecond => (MICRO, 5),
            Self::DaySecond => (SECOND, 4),
            Self::DayMinute => (MINUTE, 3),
            Self::DayHour => (HOUR, 2),
            Self::YearMonth => (MONTH, 2),
            _ => return None,
        })
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let unit = match s.to_ascii_uppercase().as_str() {
            "MICROSECOND" => Self::Microsecond,
            "SECOND" => Self::Second,
            "MINUTE" => Self::Minute,
            "HOUR" => Self::Hour,
            "DAY" => Self::Day,
            "WEEK" => Self::Week,
            "MONTH" => Self::Month,
            "QUARTER" => Self::Quarter,
            "YEAR" => Self::Year,
            "SECOND_MICROSECOND" => Self::SecondMicrosecond,
            "MINUTE_MICROSECOND" => Self::MinuteMicrosecond,
            "MINUTE_SECOND" => Self::MinuteSecond,
            "HOUR_MICROSECOND" => Self::HourMicrosecond,
            "HOUR_SECOND" => Self::HourSecond,
            "HOUR_MINUTE" => Self::HourMinute,
            "DAY_MICROSECOND" => Self::DayMicrosecond,
            "DAY_SECOND" => Self::DaySecond,
            "DAY_MINUTE" => Self::DayMinute,
            "DAY_HOUR" => Self::DayHour,
            "YEAR_MONTH" => Self::YearMonth,
            _ => return Err(Error::InvalidUnit(s.to_string())),
        };
        Ok(unit)
    }
}

// Field positions in `YEARS-MONTHS DAYS HOURS:MINUTES:SECONDS.MICROS`.
const MONTH: usize = 1;
const HOUR: usize = 3;
const MINUTE: usize = 4;
const SECOND: usize = 5;
const MICRO: usize = 6;

/// A parsed interval expression.
///
/// `nanos` never spans a whole day; full days are carried in `days`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalValue {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub nanos: i64,
    pub fsp: i32,
}

impl IntervalValue {
    const fn new(years: i64, months: i64, days: i64, nanos: i64, fsp: i32) -> Self {
        Self {
            years,
            months,
            days,
            nanos,
            fsp,
        }
    }
}

/// `EXTRACT(unit FROM datetime)`.
pub fn extract_datetime_num(t: Time, unit: &str) -> Result<i64> {
    let (h, m, s) = t.clock();
    let (h, m, s) = (i64::from(h), i64::from(m), i64::from(s));
    let day = i64::from(t.day());
    let v = match unit.parse::<IntervalUnit>()? {
        IntervalUnit::Day => day,
        IntervalUnit::Week => t.week(0),
        IntervalUnit::Month => i64::from(t.month()),
        IntervalUnit::Quarter => (i64::from(t.month()) + 2) / 3,
        IntervalUnit::Year => i64::from(t.year()),
        IntervalUnit::DayMicrosecond => {
            (day * 1_000_000 + h * 10_000 + m * 100 + s) * 1_000_000
                + i64::from(t.microsecond())
        }
        IntervalUnit::DaySecond => day * 1_000_000 + h * 10_000 + m * 100 + s,
        IntervalUnit::DayMinute => day * 10_000 + h * 100 + m,
        IntervalUnit::DayHour => day * 100 + h,
        IntervalUnit::YearMonth => i64::from(t.year()) * 100 + i64::from(t.month()),
        other => return Err(Error::InvalidUnit(other.to_string())),
    };
    Ok(v)
}

/// `EXTRACT(unit FROM time)`. Negative durations give negative results.
pub fn extract_duration_num(d: Duration, unit: &str) -> Result<i64> {
    let (neg, h, m, s, us) = d.split();
    let (h, m, s, us) = (h as i64, m as i64, s as i64, us as i64);
    let v = match unit.parse::<IntervalUnit>()? {
        IntervalUnit::Microsecond => us,
        IntervalUnit::Second => s,
        IntervalUnit::Minute => m,
        IntervalUnit::Hour => h,
        IntervalUnit::SecondMicrosecond => s * 1_000_000 + us,
        IntervalUnit::MinuteMicrosecond => m * 100_000_000 + s * 1_000_000 + us,
        IntervalUnit::MinuteSecond => m * 100 + s,
        IntervalUnit::HourMicrosecond => {
            h * 10_000_000_000 + m * 100_000_000 + s * 1_000_000 + us
        }
        IntervalUnit::HourSecond | IntervalUnit::DaySecond => h * 10_000 + m * 100 + s,
        IntervalUnit::HourMinute | IntervalUnit::DayMinute => h * 100 + m,
        IntervalUnit::DayMicrosecond => (h * 10_000 + m * 100 + s) * 1_000_000 + us,
        IntervalUnit::DayHour => h,
        other => return Err(Error::InvalidUnit(other.to_string())),
    };
    Ok(if neg { -v } else { v })
}

/// Parses a signed integer, saturating on overflow the way the interval
/// arithmetic expects. Returns `None` for text that is not a number.
fn parse_int_saturating(s: &str) -> Option<i64> {
    match s.parse::<i64>() {
        Ok(v) => Some(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Parses a single-unit expression `A[.B]`.
///
/// The fraction rounds the integer part half away from zero for every unit
/// except SECOND, which keeps it as microseconds. Parse problems are
/// returned alongside the best-effort value.
fn parse_single_time_value(
    unit: IntervalUnit,
    format: &str,
    strict: bool,
) -> LossyResult<IntervalValue> {
    let point = format.find('.').unwrap_or(format.len());
    let sign = if format.starts_with('-') { -1 } else { 1 };

    let mut err = None;
    let iv = parse_int_saturating(&format[..point]).unwrap_or_else(|| {
        err = Some(Error::wrong_value(DATETIME_STR, format));
        0
    });
    let mut riv = iv;

    let mut decimal_len = 0;
    let mut dv = 0i64;
    if point + 1 < format.len() {
        let prefix = FRAC_PREFIX
            .find(&format[point + 1..])
            .map_or("", |m| m.as_str());
        decimal_len = prefix.len();
        dv = format!("{prefix:0<6}").parse().unwrap_or(0);
        if dv >= 500_000 {
            riv = riv.saturating_add(sign);
        }
        if unit != IntervalUnit::Second && err.is_none() {
            err = Some(Error::truncated_wrong_value(TIME_STR, format));
        }
        dv *= sign;
    }

    let overflow = || Lossy::new(IntervalValue::default(), Error::datetime_overflow());
    let abs = riv.unsigned_abs();
    let value = match unit {
        IntervalUnit::Microsecond => {
            if strict && abs > (TIME_MAX_VALUE_SECONDS * 1000) as u64 {
                return Err(overflow());
            }
            IntervalValue::new(
                0,
                0,
                riv / MICROS_PER_DAY,
                riv % MICROS_PER_DAY * NANOS_PER_MICRO,
                MAX_FSP,
            )
        }
        IntervalUnit::Second => {
            if strict && iv.unsigned_abs() > TIME_MAX_VALUE_SECONDS as u64 {
                return Err(overflow());
            }
            IntervalValue::new(
                0,
                0,
                iv / SECONDS_PER_DAY,
                iv % SECONDS_PER_DAY * NANOS_PER_SECOND + dv * NANOS_PER_MICRO,
                decimal_len as i32,
            )
        }
        IntervalUnit::Minute => {
            if strict && abs > (TIME_MAX_HOUR * 60 + TIME_MAX_MINUTE) as u64 {
                return Err(overflow());
            }
            IntervalValue::new(0, 0, riv / 1440, riv % 1440 * 60 * NANOS_PER_SECOND, 0)
        }
        IntervalUnit::Hour => {
            if strict && abs > TIME_MAX_HOUR as u64 {
                return Err(overflow());
            }
            IntervalValue::new(0, 0, riv / 24, riv % 24 * 3600 * NANOS_PER_SECOND, 0)
        }
        IntervalUnit::Day => {
            if strict && abs > (TIME_MAX_HOUR / 24) as u64 {
                return Err(overflow());
            }
            IntervalValue::new(0, 0, riv, 0, 0)
        }
        IntervalUnit::Week => {
            if strict && abs.saturating_mul(7) > (TIME_MAX_HOUR / 24) as u64 {
                return Err(overflow());
            }
            IntervalValue::new(0, 0, riv.wrapping_mul(7), 0, 0)
        }
        IntervalUnit::Month => {
            if strict && abs > 1 {
                return Err(overflow());
            }
            IntervalValue::new(0, riv, 0, 0, 0)
        }
        IntervalUnit::Quarter => {
            if strict {
                return Err(overflow());
            }
            IntervalValue::new(0, riv.wrapping_mul(3), 0, 0, 0)
        }
        IntervalUnit::Year => {
            if strict {
                return Err(overflow());
            }
            IntervalValue::new(riv, 0, 0, 0, 0)
        }
        other => {
            return Err(Lossy::new(
                IntervalValue::default(),
                Error::InvalidUnit(other.to_string()),
            ))
        }
    };
    match err {
        Some(e) => Err(Lossy::new(value, e)),
        None => Ok(value),
    }
}

/// Parses a composite expression. Digit runs fill the fields backwards
/// from `last`; any punctuation separates them.
fn parse_time_value(format: &str, last: usize, count: usize) -> LossyResult<IntervalValue> {
    let original = format;
    let fsp = if last == MICRO { MAX_FSP } else { MIN_FSP };
    let mut format = format.trim();
    let neg = format.starts_with('-');
    if neg {
        format = &format[1..];
    }

    let runs: Vec<&str> = DIGIT_RUNS.find_iter(format).map(|m| m.as_str()).collect();
    if runs.len() > count {
        return Err(Lossy::new(
            IntervalValue::default(),
            Error::wrong_value(DATETIME_STR, original),
        ));
    }

    let mut fields = [0i64; 7];
    let mut err = None;
    let mut index = last;
    for (i, run) in runs.iter().rev().enumerate() {
        let digits = if index == MICRO {
            let mut micro: String = run.chars().take(MAX_FSP as usize).collect();
            while micro.len() < MAX_FSP as usize {
                micro.push('0');
            }
            micro
        } else {
            (*run).to_string()
        };
        let v = parse_int_saturating(&digits).unwrap_or_else(|| {
            err.get_or_insert_with(|| Error::wrong_value(DATETIME_STR, original));
            0
        });
        fields[index] = if neg { -v } else { v };
        if i + 1 < runs.len() {
            index -= 1;
        }
    }

    let [years, months, mut days, hours, minutes, seconds, micros] = fields;
    let mut seconds = hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds);
    days = days.saturating_add(seconds / SECONDS_PER_DAY);
    seconds %= SECONDS_PER_DAY;
    let value = IntervalValue::new(
        years,
        months,
        days,
        seconds * NANOS_PER_SECOND + micros * NANOS_PER_MICRO,
        fsp,
    );
    match err {
        Some(e) => Err(Lossy::new(value, e)),
        None => Ok(value),
    }
}

/// Parses a composite expression into a TIME-sized nanosecond count.
fn parse_and_validate_duration_value(format: &str, last: usize, count: usize) -> Result<(i64, i32)> {
    let v = parse_time_value(format, last, count)?;
    if v.years != 0 || v.months != 0 || v.days.unsigned_abs() > (TIME_MAX_HOUR / 24) as u64 {
        return Err(Error::datetime_overflow());
    }
    let nanos = v.days * NANOS_PER_DAY + v.nanos;
    if nanos.unsigned_abs() > MAX_TIME as u64 {
        return Err(Error::datetime_overflow());
    }
    Ok((nanos, v.fsp))
}

/// Parses the expression of `INTERVAL format unit` into calendar fields
/// plus a sub-day nanosecond part.
pub fn parse_duration_value(unit: &str, format: &str) -> LossyResult<IntervalValue> {
    let unit = unit
        .parse::<IntervalUnit>()
        .map_err(|e| Lossy::new(IntervalValue::default(), e))?;
    match unit.composite() {
        Some((last, count)) => parse_time_value(format, last, count),
        None => parse_single_time_value(unit, format, false),
    }
}

/// Parses the expression of `INTERVAL format unit` as a TIME value.
///
/// Fails with a datetime overflow when the interval does not fit the TIME
/// range; YEAR_MONTH never does.
pub fn extract_duration_value(unit: &str, format: &str) -> Result<Duration> {
    let unit = unit.parse::<IntervalUnit>()?;
    let Some((last, count)) = unit.composite() else {
        let v = parse_single_time_value(unit, format, true)?;
        let days = v.months * 30 + v.days;
        return Ok(Duration::from_nanos(days * NANOS_PER_DAY + v.nanos, v.fsp));
    };
    let (nanos, fsp) = parse_and_validate_duration_value(format, last, count)?;
    if unit == IntervalUnit::YearMonth {
        return Err(Error::datetime_overflow());
    }
    Ok(Duration::from_nanos(nanos, fsp))
}

/// True when `unit` names an hour, minute, second or microsecond field.
#[must_use]
pub fn is_clock_unit(unit: &str) -> bool {
    unit.parse::<IntervalUnit>().is_ok_and(IntervalUnit::is_clock)
}

/// True when `unit` names a year, quarter, month, week or day field.
#[must_use]
pub fn is_date_unit(unit: &str) -> bool {
    unit.parse::<IntervalUnit>().is_ok_and(IntervalUnit::is_date)
}

/// True when `unit` names a microsecond field.
#[must_use]
pub fn is_microsecond_unit(unit: &str) -> bool {
    unit.parse::<IntervalUnit>()
        .is_ok_and(IntervalUnit::is_microsecond)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::{CoreTime, TimeType};

    const HOUR_NANOS: i64 = 3600 * NANOS_PER_SECOND;

    #[test]
    fn test_unit_from_str() {
        assert_eq!("day_hour".parse::<IntervalUnit>().unwrap(), IntervalUnit::DayHour);
        assert_eq!("MICROSECOND".parse::<IntervalUnit>().unwrap().to_string(), "MICROSECOND");
        assert_eq!(
            "fortnight".parse::<IntervalUnit>().unwrap_err().code(),
            1105
        );
    }

    #[test]
    fn test_unit_predicates() {
        assert!(is_clock_unit("hour_minute"));
        assert!(is_clock_unit("DAY_HOUR"));
        assert!(!is_clock_unit("DAY"));
        assert!(is_date_unit("DAY_SECOND"));
        assert!(is_date_unit("quarter"));
        assert!(!is_date_unit("HOUR"));
        assert!(is_microsecond_unit("SECOND_MICROSECOND"));
        assert!(!is_microsecond_unit("SECOND"));
        assert!(!is_clock_unit("bogus"));
    }

    #[test]
    fn test_extract_datetime_num() {
        let t = Time::new(
            CoreTime::from_date(2011, 11, 11, 10, 10, 10, 123_456),
            TimeType::Datetime,
            6,
        );
        let cases = [
            ("day", 11),
            ("week", 45),
            ("month", 11),
            ("quarter", 4),
            ("year", 2011),
            ("day_microsecond", 11_101_010_123_456),
            ("day_second", 11_101_010),
            ("day_minute", 111_010),
            ("day_hour", 1110),
            ("year_month", 201_111),
        ];
        for (unit, want) in cases {
            assert_eq!(extract_datetime_num(t, unit).unwrap(), want, "{unit}");
        }
        assert!(extract_datetime_num(t, "hour").is_err());
        assert!(extract_datetime_num(t, "bogus").is_err());
    }

    #[test]
    fn test_extract_duration_num() {
        let d = Duration::new(11, 22, 33, 123_456, 6).neg();
        let cases = [
            ("microsecond", -123_456),
            ("second", -33),
            ("minute", -22),
            ("hour", -11),
            ("second_microsecond", -33_123_456),
            ("minute_microsecond", -2_233_123_456),
            ("minute_second", -2233),
            ("hour_microsecond", -112_233_123_456),
            ("hour_second", -112_233),
            ("hour_minute", -1122),
            ("day_microsecond", -112_233_123_456),
            ("day_second", -112_233),
            ("day_minute", -1122),
            ("day_hour", -11),
        ];
        for (unit, want) in cases {
            assert_eq!(extract_duration_num(d, unit).unwrap(), want, "{unit}");
        }
        assert!(extract_duration_num(d, "year").is_err());
    }

    #[test]
    fn test_parse_single_units() {
        let v = parse_duration_value("DAY", "3").unwrap();
        assert_eq!(v, IntervalValue::new(0, 0, 3, 0, 0));

        let v = parse_duration_value("HOUR", "-25").unwrap();
        assert_eq!((v.days, v.nanos), (-1, -HOUR_NANOS));

        let v = parse_duration_value("SECOND", "1.5").unwrap();
        assert_eq!((v.days, v.nanos, v.fsp), (0, 1_500_000_000, 1));

        let v = parse_duration_value("QUARTER", "2").unwrap();
        assert_eq!(v.months, 6);
        let v = parse_duration_value("WEEK", "2").unwrap();
        assert_eq!(v.days, 14);
    }

    #[test]
    fn test_parse_single_unit_fraction_rounds() {
        let err = parse_duration_value("DAY", "1.5").unwrap_err();
        assert_eq!(err.value.days, 2);
        assert!(matches!(err.error, Error::TruncatedWrongValue { .. }));

        let err = parse_duration_value("HOUR", "-1.6").unwrap_err();
        assert_eq!(err.value.nanos, -2 * HOUR_NANOS);

        let err = parse_duration_value("DAY", "x").unwrap_err();
        assert!(matches!(err.error, Error::WrongValue { .. }));
        assert_eq!(err.value.days, 0);
    }

    #[test]
    fn test_parse_composite_units() {
        let v = parse_duration_value("DAY_MICROSECOND", "1 2:3:4.5").unwrap();
        assert_eq!(v.days, 1);
        assert_eq!(v.nanos, 2 * HOUR_NANOS + 3 * 60 * NANOS_PER_SECOND + 4 * NANOS_PER_SECOND + 500_000_000);
        assert_eq!(v.fsp, 6);

        let v = parse_duration_value("YEAR_MONTH", "-1-2").unwrap();
        assert_eq!((v.years, v.months), (-1, -2));

        let v = parse_duration_value("HOUR_MINUTE", "25:30").unwrap();
        assert_eq!((v.days, v.nanos, v.fsp), (1, HOUR_NANOS + 30 * 60 * NANOS_PER_SECOND, 0));

        let v = parse_duration_value("DAY_SECOND", "5").unwrap();
        assert_eq!(v.nanos, 5 * NANOS_PER_SECOND);

        let err = parse_duration_value("HOUR_MINUTE", "1:2:3").unwrap_err();
        assert!(matches!(err.error, Error::WrongValue { .. }));
    }

    #[test]
    fn test_extract_duration_value() {
        let d = extract_duration_value("HOUR_SECOND", "1:2:3").unwrap();
        assert_eq!(d, Duration::new(1, 2, 3, 0, 0));

        let d = extract_duration_value("MINUTE", "90").unwrap();
        assert_eq!(d, Duration::new(1, 30, 0, 0, 0));

        let d = extract_duration_value("SECOND_MICROSECOND", "-1.25").unwrap();
        assert_eq!(d, Duration::new(0, 0, 1, 250_000, 6).neg());

        let d = extract_duration_value("DAY", "2").unwrap();
        assert_eq!(d.nanos(), 48 * HOUR_NANOS);
    }

    #[test]
    fn test_extract_duration_value_overflow() {
        let overflow = |unit: &str, v: &str| {
            matches!(
                extract_duration_value(unit, v),
                Err(Error::DatetimeFunctionOverflow { .. })
            )
        };
        assert!(overflow("HOUR", "839"));
        assert!(overflow("DAY", "35"));
        assert!(overflow("YEAR", "1"));
        assert!(overflow("QUARTER", "0"));
        assert!(overflow("YEAR_MONTH", "0-0"));
        assert!(overflow("DAY_HOUR", "34 23"));
        assert!(!overflow("HOUR", "838"));
        assert!(!overflow("MONTH", "1"));
    }
}
