//! TIME values and their parser.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::core_time::{CoreTime, Time, TimeType};
use super::format::format_int_width_n;
use super::parse::{adjust_year_checked, parse_datetime};
use super::{check_fsp, parse_frac, NANOS_PER_MICRO, NANOS_PER_SECOND, TIME_MAX_HOUR};
use crate::context::Context;
use crate::error::{Error, Lossy, LossyResult, Result, TIME_STR};
use crate::mysql::{DEFAULT_FSP, MAX_FSP};

/// `838:59:59` in nanoseconds.
pub const MAX_TIME: i64 = (838 * 3600 + 59 * 60 + 59) * NANOS_PER_SECOND;
/// `-838:59:59` in nanoseconds.
pub const MIN_TIME: i64 = -MAX_TIME;

/// A signed TIME value with nanosecond resolution and its own fsp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration {
    nanos: i64,
    fsp: i32,
}

impl Duration {
    /// `00:00:00` with fsp 0.
    pub const ZERO: Self = Self {
        nanos: 0,
        fsp: DEFAULT_FSP,
    };

    /// Creates a duration from its parts.
    #[must_use]
    pub const fn new(hour: i64, minute: i64, second: i64, microsecond: i64, fsp: i32) -> Self {
        Self {
            nanos: (hour * 3600 + minute * 60 + second) * NANOS_PER_SECOND
                + microsecond * NANOS_PER_MICRO,
            fsp,
        }
    }

    /// Creates a duration from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: i64, fsp: i32) -> Self {
        Self { nanos, fsp }
    }

    /// `838:59:59` with the given fsp.
    #[must_use]
    pub const fn max_value(fsp: i32) -> Self {
        Self::new(838, 59, 59, 0, fsp)
    }

    /// Nanoseconds.
    #[must_use]
    pub const fn nanos(self) -> i64 {
        self.nanos
    }

    /// Fractional seconds precision.
    #[must_use]
    pub const fn fsp(self) -> i32 {
        self.fsp
    }

    /// Whole microseconds, truncated toward zero.
    #[must_use]
    pub const fn micros(self) -> i64 {
        self.nanos / NANOS_PER_MICRO
    }

    /// Returns the negated duration.
    #[must_use]
    pub const fn neg(self) -> Self {
        Self {
            nanos: -self.nanos,
            fsp: self.fsp,
        }
    }

    /// Adds two durations. The result takes the larger fsp.
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, v: Self) -> Result<Self> {
        if v == Self::ZERO {
            return Ok(self);
        }
        let nanos = self
            .nanos
            .checked_add(v.nanos)
            .ok_or_else(|| Error::out_of_range("BIGINT", format!("({} + {})", self.nanos, v.nanos)))?;
        Ok(Self::from_nanos(nanos, self.fsp.max(v.fsp)))
    }

    /// Subtracts `v`. The result takes the larger fsp.
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, v: Self) -> Result<Self> {
        if v == Self::ZERO {
            return Ok(self);
        }
        let nanos = self
            .nanos
            .checked_sub(v.nanos)
            .ok_or_else(|| Error::out_of_range("BIGINT", format!("({} - {})", self.nanos, v.nanos)))?;
        Ok(Self::from_nanos(nanos, self.fsp.max(v.fsp)))
    }

    /// Splits into `(negative, hours, minutes, seconds, microseconds)`.
    #[must_use]
    pub const fn split(self) -> (bool, u64, u64, u64, u64) {
        let negative = self.nanos < 0;
        let mut t = self.nanos.unsigned_abs();
        let nanos_per_second = NANOS_PER_SECOND as u64;
        let hours = t / (3600 * nanos_per_second);
        t -= hours * 3600 * nanos_per_second;
        let minutes = t / (60 * nanos_per_second);
        t -= minutes * 60 * nanos_per_second;
        let seconds = t / nanos_per_second;
        t -= seconds * nanos_per_second;
        (negative, hours, minutes, seconds, t / NANOS_PER_MICRO as u64)
    }

    /// Hours, unsigned and not wrapped at 24.
    #[must_use]
    pub const fn hour(self) -> u64 {
        self.split().1
    }

    /// Minutes.
    #[must_use]
    pub const fn minute(self) -> u64 {
        self.split().2
    }

    /// Seconds.
    #[must_use]
    pub const fn second(self) -> u64 {
        self.split().3
    }

    /// Microseconds.
    #[must_use]
    pub const fn microsecond(self) -> u64 {
        self.split().4
    }

    fn frac_text(self, micro: u64) -> String {
        let s = format!("{micro:06}");
        s[..self.fsp.clamp(0, MAX_FSP) as usize].to_string()
    }

    /// Returns `[-]HHMMSS[.fff]` as a decimal.
    #[must_use]
    pub fn to_number(self) -> BigDecimal {
        let (negative, h, m, s, micro) = self.split();
        let sign = if negative { "-" } else { "" };
        let text = if self.fsp <= 0 {
            format!("{sign}{h:02}{m:02}{s:02}")
        } else {
            format!("{sign}{h:02}{m:02}{s:02}.{}", self.frac_text(micro))
        };
        BigDecimal::from_str(&text).unwrap_or_default()
    }

    /// Rounds to `fsp` digits, halves away from zero.
    pub fn round_frac(self, fsp: i32) -> Result<Self> {
        let fsp = check_fsp(fsp)?;
        if fsp == self.fsp {
            return Ok(self);
        }
        let unit = 10i64.pow(9 - fsp as u32);
        let rem = self.nanos % unit;
        let mut nanos = self.nanos - rem;
        if rem.abs() * 2 >= unit {
            nanos += unit * self.nanos.signum();
        }
        Ok(Self::from_nanos(nanos, fsp))
    }

    /// Compares by length.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        self.nanos.cmp(&other.nanos)
    }

    /// Parses `s` as a TIME and compares with it.
    pub fn compare_str(self, ctx: &mut Context, s: &str) -> Result<Ordering> {
        let other = parse_duration(ctx, s, MAX_FSP).map_err(Error::from)?;
        Ok(self.compare(other))
    }

    /// Places the duration on `date`, carrying whole days.
    pub(crate) fn mix_with_date(self, date: CoreTime) -> CoreTime {
        CoreTime::from_total_micros(date.total_micros() + self.micros())
    }

    /// Converts to a DATE, DATETIME or TIMESTAMP on today's date in the
    /// context's time zone.
    pub fn to_time(self, ctx: &mut Context, tp: TimeType) -> LossyResult<Time> {
        let now = ctx.location().now();
        self.to_time_with_now(ctx, tp, now)
    }

    /// Like [`Duration::to_time`] with an explicit wall-clock "now".
    pub fn to_time_with_now(
        self,
        ctx: &mut Context,
        tp: TimeType,
        now: NaiveDateTime,
    ) -> LossyResult<Time> {
        let date = CoreTime::from_date(
            i64::from(now.year()),
            i64::from(now.month()),
            i64::from(now.day()),
            0,
            0,
            0,
            0,
        );
        Time::new(self.mix_with_date(date), TimeType::Datetime, self.fsp).convert(ctx, tp)
    }

    /// Converts to a YEAR value.
    pub fn to_year(self, ctx: &Context) -> LossyResult<i64> {
        let now = ctx.location().now();
        self.to_year_with_now(ctx, now)
    }

    /// Like [`Duration::to_year`] with an explicit wall-clock "now".
    ///
    /// With `cast_time_to_year_through_concat` the `HHMMSS` number is read
    /// as a year; otherwise the year of today plus the duration is used.
    pub fn to_year_with_now(self, ctx: &Context, now: NaiveDateTime) -> LossyResult<i64> {
        if ctx.flags().cast_time_to_year_through_concat {
            let rounded = self.round_frac(DEFAULT_FSP).unwrap_or(self);
            let v = rounded.to_number().with_scale(0).to_i64().unwrap_or_default();
            return adjust_year_checked(v, false);
        }
        let date = CoreTime::from_date(
            i64::from(now.year()),
            i64::from(now.month()),
            i64::from(now.day()),
            0,
            0,
            0,
            0,
        );
        adjust_year_checked(i64::from(self.mix_with_date(date).year()), false)
    }

    /// Formats with the time tokens of `DATE_FORMAT`.
    ///
    /// Unknown tokens are copied literally without the `%`.
    #[must_use]
    pub fn duration_format(self, layout: &str) -> String {
        let mut buf = String::with_capacity(layout.len() + 8);
        let mut in_pattern = false;
        for c in layout.chars() {
            if in_pattern {
                self.write_token(c, &mut buf);
                in_pattern = false;
            } else if c == '%' {
                in_pattern = true;
            } else {
                buf.push(c);
            }
        }
        buf
    }

    fn write_token(self, c: char, buf: &mut String) {
        let (_, hour, minute, second, micro) = self.split();
        let twelve = |h: u64| if h % 12 == 0 { 12 } else { h % 12 };
        match c {
            'H' => buf.push_str(&format_int_width_n(hour, 2)),
            'k' => buf.push_str(&hour.to_string()),
            'h' | 'I' => buf.push_str(&format_int_width_n(twelve(hour), 2)),
            'l' => buf.push_str(&twelve(hour).to_string()),
            'i' => buf.push_str(&format_int_width_n(minute, 2)),
            'p' => buf.push_str(if hour / 12 % 2 == 0 { "AM" } else { "PM" }),
            'r' => {
                let h = hour % 24;
                let suffix = if h < 12 { "AM" } else { "PM" };
                buf.push_str(&format!("{:02}:{minute:02}:{second:02} {suffix}", twelve(h)));
            }
            'T' => buf.push_str(&format!("{hour:02}:{minute:02}:{second:02}")),
            'S' | 's' => buf.push_str(&format_int_width_n(second, 2)),
            'f' => buf.push_str(&format!("{micro:06}")),
            other => buf.push(other),
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, h, m, s, micro) = self.split();
        if negative {
            f.write_str("-")?;
        }
        write!(f, "{h:02}:{m:02}:{s:02}")?;
        if self.fsp > 0 {
            write!(f, ".{}", self.frac_text(micro))?;
        }
        Ok(())
    }
}

// Small combinators over the remaining input. Each returns `None` when it
// does not match.

fn char_(s: &str, c: u8) -> Option<&str> {
    (s.as_bytes().first() == Some(&c)).then(|| &s[1..])
}

fn space(s: &str, min: usize) -> Option<&str> {
    let n = s.bytes().take_while(|&b| b == b' ').count();
    (n >= min).then(|| &s[n..])
}

fn space0(s: &str) -> &str {
    s.trim_start_matches(' ')
}

fn number(s: &str) -> Option<(i64, &str)> {
    let n = s.bytes().take_while(u8::is_ascii_digit).count();
    if n == 0 {
        return None;
    }
    let v = s[..n].parse().ok()?;
    Some((v, &s[n..]))
}

/// At least `n` digits; consumes the whole digit run.
pub(crate) fn digit(s: &str, n: usize) -> Option<(&str, &str)> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    (len >= n).then(|| s.split_at(len))
}

fn any_punct(s: &str) -> Option<&str> {
    let c = *s.as_bytes().first()?;
    super::is_punctuation(c).then(|| &s[1..])
}

fn match_colon(s: &str) -> Option<&str> {
    char_(space0(s), b':').map(space0)
}

fn match_hhmmss_delimited(s: &str, require_colon: bool) -> Option<([i64; 3], &str)> {
    let mut hms = [0; 3];
    let (hour, mut rest) = number(s)?;
    hms[0] = hour;
    for (i, slot) in hms.iter_mut().enumerate().skip(1) {
        let Some(remain) = match_colon(rest) else {
            if i == 1 && require_colon {
                return None;
            }
            break;
        };
        let (num, remain) = number(remain)?;
        *slot = num;
        rest = remain;
    }
    Some((hms, rest))
}

fn match_day_hhmmss(s: &str) -> Option<(i64, [i64; 3], &str)> {
    let (day, rest) = number(s)?;
    let rest = space(rest, 1)?;
    let (hms, rest) = match_hhmmss_delimited(rest, false)?;
    Some((day, hms, rest))
}

fn match_hhmmss_compact(s: &str) -> Option<([i64; 3], &str)> {
    let (num, rest) = number(s)?;
    Some(([num / 10000, (num / 100) % 100, num % 100], rest))
}

fn hhmmss_add_overflow(hms: &mut [i64; 3]) {
    const MODULUS: [i64; 3] = [-1, 60, 60];
    for i in (0..3).rev() {
        hms[i] = hms[i].saturating_add(1);
        if hms[i] == MODULUS[i] {
            hms[i] = 0;
        } else {
            break;
        }
    }
}

/// Returns `(overflow, microseconds, rest)`. Input without a `.` matches
/// with no fraction.
fn match_frac(s: &str, fsp: i32) -> Result<(bool, u32, &str)> {
    let Some(rest) = char_(s, b'.') else {
        return Ok((false, 0, s));
    };
    let (digits, rest) = digit(rest, 0).unwrap_or(("", rest));
    let (frac, overflow) = parse_frac(digits, fsp)?;
    Ok((overflow, frac, rest))
}

/// Result of [`parse_duration`]: `None` in the lossy value means SQL NULL.
pub type DurationResult = std::result::Result<Duration, Lossy<Option<Duration>>>;

fn null_error(s: &str) -> Lossy<Option<Duration>> {
    Lossy::new(None, Error::truncated_wrong_value(TIME_STR, s))
}

fn match_duration(s: &str, fsp: i32) -> DurationResult {
    let fsp = check_fsp(fsp).map_err(|e| Lossy::new(None, e))?;
    if s.is_empty() {
        return Err(null_error(s));
    }

    let (negative, rest) = char_(s, b'-').map_or((false, s), |rest| (true, rest));
    let rest = space0(rest);
    let chars_len = rest.len();

    let clamped = || {
        let nanos = if negative { MIN_TIME } else { MAX_TIME };
        Lossy::new(
            Some(Duration::from_nanos(nanos, fsp)),
            Error::truncated_wrong_value(TIME_STR, s),
        )
    };

    let (mut hms, rest) = if let Some((day, mut hms, remain)) = match_day_hhmmss(rest) {
        hms[0] = day
            .checked_mul(24)
            .and_then(|h| h.checked_add(hms[0]))
            .ok_or_else(clamped)?;
        (hms, remain)
    } else if let Some(found) = match_hhmmss_delimited(rest, true) {
        found
    } else if let Some(found) = match_hhmmss_compact(rest) {
        found
    } else {
        return Err(null_error(s));
    };

    let (overflow, mut frac, rest) = match match_frac(space0(rest), fsp) {
        Ok(found) => found,
        Err(_) => return Err(null_error(s)),
    };
    if !rest.is_empty() && chars_len >= 12 {
        return Err(null_error(s));
    }

    if overflow {
        hhmmss_add_overflow(&mut hms);
        frac = 0;
    }
    if hms[1] >= 60 || hms[2] >= 60 {
        return Err(null_error(s));
    }

    if hms[0] > TIME_MAX_HOUR {
        return Err(clamped());
    }

    let mut nanos = (hms[0] * 3600 + hms[1] * 60 + hms[2]) * NANOS_PER_SECOND
        + i64::from(frac) * NANOS_PER_MICRO;
    if negative {
        nanos = -nanos;
    }
    let (nanos, err) = truncate_overflow_time(nanos);
    let d = Duration::from_nanos(nanos, fsp);
    match err {
        Some(e) => Err(Lossy::new(Some(d), e)),
        None if !rest.is_empty() => Err(Lossy::new(
            Some(d),
            Error::truncated_wrong_value(TIME_STR, s),
        )),
        None => Ok(d),
    }
}

/// Clamps nanoseconds to the TIME range.
pub(crate) fn truncate_overflow_time(nanos: i64) -> (i64, Option<Error>) {
    let clamped = nanos.clamp(MIN_TIME, MAX_TIME);
    if clamped == nanos {
        (nanos, None)
    } else {
        let text = Duration::from_nanos(nanos, MAX_FSP).to_string();
        (clamped, Some(Error::truncated_wrong_value(TIME_STR, text)))
    }
}

/// Input that does not parse as a TIME but looks like a datetime: 12 or
/// 14 leading digits, or `D<p>D<p>D` followed by a space or `T`.
fn can_fallback_to_datetime(s: &str) -> bool {
    let Some((digits, rest)) = digit(s, 1) else {
        return false;
    };
    if digits.len() == 12 || digits.len() == 14 {
        return true;
    }
    let rest = any_punct(rest)
        .and_then(|r| digit(r, 1))
        .and_then(|(_, r)| any_punct(r))
        .and_then(|r| digit(r, 1));
    matches!(rest, Some((_, r)) if r.starts_with(' ') || r.starts_with('T'))
}

/// Parses a TIME literal.
///
/// On failure the error carries the best-effort value: `None` means the
/// result is SQL NULL, `Some` a clamped or truncated duration.
pub fn parse_duration(ctx: &mut Context, s: &str, fsp: i32) -> DurationResult {
    let rest = s.trim();
    let lossy = match match_duration(rest, fsp) {
        Ok(d) => return Ok(d),
        Err(lossy) => lossy,
    };
    if !can_fallback_to_datetime(rest) {
        return Err(Lossy::new(
            lossy.value,
            Error::truncated_wrong_value(TIME_STR, s),
        ));
    }

    debug!(input = s, "parsing time literal as datetime");
    let Ok(datetime) = parse_datetime(ctx, rest) else {
        return Err(null_error(s));
    };
    let d = datetime.to_duration();
    d.round_frac(fsp).map_err(|e| Lossy::new(Some(d), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextFlags;

    fn ctx() -> Context {
        Context::strict()
    }

    fn parse(s: &str, fsp: i32) -> Duration {
        parse_duration(&mut ctx(), s, fsp).unwrap()
    }

    #[test]
    fn test_parse_delimited() {
        assert_eq!(parse("10:11:12", 0), Duration::new(10, 11, 12, 0, 0));
        assert_eq!(parse("10:11", 0), Duration::new(10, 11, 0, 0, 0));
        assert_eq!(parse(" -1 : 2 : 3 ", 0), Duration::new(1, 2, 3, 0, 0).neg());
        assert_eq!(parse("12:34:56.789", 3), Duration::new(12, 34, 56, 789_000, 3));
    }

    #[test]
    fn test_parse_day_prefix() {
        assert_eq!(parse("1 10:11:12", 0), Duration::new(34, 11, 12, 0, 0));
        assert_eq!(parse("2 3", 0), Duration::new(51, 0, 0, 0, 0));
    }

    #[test]
    fn test_parse_compact() {
        assert_eq!(parse("101112", 0), Duration::new(10, 11, 12, 0, 0));
        assert_eq!(parse("1112", 0), Duration::new(0, 11, 12, 0, 0));
        assert_eq!(parse("12", 0), Duration::new(0, 0, 12, 0, 0));
        assert_eq!(parse("101112.5", 1), Duration::new(10, 11, 12, 500_000, 1));
    }

    #[test]
    fn test_fraction_rounding_carries() {
        assert_eq!(parse("10:10:10.999999", 0), Duration::new(10, 10, 11, 0, 0));
        assert_eq!(parse("10:59:59.5", 0), Duration::new(11, 0, 0, 0, 0));
        assert_eq!(parse("10:10:10.1234567", 6), Duration::new(10, 10, 10, 123_457, 6));
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(parse("-838:59:59", 0).nanos(), MIN_TIME);
        assert_eq!(parse("838:59:59", 0).nanos(), MAX_TIME);

        let err = parse_duration(&mut ctx(), "839:00:00", 0).unwrap_err();
        assert_eq!(err.value.map(Duration::nanos), Some(MAX_TIME));
        assert_eq!(err.error.code(), 1292);

        let err = parse_duration(&mut ctx(), "-900:00:00", 0).unwrap_err();
        assert_eq!(err.value.map(Duration::nanos), Some(MIN_TIME));
    }

    #[test]
    fn test_day_prefix_overflow_clamps() {
        let err = parse_duration(&mut ctx(), "999999999999999999 1:00:00", 0).unwrap_err();
        assert_eq!(err.value.map(Duration::nanos), Some(MAX_TIME));
        assert_eq!(err.error.code(), 1292);
    }

    #[test]
    fn test_invalid_is_null() {
        for s in ["", "abc", "10:60:00", "10:00:60"] {
            let err = parse_duration(&mut ctx(), s, 0).unwrap_err();
            assert!(err.value.is_none(), "{s}");
            assert!(matches!(err.error, Error::TruncatedWrongValue { .. }));
        }
    }

    #[test]
    fn test_trailing_garbage_keeps_value() {
        let err = parse_duration(&mut ctx(), "10:11:12abc", 0).unwrap_err();
        assert_eq!(err.value, Some(Duration::new(10, 11, 12, 0, 0)));
    }

    #[test]
    fn test_datetime_fallback() {
        assert_eq!(parse("2020-10-10 11:12:13", 0), Duration::new(11, 12, 13, 0, 0));
        assert_eq!(parse("20201010111213", 0), Duration::new(11, 12, 13, 0, 0));
        assert_eq!(
            parse("2020-10-10 11:12:13.5", 0),
            Duration::new(11, 12, 14, 0, 0)
        );
    }

    #[test]
    fn test_can_fallback_to_datetime() {
        assert!(can_fallback_to_datetime("201010111213"));
        assert!(can_fallback_to_datetime("2020-1-1 00:00:00"));
        assert!(can_fallback_to_datetime("2020-1-1T00:00:00"));
        assert!(!can_fallback_to_datetime("2020-1-1"));
        assert!(!can_fallback_to_datetime("839:00:00"));
    }

    #[test]
    fn test_display_and_number() {
        let d = Duration::new(1, 2, 3, 456_789, 3);
        assert_eq!(d.to_string(), "01:02:03.456");
        assert_eq!(d.neg().to_string(), "-01:02:03.456");
        assert_eq!(Duration::new(838, 59, 59, 0, 0).to_string(), "838:59:59");
        assert_eq!(d.to_number(), BigDecimal::from_str("10203.456").unwrap());
        assert_eq!(
            Duration::new(1, 2, 3, 0, 0).neg().to_number(),
            BigDecimal::from(-10203)
        );
    }

    #[test]
    fn test_add_sub() {
        let a = Duration::new(1, 0, 0, 0, 1);
        let b = Duration::new(0, 30, 0, 0, 3);
        assert_eq!(a.add(b).unwrap(), Duration::new(1, 30, 0, 0, 3));
        assert_eq!(a.sub(b).unwrap(), Duration::new(0, 30, 0, 0, 3));
        assert_eq!(a.add(Duration::ZERO).unwrap(), a);
        let huge = Duration::from_nanos(i64::MAX, 0);
        assert_eq!(huge.add(a).unwrap_err().code(), 1690);
        assert!(Duration::from_nanos(i64::MIN, 0).sub(a).is_err());
    }

    #[test]
    fn test_round_frac() {
        let d = Duration::new(0, 0, 1, 500_000, 6);
        assert_eq!(d.round_frac(0).unwrap(), Duration::new(0, 0, 2, 0, 0));
        assert_eq!(d.neg().round_frac(0).unwrap(), Duration::new(0, 0, 2, 0, 0).neg());
        let d = Duration::new(0, 0, 1, 449_999, 6);
        assert_eq!(d.round_frac(1).unwrap(), Duration::new(0, 0, 1, 400_000, 1));
        assert!(d.round_frac(9).is_err());
    }

    #[test]
    fn test_accessors_and_compare() {
        let d = Duration::new(100, 2, 3, 4, 6).neg();
        assert_eq!(d.hour(), 100);
        assert_eq!(d.minute(), 2);
        assert_eq!(d.second(), 3);
        assert_eq!(d.microsecond(), 4);
        assert_eq!(d.compare(Duration::ZERO), Ordering::Less);
        assert_eq!(
            Duration::new(1, 0, 0, 0, 0).compare_str(&mut ctx(), "00:59:59").unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_duration_format() {
        let d = Duration::new(13, 5, 9, 7, 6);
        assert_eq!(d.duration_format("%H:%i:%s.%f"), "13:05:09.000007");
        assert_eq!(d.duration_format("%h %l %p"), "01 1 PM");
        assert_eq!(d.duration_format("%r"), "01:05:09 PM");
        assert_eq!(d.duration_format("%T %k %q"), "13:05:09 13 q");
        assert_eq!(Duration::ZERO.duration_format("%r"), "12:00:00 AM");
    }

    #[test]
    fn test_to_time_with_now() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let mut ctx = ctx();
        let t = Duration::new(25, 1, 2, 0, 0)
            .to_time_with_now(&mut ctx, TimeType::Datetime, now)
            .unwrap();
        assert_eq!(t.to_string(), "2024-05-07 01:01:02");
        let t = Duration::new(1, 0, 0, 0, 0)
            .neg()
            .to_time_with_now(&mut ctx, TimeType::Datetime, now)
            .unwrap();
        assert_eq!(t.to_string(), "2024-05-05 23:00:00");
    }

    #[test]
    fn test_to_year() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let d = Duration::new(0, 0, 12, 0, 0);
        assert_eq!(d.to_year_with_now(&ctx(), now).unwrap(), 2024);

        let concat = Context::strict()
            .with_flags(ContextFlags::strict().with_cast_time_to_year_through_concat(true));
        assert_eq!(d.to_year_with_now(&concat, now).unwrap(), 2012);
        let d = Duration::new(0, 0, 70, 0, 0);
        assert!(d.to_year_with_now(&concat, now).is_err());
    }
}
