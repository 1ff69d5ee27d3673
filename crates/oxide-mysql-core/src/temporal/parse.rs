//! Literal parsers for DATE, DATETIME and TIMESTAMP values.
//!
//! A string literal is split into a timezone suffix, a fractional-seconds
//! suffix and the remaining numeric groups. The number of groups (and for a
//! single group, its length) decides how the digits map onto fields.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Duration as ChronoDuration;
use tracing::{debug, trace};

use super::core_time::{CoreTime, Time, TimeType};
use super::{check_fsp, is_punctuation, parse_frac, MAX_YEAR, MIN_YEAR};
use crate::context::Context;
use crate::error::{
    Error, Lossy, LossyResult, Result, DATETIME_STR, DATE_STR, TIMESTAMP_STR, TIME_STR,
};
use crate::mysql::{DEFAULT_FSP, MAX_FSP, MIN_FSP};

/// Maps a two-digit year onto 2000-2069 or 1970-1999; other values pass
/// through unchanged.
#[must_use]
#[allow(clippy::manual_range_contains)]
pub const fn adjust_year(y: i64) -> i64 {
    if y >= 0 && y <= 69 {
        2000 + y
    } else if y >= 70 && y <= 99 {
        1900 + y
    } else {
        y
    }
}

/// Adjusts a YEAR value and clamps it into `1901..=2155`.
///
/// Zero stays zero unless `adjust_zero` is set. Clamped values come back
/// with an out-of-range warning.
pub fn adjust_year_checked(y: i64, adjust_zero: bool) -> LossyResult<i64> {
    if y == 0 && !adjust_zero {
        return Ok(0);
    }
    let y = adjust_year(y);
    let out_of_range = || Error::WarnDataOutOfRange("year".to_string());
    if y < 0 {
        return Err(Lossy::new(0, out_of_range()));
    }
    if y < MIN_YEAR {
        return Err(Lossy::new(MIN_YEAR, out_of_range()));
    }
    if y > MAX_YEAR {
        return Err(Lossy::new(MAX_YEAR, out_of_range()));
    }
    Ok(y)
}

/// Parses a YEAR literal of one, two or four digits.
pub fn parse_year(s: &str) -> Result<i16> {
    let v: i16 = s.parse().map_err(|_| Error::InvalidYearFormat)?;
    let y = match s.len() {
        1 | 2 => adjust_year(i64::from(v)),
        4 => i64::from(v),
        _ => return Err(Error::InvalidYearFormat),
    };
    if !(MIN_YEAR..=MAX_YEAR).contains(&y) {
        return Err(Error::InvalidYearFormat);
    }
    Ok(y as i16)
}

const fn is_valid_separator(c: u8, prev_parts: usize) -> bool {
    if is_punctuation(c) {
        return true;
    }
    if prev_parts == 2 && matches!(c, b'T' | b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r') {
        return true;
    }
    prev_parts > 4 && !c.is_ascii_digit()
}

fn slice(s: &str, start: usize, end: usize) -> &str {
    s.get(start..end).unwrap_or_default()
}

/// Splits a date literal into its numeric groups.
///
/// Any punctuation separates groups. After the date part `T` and
/// whitespace do too, and after the fifth group anything but a digit.
/// Returns no groups if the literal does not start with a digit or holds
/// other characters between groups.
#[must_use]
pub fn parse_date_format(format: &str) -> Vec<&str> {
    let format = format.trim();
    let bytes = format.as_bytes();
    if bytes.first().map_or(true, |c| !c.is_ascii_digit()) {
        return Vec::new();
    }

    let mut seps = Vec::with_capacity(6);
    let mut start = 0;
    let mut i = 1;
    while i + 1 < bytes.len() {
        if is_valid_separator(bytes[i], seps.len()) {
            let prev_parts = seps.len();
            seps.push(slice(format, start, i));
            start = i + 1;
            let mut j = i + 1;
            while j < bytes.len() && is_valid_separator(bytes[j], prev_parts) {
                start += 1;
                i += 1;
                j += 1;
            }
        } else if !bytes[i].is_ascii_digit() {
            return Vec::new();
        }
        i += 1;
    }
    seps.push(slice(format, start, format.len()));
    seps
}

/// A trailing timezone suffix: `Z`, `±hh`, `±hhmm` or `±hh:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneSuffix<'a> {
    /// Byte offset where the suffix starts.
    pub idx: usize,
    /// `+`, `-`, or empty for `Z`.
    pub sign: &'a str,
    /// Two hour digits, or empty for `Z`.
    pub hour: &'a str,
    /// `:` if hours and minutes are separated.
    pub sep: &'a str,
    /// Two minute digits, or empty.
    pub minute: &'a str,
}

/// Two digits starting `offset` bytes before the end; empty for offset 0.
fn tz_digits(lit: &str, offset: usize) -> Option<&str> {
    if offset == 0 {
        return Some("");
    }
    let l = lit.len();
    let part = lit.get(l - offset..l - offset + 2)?;
    part.bytes().all(|c| c.is_ascii_digit()).then_some(part)
}

/// Finds a timezone suffix at the end of `lit`.
#[must_use]
pub fn get_timezone(lit: &str) -> Option<TimezoneSuffix<'_>> {
    let bytes = lit.as_bytes();
    let l = bytes.len();
    let (mut zidx, mut sidx, mut spidx) = (None, None, None);
    for i in (0..l).rev() {
        match bytes[i] {
            b'Z' => {
                zidx = Some(i);
                break;
            }
            b'-' | b'+' if sidx.is_none() => sidx = Some(i),
            b':' if spidx.is_none() => spidx = Some(i),
            _ => {}
        }
    }

    let colon = spidx.is_some_and(|p| l - p == 3);
    let mut k = 0;
    if zidx.is_some_and(|z| l - z == 1) {
        k += 100;
    }
    if let Some(s) = sidx {
        let t = l - s;
        if matches!(t, 3 | 5 | 6) {
            k += t * 10;
        }
    }
    if colon {
        k += 3;
    }

    // Offsets from the end of the hour and minute digits.
    let (h, m) = match k {
        100 => (0, 0),
        30 => (2, 0),
        50 => (4, 2),
        63 => (5, 2),
        _ => return None,
    };

    if k == 100 {
        return Some(TimezoneSuffix {
            idx: zidx?,
            sign: "",
            hour: "",
            sep: "",
            minute: "",
        });
    }
    let idx = sidx?;
    Some(TimezoneSuffix {
        idx,
        sign: lit.get(idx..=idx)?,
        hour: tz_digits(lit, h)?,
        sep: if colon { ":" } else { "" },
        minute: tz_digits(lit, m)?,
    })
}

/// Byte offset of the `.` that starts a fractional-seconds suffix.
///
/// Only the last punctuation mark before any timezone suffix counts, and
/// signs are skipped over.
#[must_use]
pub fn get_frac_index(s: &str) -> Option<usize> {
    let end = match get_timezone(s) {
        Some(tz) => tz.idx,
        None => s.len(),
    };
    let bytes = s.as_bytes();
    (0..end)
        .rev()
        .find(|&i| bytes[i] != b'+' && bytes[i] != b'-' && is_punctuation(bytes[i]))
        .filter(|&i| bytes[i] == b'.')
}

/// The number of fractional digits in a literal, at most 6.
#[must_use]
pub fn get_fsp(s: &str) -> i32 {
    get_frac_index(s).map_or(0, |idx| (s.len() - idx - 1).min(MAX_FSP as usize) as i32)
}

/// Returns true if `s` looks like a date: three groups, or one group of
/// 5, 6 or 8 characters.
#[must_use]
pub fn is_date_format(s: &str) -> bool {
    let s = s.trim();
    match parse_date_format(s).len() {
        1 => matches!(s.len(), 5 | 6 | 8),
        3 => true,
        _ => false,
    }
}

struct DateTimeParts<'a> {
    seps: Vec<&'a str>,
    frac: &'a str,
    tz: Option<TimezoneSuffix<'a>>,
    truncated: bool,
}

fn split_date_time(s: &str) -> DateTimeParts<'_> {
    let mut rest = s;
    let bytes = s.as_bytes();
    let tz = get_timezone(s).filter(|tz| tz.idx > 0);
    if let Some(suffix) = tz {
        let mut idx = suffix.idx;
        while idx > 0 && is_punctuation(bytes[idx - 1]) {
            idx -= 1;
        }
        rest = &s[..idx];
    }

    let mut frac = "";
    let mut truncated = false;
    if let Some(frac_idx) = get_frac_index(rest).filter(|&i| i > 0) {
        let digits = rest.as_bytes()[frac_idx + 1..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count();
        let frac_end = frac_idx + 1 + digits;
        truncated = frac_end != rest.len();
        frac = &rest[frac_idx + 1..frac_end];
        let mut idx = frac_idx;
        while idx > 0 && is_punctuation(bytes[idx - 1]) {
            idx -= 1;
        }
        rest = &rest[..idx];
    }

    DateTimeParts {
        seps: parse_date_format(rest),
        frac,
        tz,
        truncated,
    }
}

/// Reads fixed-width decimal fields, each of at most `width` digits.
/// Returns the fields read before the first failure and whether all of
/// them were read.
fn scan_widths(s: &str, widths: &[usize]) -> (Vec<i64>, bool) {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut fields = Vec::with_capacity(widths.len());
    for &width in widths {
        let n = bytes[pos..]
            .iter()
            .take(width)
            .take_while(|c| c.is_ascii_digit())
            .count();
        let Some(v) = s.get(pos..pos + n).and_then(|d| d.parse().ok()) else {
            return (fields, false);
        };
        fields.push(v);
        pos += n;
    }
    (fields, true)
}

/// Groups that are already a full date and time keep their fraction and
/// timezone; anything shorter may absorb them as more fields.
fn no_absorb(seps: &[&str]) -> bool {
    seps.len() > 5 || (seps.len() == 1 && seps[0].len() > 4)
}

const YEAR: usize = 0;
const MONTH: usize = 1;
const DAY: usize = 2;
const HOUR: usize = 3;
const MINUTE: usize = 4;
const SECOND: usize = 5;

#[allow(clippy::too_many_lines)]
fn parse_datetime_impl(ctx: &mut Context, s: &str, fsp: i32, is_float: bool) -> Result<Time> {
    let DateTimeParts {
        mut seps,
        mut frac,
        mut tz,
        truncated,
    } = split_date_time(s);
    if truncated {
        ctx.append_warning(Error::truncated_wrong_value(DATETIME_STR, s));
    }

    if !frac.is_empty() && !is_float && !no_absorb(&seps) {
        seps.push(frac);
        frac = "";
    }
    if let Some(suffix) = tz.filter(|t| !t.sign.is_empty()) {
        if !no_absorb(&seps) && !(!suffix.minute.is_empty() && suffix.sep.is_empty()) {
            trace!(input = s, "absorbing timezone suffix into date fields");
            if !suffix.hour.is_empty() {
                seps.push(suffix.hour);
            }
            if !suffix.minute.is_empty() {
                seps.push(suffix.minute);
            }
            tz = None;
        }
    }

    let wrong_datetime = || Error::wrong_value(DATETIME_STR, s);
    let mut fields = [0i64; 6];
    let mut hhmmss = false;

    match seps.len() {
        0 | 2 => return Err(wrong_datetime()),
        1 if is_float => {
            let num: i64 = seps[0].parse().map_err(|_| wrong_datetime())?;
            let t = parse_datetime_from_num(ctx, num).map_err(|_| wrong_datetime())?;
            fields = [
                i64::from(t.year()),
                i64::from(t.month()),
                i64::from(t.day()),
                i64::from(t.hour()),
                i64::from(t.minute()),
                i64::from(t.second()),
            ];
            let l = seps[0].len();
            hhmmss = seps[0] == "0" || (9..=14).contains(&l);
        }
        1 => {
            let l = seps[0].len();
            let layout: &[usize] = match l {
                14 => &[4, 2, 2, 2, 2, 2],
                12 => &[2, 2, 2, 2, 2, 2],
                11 => &[2, 2, 2, 2, 2, 1],
                10 => &[2, 2, 2, 2, 2],
                9 => &[2, 2, 2, 2, 1],
                8 => &[4, 2, 2],
                7 => &[2, 2, 2, 1],
                5 | 6 => &[2, 2, 2],
                _ => return Err(Error::wrong_value(TIME_STR, s)),
            };
            let (scanned, ok) = scan_widths(seps[0], layout);
            fields[..scanned.len()].copy_from_slice(&scanned);
            if l != 14 && l != 8 {
                fields[YEAR] = adjust_year(fields[YEAR]);
            }
            hhmmss = matches!(l, 14 | 12 | 11);

            let mut failed = !ok;
            let mut truncated = truncated;
            if matches!(l, 5 | 6 | 8) {
                // `20170118.123423` reads the fraction as hhmmss.
                let widths: &[usize] = match frac.len() {
                    0 => &[],
                    1 | 2 => &[2],
                    3 | 4 => &[2, 2],
                    _ => &[2, 2, 2],
                };
                if !widths.is_empty() {
                    let (time, ok) = scan_widths(frac, widths);
                    fields[HOUR..HOUR + time.len()].copy_from_slice(&time);
                    failed = !ok;
                }
                truncated = failed;
            }
            if matches!(l, 9 | 10) {
                if frac.is_empty() {
                    fields[SECOND] = 0;
                } else {
                    let (second, ok) = scan_widths(frac, &[2]);
                    if let Some(&v) = second.first() {
                        fields[SECOND] = v;
                    }
                    failed = !ok;
                }
                truncated = failed;
            }
            if truncated {
                ctx.append_warning(Error::truncated_wrong_value(DATETIME_STR, s));
                failed = false;
            }
            if failed {
                return Err(wrong_datetime());
            }
        }
        n => {
            if n > 6 {
                ctx.append_warning(Error::truncated_wrong_value(DATETIME_STR, s));
                seps.truncate(6);
            }
            for (field, sep) in fields.iter_mut().zip(&seps) {
                *field = sep.parse().map_err(|_| wrong_datetime())?;
            }
            hhmmss = seps.len() == 6;
        }
    }

    if seps[0].len() <= 2 && !is_float && !(fields.iter().all(|&f| f == 0) && frac.is_empty()) {
        fields[YEAR] = adjust_year(fields[YEAR]);
    }

    let (micro, overflow) = if hhmmss {
        parse_frac(frac, fsp)?
    } else {
        (0, false)
    };

    let mut core = CoreTime::from_date_checked(
        fields[YEAR],
        fields[MONTH],
        fields[DAY],
        fields[HOUR],
        fields[MINUTE],
        fields[SECOND],
        i64::from(micro),
    )
    .ok_or_else(wrong_datetime)?;
    if overflow {
        core = CoreTime::from_naive(core.to_naive()? + ChronoDuration::seconds(1));
    }

    if let Some(suffix) = tz {
        if !hhmmss {
            return Err(wrong_datetime());
        }
        let two_digits = |d: &str| -> i64 {
            d.bytes()
                .take(2)
                .fold(0, |acc, c| acc * 10 + i64::from(c - b'0'))
        };
        let delta_hour = two_digits(suffix.hour);
        let delta_minute = two_digits(suffix.minute);
        if delta_hour > 14
            || delta_minute > 59
            || (delta_hour == 14 && delta_minute != 0)
            || (suffix.sign == "-" && delta_hour == 0 && delta_minute == 0)
        {
            return Err(wrong_datetime());
        }
        let mut offset = delta_hour * 3600 + delta_minute * 60;
        if suffix.sign == "-" {
            offset = -offset;
        }
        let utc = core.to_naive()? - ChronoDuration::seconds(offset);
        core = CoreTime::from_naive(ctx.location().from_utc(utc));
        debug!(input = s, offset, "applied literal timezone offset");
    }

    Ok(Time::new(core, TimeType::Datetime, fsp))
}

fn parse_time_impl(
    ctx: &mut Context,
    s: &str,
    tp: TimeType,
    fsp: i32,
    is_float: bool,
) -> LossyResult<Time> {
    let zero = Time::zero(tp);
    let fsp = check_fsp(fsp).map_err(|e| Lossy::new(zero, e))?;
    let mut t = parse_datetime_impl(ctx, s, fsp, is_float).map_err(|e| Lossy::new(zero, e))?;
    t.set_type(tp);
    if tp == TimeType::Date {
        let mut core = t.core_time();
        core.set_time_from_sec(0, 0);
        t.set_core_time(core);
    }
    let Err(err) = t.check(ctx) else {
        return Ok(t);
    };
    if tp == TimeType::Timestamp
        && !t.is_zero()
        && matches!(err, Error::TimestampInDstTransition { .. })
    {
        if let Ok(adjusted) = t.adjust_dst_gap(ctx.location()) {
            return Err(Lossy::new(adjusted, err));
        }
    }
    Err(Lossy::new(zero, err))
}

/// Parses a temporal string literal as `tp` with `fsp` fractional digits.
///
/// On failure the error carries the zero value of `tp`, except for a
/// TIMESTAMP inside a DST gap, which carries the value moved past the gap.
pub fn parse_time(ctx: &mut Context, s: &str, tp: TimeType, fsp: i32) -> LossyResult<Time> {
    parse_time_impl(ctx, s, tp, fsp, false)
}

/// Parses a numeric literal that was written as a float, e.g.
/// `20170118.999`. The fraction is never read as a time-of-day.
pub fn parse_time_from_float_string(
    ctx: &mut Context,
    s: &str,
    tp: TimeType,
    fsp: i32,
) -> LossyResult<Time> {
    if s.starts_with("0.0") {
        return Ok(Time::zero(tp));
    }
    parse_time_impl(ctx, s, tp, fsp, true)
}

/// Parses a DATETIME, taking the fsp from the literal.
pub fn parse_datetime(ctx: &mut Context, s: &str) -> LossyResult<Time> {
    parse_time(ctx, s, TimeType::Datetime, get_fsp(s))
}

/// Parses a TIMESTAMP, taking the fsp from the literal.
pub fn parse_timestamp(ctx: &mut Context, s: &str) -> LossyResult<Time> {
    parse_time(ctx, s, TimeType::Timestamp, get_fsp(s))
}

/// Parses a DATE.
pub fn parse_date(ctx: &mut Context, s: &str) -> LossyResult<Time> {
    parse_time(ctx, s, TimeType::Date, MIN_FSP)
}

fn get_time(ctx: &Context, num: i64, origin: i64, tp: TimeType) -> Result<Time> {
    let ymd = num / 1_000_000;
    let hms = num - ymd * 1_000_000;
    let core = CoreTime::from_date_checked(
        ymd / 10000,
        (ymd / 100) % 100,
        ymd % 100,
        hms / 10000,
        (hms / 100) % 100,
        hms % 100,
        0,
    )
    .ok_or_else(|| Error::wrong_value(TIME_STR, origin.to_string()))?;
    let t = Time::new(core, tp, DEFAULT_FSP);
    t.check(ctx)?;
    Ok(t)
}

/// Interprets an integer as `YYMMDD`, `YYYYMMDD`, `YYMMDDhhmmss` or
/// `YYYYMMDDhhmmss`. Eight digits or fewer give a DATE.
pub(crate) fn parse_datetime_from_num(ctx: &Context, num: i64) -> Result<Time> {
    let invalid = || Error::wrong_value(TIME_STR, num.to_string());
    if num == 0 {
        return Ok(Time::zero(TimeType::Date));
    }
    if num >= 10_000_101_000_000 {
        return get_time(ctx, num, num, TimeType::Datetime);
    }
    if num < 101 {
        return Err(invalid());
    }
    // YYMMDD
    if num <= 691_231 {
        return get_time(ctx, (num + 20_000_000) * 1_000_000, num, TimeType::Date);
    }
    if num < 700_101 {
        return Err(invalid());
    }
    if num <= 991_231 {
        return get_time(ctx, (num + 19_000_000) * 1_000_000, num, TimeType::Date);
    }
    // YYYYMMDD
    if num <= 99_991_231 {
        return get_time(ctx, num * 1_000_000, num, TimeType::Date);
    }
    if num < 101_000_000 {
        return Err(invalid());
    }
    // YYMMDDhhmmss
    if num <= 691_231_235_959 {
        return get_time(ctx, num + 20_000_000_000_000, num, TimeType::Datetime);
    }
    if num < 700_101_000_000 {
        return Err(invalid());
    }
    if num <= 991_231_235_959 {
        return get_time(ctx, num + 19_000_000_000_000, num, TimeType::Datetime);
    }
    get_time(ctx, num, num, TimeType::Datetime)
}

/// Parses an integer literal as `tp`.
///
/// Zero gives the zero value, which is a truncation error unless the
/// context accepts zero dates.
pub fn parse_time_from_num(ctx: &Context, num: i64, tp: TimeType, fsp: i32) -> LossyResult<Time> {
    let zero = Time::zero(tp);
    if num == 0 {
        if ctx.flags().ignore_zero_date_err {
            return Ok(zero);
        }
        let name = match tp {
            TimeType::Timestamp => TIMESTAMP_STR,
            TimeType::Date => DATE_STR,
            TimeType::Datetime => DATETIME_STR,
        };
        return Err(Lossy::new(zero, Error::truncated_wrong_value(name, "0")));
    }
    let fsp = check_fsp(fsp).map_err(|e| Lossy::new(zero, e))?;
    let mut t = parse_datetime_from_num(ctx, num).map_err(|e| Lossy::new(zero, e))?;
    t.set_type(tp);
    t.set_fsp(fsp);
    t.check(ctx).map_err(|e| Lossy::new(zero, e))?;
    Ok(t)
}

/// Parses an integer literal as a DATETIME.
pub fn parse_time_from_int64(ctx: &Context, num: i64) -> LossyResult<Time> {
    parse_time_from_num(ctx, num, TimeType::Datetime, DEFAULT_FSP)
}

/// Parses a float literal. The fraction becomes microseconds only when the
/// integer part is a full datetime.
pub fn parse_time_from_float64(ctx: &Context, f: f64) -> LossyResult<Time> {
    let int_part = f as i64;
    let mut t =
        parse_datetime_from_num(ctx, int_part).map_err(|e| Lossy::new(Time::ZERO, e))?;
    if t.tp() == TimeType::Datetime {
        let frac = f - int_part as f64;
        let mut core = t.core_time();
        core.set_microsecond((frac * 1_000_000.0).round() as u32);
        t.set_core_time(core);
    }
    Ok(t)
}

/// Parses a decimal literal. Its scale, capped at 6, becomes the fsp.
pub fn parse_time_from_decimal(ctx: &Context, dec: &BigDecimal) -> LossyResult<Time> {
    let incorrect = || Lossy::new(Time::ZERO, Error::IncorrectDatetimeValue(dec.to_string()));
    let int_part = dec.with_scale(0);
    let num = int_part.to_i64().ok_or_else(incorrect)?;
    let (_, scale) = dec.as_bigint_and_exponent();
    let fsp = scale.clamp(0, i64::from(MAX_FSP)) as i32;

    let mut t = parse_datetime_from_num(ctx, num).map_err(|_| incorrect())?;
    t.set_fsp(fsp);
    if fsp == 0 || t.tp() == TimeType::Date {
        return Ok(t);
    }
    let micro = ((dec - &int_part) * BigDecimal::from(1_000_000))
        .with_scale(0)
        .to_u32()
        .ok_or_else(incorrect)?;
    let mut core = t.core_time();
    core.set_microsecond(micro);
    t.set_core_time(core);
    Ok(t)
}

/// `YEAR` to DATETIME: the year with a zero month and day. Zero gives the
/// zero DATE.
#[must_use]
pub fn parse_time_from_year(year: i64) -> Time {
    if year == 0 {
        return Time::zero(TimeType::Date);
    }
    Time::new(
        CoreTime::from_date(year, 0, 0, 0, 0, 0, 0),
        TimeType::Datetime,
        DEFAULT_FSP,
    )
}
