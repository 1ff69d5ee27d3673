//! Conversions between numeric, string, temporal and JSON values.
//!
//! Every conversion is total: on failure the error carries the clamped or
//! best-effort value in a [`Lossy`], so callers that can live with a
//! truncated result keep it. Truncations go through
//! [`Context::handle_truncate`] where MySQL lets the session decide whether
//! they are errors, warnings or ignored.

use std::fmt::Display;
use std::num::IntErrorKind;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::context::{Context, ContextFlags};
use crate::error::{split_lossy, Error, Lossy, LossyResult, Result, TIME_STR};
use crate::mysql::MysqlType;
use crate::temporal::{
    parse_datetime_from_num, parse_duration, parse_time, Duration, Time, TimeType,
    TIME_MAX_HOUR, TIME_MAX_VALUE,
};
use crate::types::Value;

const MAX_UINT_STR: &str = "18446744073709551615";
const MIN_INT_STR: &str = "-9223372036854775808";
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
/// Largest exponent [`convert_scientific_notation`] expands.
const MAX_DECIMAL_SHIFT: u64 = 1024;

fn overflow(value: impl Display, tp: MysqlType) -> Error {
    Error::Overflow {
        value: value.to_string(),
        type_name: tp.type_str().to_string(),
    }
}

fn carry<T>(value: T, err: Option<Error>) -> LossyResult<T> {
    match err {
        Some(e) => Err(Lossy::new(value, e)),
        None => Ok(value),
    }
}

fn truncate<T>(ctx: &mut Context, value: T, err: Error) -> LossyResult<T> {
    match ctx.handle_truncate(err) {
        Ok(()) => Ok(value),
        Err(e) => Err(Lossy::new(value, e)),
    }
}

#[allow(clippy::cast_possible_wrap)]
fn as_signed(res: LossyResult<u64>) -> LossyResult<i64> {
    res.map(|u| u as i64).map_err(|l| l.map(|u| u as i64))
}

/// Rounds `f` to the nearest integer and clamps it into `[lower, upper]`.
#[allow(
    clippy::float_cmp,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
pub fn convert_float_to_int(f: f64, lower: i64, upper: i64, tp: MysqlType) -> LossyResult<i64> {
    let val = f.round();
    if val < lower as f64 {
        return Err(Lossy::new(lower, overflow(val, tp)));
    }
    if val >= upper as f64 {
        if val == upper as f64 {
            return Ok(upper);
        }
        return Err(Lossy::new(upper, overflow(val, tp)));
    }
    Ok(val as i64)
}

/// Clamps `val` into `[lower, upper]`.
pub fn convert_int_to_int(val: i64, lower: i64, upper: i64, tp: MysqlType) -> LossyResult<i64> {
    if val < lower {
        return Err(Lossy::new(lower, overflow(val, tp)));
    }
    if val > upper {
        return Err(Lossy::new(upper, overflow(val, tp)));
    }
    Ok(val)
}

/// Clamps an unsigned value to a signed upper bound.
pub fn convert_uint_to_int(val: u64, upper: i64, tp: MysqlType) -> LossyResult<i64> {
    match i64::try_from(val) {
        Ok(v) if v <= upper => Ok(v),
        _ => Err(Lossy::new(upper, overflow(val, tp))),
    }
}

/// Converts a signed value to unsigned. Negative values become 0 unless
/// the flags let them wrap.
#[allow(clippy::cast_sign_loss)]
pub fn convert_int_to_uint(
    flags: ContextFlags,
    val: i64,
    upper: u64,
    tp: MysqlType,
) -> LossyResult<u64> {
    if val < 0 && !flags.allow_negative_to_unsigned {
        return Err(Lossy::new(0, overflow(val, tp)));
    }
    let u = val as u64;
    if u > upper {
        return Err(Lossy::new(upper, overflow(val, tp)));
    }
    Ok(u)
}

/// Clamps `val` to `upper`.
pub fn convert_uint_to_uint(val: u64, upper: u64, tp: MysqlType) -> LossyResult<u64> {
    if val > upper {
        return Err(Lossy::new(upper, overflow(val, tp)));
    }
    Ok(val)
}

/// Rounds `f` and converts it to unsigned. A negative value is always an
/// overflow; it becomes 0, or its two's complement when the flags let
/// negative values wrap.
#[allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
pub fn convert_float_to_uint(
    flags: ContextFlags,
    f: f64,
    upper: u64,
    tp: MysqlType,
) -> LossyResult<u64> {
    let val = f.round();
    if val < 0.0 {
        let wrapped = if flags.allow_negative_to_unsigned {
            val as i64 as u64
        } else {
            0
        };
        return Err(Lossy::new(wrapped, overflow(val, tp)));
    }
    if val >= TWO_POW_64 || val as u64 > upper {
        return Err(Lossy::new(upper, overflow(val, tp)));
    }
    Ok(val as u64)
}

/// Expands scientific notation without going through a float:
/// `1E6` gives `1000000` and `.12345E+5` gives `12345`.
pub fn convert_scientific_notation(s: &str) -> Result<String> {
    let Some(e_idx) = s.find(['e', 'E']) else {
        return Ok(s.to_string());
    };
    let bad = || Error::BadNumber(s.to_string());
    let exp: i64 = s[e_idx + 1..].parse().map_err(|_| bad())?;
    if exp.unsigned_abs() > MAX_DECIMAL_SHIFT {
        return Err(bad());
    }
    let mantissa = &s[..e_idx];
    if exp == 0 {
        return Ok(mantissa.to_string());
    }

    let (sign, unsigned) = match mantissa.as_bytes().first() {
        Some(b'-') => ("-", &mantissa[1..]),
        Some(b'+') => ("", &mantissa[1..]),
        _ => ("", mantissa),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits = format!("{int_part}{frac_part}");
    let len = i64::try_from(digits.len()).map_err(|_| bad())?;
    let point = i64::try_from(int_part.len()).map_err(|_| bad())? + exp;

    let body = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(usize::try_from(-point).unwrap_or(0)))
    } else if point >= len {
        format!("{digits}{}", "0".repeat(usize::try_from(point - len).unwrap_or(0)))
    } else {
        let (head, tail) = digits.split_at(usize::try_from(point).unwrap_or(0));
        format!("{head}.{tail}")
    };
    Ok(format!("{sign}{body}"))
}

/// Converts a decimal string to unsigned by digit comparison, rounding half
/// up on the first fractional digit.
pub fn convert_decimal_str_to_uint(s: &str, upper: u64, tp: MysqlType) -> LossyResult<u64> {
    let s = convert_scientific_notation(s).map_err(|e| Lossy::new(0, e))?;
    let (int_part, frac_part) = s.split_once('.').unwrap_or((&s, ""));
    let int_str = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    if int_str.starts_with('-') {
        return Err(Lossy::new(0, overflow(&s, tp)));
    }

    let round = u64::from(frac_part.as_bytes().first().is_some_and(|&b| b >= b'5'));
    let upper_str = upper.saturating_sub(round).to_string();
    if int_str.len() > upper_str.len()
        || (int_str.len() == upper_str.len() && int_str > upper_str.as_str())
    {
        return Err(Lossy::new(upper, overflow(&s, tp)));
    }
    match int_str.parse::<u64>() {
        Ok(v) => Ok(v + round),
        Err(_) => Err(Lossy::new(0, overflow(&s, tp))),
    }
}

/// Converts a decimal to unsigned through its plain string form, so values
/// near `u64::MAX` keep every digit.
pub fn convert_decimal_to_uint(d: &BigDecimal, upper: u64, tp: MysqlType) -> LossyResult<u64> {
    convert_decimal_str_to_uint(&d.to_plain_string(), upper, tp)
}

/// Scans the longest prefix of `s` that parses as a float.
///
/// Returns the prefix length and the scanned length, which stops early at
/// a NUL byte.
fn scan_float_prefix(s: &str) -> (usize, usize) {
    let mut saw_dot = false;
    let mut saw_digit = false;
    let mut valid_len = 0;
    let mut e_idx: Option<usize> = None;
    for (i, &c) in s.as_bytes().iter().enumerate() {
        match c {
            b'+' | b'-' => {
                // A sign is allowed first or right after the exponent marker.
                if i != 0 && e_idx.map(|e| e + 1) != Some(i) {
                    break;
                }
            }
            b'.' => {
                if saw_dot || e_idx.is_some() {
                    break;
                }
                saw_dot = true;
                if saw_digit {
                    valid_len = i + 1;
                }
            }
            b'e' | b'E' => {
                if !saw_digit || e_idx.is_some() {
                    break;
                }
                e_idx = Some(i);
            }
            b'0'..=b'9' => {
                saw_digit = true;
                valid_len = i + 1;
            }
            0 => return (valid_len, valid_len),
            _ => break,
        }
    }
    (valid_len, s.len())
}

fn get_valid_float_prefix(ctx: &mut Context, s: &str, is_func_cast: bool) -> LossyResult<String> {
    if is_func_cast && s.is_empty() {
        return Ok("0".to_string());
    }
    let (valid_len, end) = scan_float_prefix(s);
    let s = &s[..end];
    let valid = if valid_len == 0 { "0" } else { &s[..valid_len] };
    if valid_len == 0 || valid_len != s.len() {
        return truncate(
            ctx,
            valid.to_string(),
            Error::truncated_wrong_value("DOUBLE", s),
        );
    }
    Ok(valid.to_string())
}

fn get_valid_int_prefix(ctx: &mut Context, s: &str, is_func_cast: bool) -> LossyResult<String> {
    if !is_func_cast {
        let (float_prefix, err) = split_lossy(get_valid_float_prefix(ctx, s, false));
        return match (float_str_to_int_str(&float_prefix, s), err) {
            (Ok(v), err) => carry(v, err),
            (Err(lossy), Some(e)) => Err(Lossy::new(lossy.value, e)),
            (Err(lossy), None) => Err(lossy),
        };
    }

    let mut valid_len = 0;
    for (i, &c) in s.as_bytes().iter().enumerate() {
        if i == 0 && (c == b'+' || c == b'-') {
            continue;
        }
        if !c.is_ascii_digit() {
            break;
        }
        valid_len = i + 1;
    }
    let valid = if valid_len == 0 { "0" } else { &s[..valid_len] };
    if valid_len == 0 || valid_len != s.len() {
        return truncate(
            ctx,
            valid.to_string(),
            Error::truncated_wrong_value("INTEGER", s),
        );
    }
    Ok(valid.to_string())
}

/// Rounds the integer string `int_str` up by one when the digit that
/// followed its decimal point, `next`, is 5 or more.
#[must_use]
pub fn round_int_str(next: u8, int_str: &str) -> String {
    if next < b'5' {
        return int_str.to_string();
    }
    let mut digits = int_str.as_bytes().to_vec();
    let Some(mut idx) = digits.len().checked_sub(1) else {
        return "1".to_string();
    };
    while idx >= 1 {
        if digits[idx] != b'9' {
            digits[idx] += 1;
            break;
        }
        digits[idx] = b'0';
        idx -= 1;
    }
    if idx == 0 {
        match digits[0] {
            b'9' => {
                digits[0] = b'1';
                digits.push(b'0');
            }
            b'0'..=b'8' => digits[0] += 1,
            // Sign followed by a carried-out run of nines.
            _ => {
                if digits.len() > 1 {
                    digits[1] = b'1';
                }
                digits.push(b'0');
            }
        }
    }
    digits.into_iter().map(char::from).collect()
}

/// Converts a valid float string into an integer string without going
/// through a float, rounding half away from zero.
///
/// Exponents that push the integer part beyond 20 digits are a serious
/// overflow: the result saturates to the i64 minimum or u64 maximum and
/// the error names `ori`. Smaller overflows are left to the integer parser.
pub fn float_str_to_int_str(valid_float: &str, ori: &str) -> LossyResult<String> {
    let mut dot_idx = None;
    let mut e_idx = None;
    for (i, c) in valid_float.bytes().enumerate() {
        match c {
            b'.' => dot_idx = Some(i),
            b'e' | b'E' => e_idx = Some(i),
            _ => {}
        }
    }
    let negative = valid_float.starts_with('-');

    let Some(e_idx) = e_idx else {
        let Some(mut dot) = dot_idx else {
            return Ok(valid_float.to_string());
        };
        let digits = if negative || valid_float.starts_with('+') {
            dot -= 1;
            &valid_float[1..]
        } else {
            valid_float
        };
        let mut int_str = if dot == 0 {
            "0".to_string()
        } else {
            digits[..dot].to_string()
        };
        if let Some(&next) = digits.as_bytes().get(dot + 1) {
            int_str = round_int_str(next, &int_str);
        }
        if int_str != "0" && negative {
            int_str.insert(0, '-');
        }
        return Ok(int_str);
    };

    // `digits` and `int_cnt` include a leading sign when there is one.
    let (digits, int_cnt) = match dot_idx {
        Some(dot) => (
            format!("{}{}", &valid_float[..dot], &valid_float[dot + 1..e_idx]),
            dot,
        ),
        None => (valid_float[..e_idx].to_string(), e_idx),
    };
    let serious = || {
        let saturated = if negative { MIN_INT_STR } else { MAX_UINT_STR };
        Err(Lossy::new(
            saturated.to_string(),
            Error::out_of_range("BIGINT", ori),
        ))
    };
    let Ok(exp) = valid_float[e_idx + 1..].parse::<i64>() else {
        return serious();
    };
    let Some(int_cnt) = i64::try_from(int_cnt).ok().and_then(|c| c.checked_add(exp)) else {
        return serious();
    };
    if exp >= 0 && !(0..=21).contains(&int_cnt) {
        return serious();
    }

    let bytes = digits.as_bytes();
    if int_cnt <= 0 {
        let mut int_str = "0".to_string();
        if int_cnt == 0 && bytes.first().is_some_and(u8::is_ascii_digit) {
            int_str = round_int_str(bytes[0], &int_str);
        }
        return Ok(int_str);
    }
    let signed = matches!(bytes.first(), Some(b'-' | b'+'));
    if int_cnt == 1 && signed {
        let mut int_str = "0".to_string();
        if let Some(&next) = bytes.get(1) {
            int_str = round_int_str(next, &int_str);
        }
        if int_str == "1" && negative {
            int_str.insert(0, '-');
        }
        return Ok(int_str);
    }
    let int_cnt = usize::try_from(int_cnt).unwrap_or(usize::MAX);
    if int_cnt <= digits.len() {
        let int_str = &digits[..int_cnt];
        Ok(bytes
            .get(int_cnt)
            .map_or_else(|| int_str.to_string(), |&next| round_int_str(next, int_str)))
    } else {
        Ok(format!("{digits}{}", "0".repeat(int_cnt - digits.len())))
    }
}

/// Parses an integer prefix; anything past it is a truncation.
///
/// Outside function casts the prefix may be a float, which is rounded.
pub fn str_to_int(ctx: &mut Context, s: &str, is_func_cast: bool) -> LossyResult<i64> {
    let s = s.trim();
    let (prefix, err) = split_lossy(get_valid_int_prefix(ctx, s, is_func_cast));
    match prefix.parse::<i64>() {
        Ok(v) => carry(v, err),
        Err(e) => {
            let saturated = match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => 0,
            };
            Err(Lossy::new(saturated, Error::out_of_range("BIGINT", prefix)))
        }
    }
}

/// Like [`str_to_int`] for unsigned targets. Only `-0`, `-00`, ... are
/// accepted with a minus sign.
pub fn str_to_uint(ctx: &mut Context, s: &str, is_func_cast: bool) -> LossyResult<u64> {
    let s = s.trim();
    let (prefix, err) = split_lossy(get_valid_int_prefix(ctx, s, is_func_cast));
    let (parsed, shown) = if let Some(rest) = prefix.strip_prefix('-') {
        let parsed = if rest.bytes().all(|b| b == b'0') {
            Ok(0)
        } else {
            Err(0)
        };
        (parsed, prefix.as_str())
    } else {
        let digits = prefix.strip_prefix('+').unwrap_or(&prefix);
        let parsed = digits.parse::<u64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => u64::MAX,
            _ => 0,
        });
        (parsed, digits)
    };
    match parsed {
        Ok(v) => carry(v, err),
        Err(saturated) => Err(Lossy::new(
            saturated,
            Error::out_of_range("BIGINT UNSIGNED", shown),
        )),
    }
}

/// Parses a float prefix. Values beyond the double range clamp to
/// `±f64::MAX` and are a truncation.
pub fn str_to_float(ctx: &mut Context, s: &str, is_func_cast: bool) -> LossyResult<f64> {
    let s = s.trim();
    let (valid, err) = split_lossy(get_valid_float_prefix(ctx, s, is_func_cast));
    let f = valid.parse::<f64>().unwrap_or(0.0);
    if f.is_infinite() {
        let clamped = if f > 0.0 { f64::MAX } else { -f64::MAX };
        trace!(input = s, "double literal out of range");
        return truncate(ctx, clamped, Error::truncated_wrong_value("DOUBLE", s));
    }
    carry(f, err)
}

/// Parses a DATETIME literal.
pub fn str_to_datetime(ctx: &mut Context, s: &str, fsp: i32) -> LossyResult<Time> {
    parse_time(ctx, s, TimeType::Datetime, fsp)
}

/// Result of [`str_to_duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationOrTime {
    /// The input was a TIME literal.
    Duration(Duration),
    /// The input was a full datetime.
    Time(Time),
}

/// Parses a TIME literal. Inputs of 12 or more digits, not counting sign
/// and fraction, are tried as a DATETIME first.
pub fn str_to_duration(ctx: &mut Context, s: &str, fsp: i32) -> LossyResult<DurationOrTime> {
    let s = s.trim();
    let mut length = s.len();
    if s.starts_with('-') {
        length -= 1;
    }
    if let Some(n) = s.find('.') {
        length = length.saturating_sub(s.len() - n);
    }
    if length >= 12 {
        if let Ok(t) = str_to_datetime(ctx, s, fsp) {
            return Ok(DurationOrTime::Time(t));
        }
    }

    match parse_duration(ctx, s, fsp) {
        Ok(d) => Ok(DurationOrTime::Duration(d)),
        Err(Lossy { value, error }) => {
            let d = DurationOrTime::Duration(value.unwrap_or_default());
            if matches!(error, Error::TruncatedWrongValue { .. }) {
                truncate(ctx, d, error)
            } else {
                Err(Lossy::new(d, error))
            }
        }
    }
}

/// Converts an `HHMMSS` number to a TIME. Numbers of 11 or more digits are
/// tried as a datetime; other out-of-range numbers clamp.
pub fn number_to_duration(n: i64, fsp: i32) -> LossyResult<Duration> {
    if n > TIME_MAX_VALUE {
        if n >= 10_000_000_000 {
            if let Ok(t) = parse_datetime_from_num(&Context::default(), n) {
                return Ok(t.to_duration());
            }
        }
        return Err(Lossy::new(
            Duration::max_value(fsp),
            Error::out_of_range("Duration", n.to_string()),
        ));
    }
    if n < -TIME_MAX_VALUE {
        return Err(Lossy::new(
            Duration::max_value(fsp).neg(),
            Error::out_of_range("Duration", n.to_string()),
        ));
    }

    let abs = n.abs();
    if abs / 10000 > TIME_MAX_HOUR || abs % 100 >= 60 || (abs / 100) % 100 >= 60 {
        return Err(Lossy::new(
            Duration::default(),
            Error::truncated_wrong_value(TIME_STR, abs.to_string()),
        ));
    }
    let d = Duration::new(abs / 10000, (abs / 100) % 100, abs % 100, 0, fsp);
    Ok(if n < 0 { d.neg() } else { d })
}

fn json_truncate<T>(ctx: &mut Context, zero: T, tp: &str, j: &JsonValue) -> LossyResult<T> {
    truncate(ctx, zero, Error::truncated_wrong_value(tp, j.to_string()))
}

/// Casts a JSON value to an integer of type `tp`.
///
/// Unsigned results are returned in two's complement.
pub fn convert_json_to_int(
    ctx: &mut Context,
    j: &JsonValue,
    unsigned: bool,
    tp: MysqlType,
) -> LossyResult<i64> {
    match j {
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => {
            json_truncate(ctx, 0, "INTEGER", j)
        }
        JsonValue::Bool(b) => Ok(i64::from(*b)),
        JsonValue::Number(n) => {
            let bounds_err = |e| Lossy::new(0, e);
            if let Some(i) = n.as_i64() {
                if unsigned {
                    let upper = tp.integer_unsigned_upper_bound().map_err(bounds_err)?;
                    return as_signed(convert_int_to_uint(ctx.flags(), i, upper, tp));
                }
                let lower = tp.integer_signed_lower_bound().map_err(bounds_err)?;
                let upper = tp.integer_signed_upper_bound().map_err(bounds_err)?;
                return convert_int_to_int(i, lower, upper, tp);
            }
            if let Some(u) = n.as_u64() {
                if unsigned {
                    let upper = tp.integer_unsigned_upper_bound().map_err(bounds_err)?;
                    return as_signed(convert_uint_to_uint(u, upper, tp));
                }
                let upper = tp.integer_signed_upper_bound().map_err(bounds_err)?;
                return convert_uint_to_int(u, upper, tp);
            }
            let f = n.as_f64().unwrap_or_default();
            if unsigned {
                let upper = tp.integer_unsigned_upper_bound().map_err(bounds_err)?;
                return as_signed(convert_float_to_uint(ctx.flags(), f, upper, tp));
            }
            let lower = tp.integer_signed_lower_bound().map_err(bounds_err)?;
            let upper = tp.integer_signed_upper_bound().map_err(bounds_err)?;
            convert_float_to_int(f, lower, upper, tp)
        }
        JsonValue::String(s) => {
            if s.len() > 1 && s.starts_with('-') {
                str_to_int(ctx, s, false)
            } else {
                as_signed(str_to_uint(ctx, s, false))
            }
        }
    }
}

/// Casts a JSON value to a double.
#[allow(clippy::cast_precision_loss)]
pub fn convert_json_to_float(ctx: &mut Context, j: &JsonValue) -> LossyResult<f64> {
    match j {
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => {
            json_truncate(ctx, 0.0, "FLOAT", j)
        }
        JsonValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        JsonValue::Number(n) => Ok(n
            .as_i64()
            .map(|i| i as f64)
            .or_else(|| n.as_u64().map(|u| u as f64))
            .or_else(|| n.as_f64())
            .unwrap_or_default()),
        JsonValue::String(s) => str_to_float(ctx, s, false),
    }
}

/// Parses a decimal literal. A valid numeric prefix followed by garbage
/// is a truncation; no numeric prefix at all is a bad number.
fn parse_decimal_prefix(s: &str) -> LossyResult<BigDecimal> {
    let trimmed = s.trim();
    if let Ok(d) = BigDecimal::from_str(trimmed) {
        return Ok(d);
    }
    let (valid_len, _) = scan_float_prefix(trimmed);
    match BigDecimal::from_str(&trimmed[..valid_len]) {
        Ok(d) if valid_len > 0 => Err(Lossy::new(d, Error::truncated_wrong_value("DECIMAL", s))),
        _ => Err(Lossy::new(BigDecimal::default(), Error::BadNumber(s.to_string()))),
    }
}

/// Casts a JSON value to a decimal.
pub fn convert_json_to_decimal(ctx: &mut Context, j: &JsonValue) -> LossyResult<BigDecimal> {
    let res = match j {
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => Err(Lossy::new(
            BigDecimal::default(),
            Error::truncated_wrong_value("DECIMAL", j.to_string()),
        )),
        JsonValue::Bool(b) => Ok(BigDecimal::from(i64::from(*b))),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(BigDecimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(BigDecimal::from(u))
            } else {
                parse_decimal_prefix(&n.to_string())
            }
        }
        JsonValue::String(s) => parse_decimal_prefix(s),
    };
    match res {
        Ok(d) => Ok(d),
        Err(Lossy { value, error }) => truncate(ctx, value, error),
    }
}

/// Renders a value as a string; `NULL` has no string form.
#[must_use]
pub fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Location;

    fn warn_ctx() -> Context {
        Context::new(
            ContextFlags::default().with_truncate_as_warning(true),
            Location::Utc,
        )
    }

    #[test]
    fn test_float_to_int_bounds() {
        let tp = MysqlType::Tiny;
        assert_eq!(convert_float_to_int(126.5, -128, 127, tp), Ok(127));
        assert_eq!(convert_float_to_int(-128.4, -128, 127, tp), Ok(-128));
        assert_eq!(convert_float_to_int(2.5, -128, 127, tp), Ok(3));
        let err = convert_float_to_int(127.6, -128, 127, tp).unwrap_err();
        assert_eq!(err.value, 127);
        assert_eq!(err.error.to_string(), "constant 128 overflows tinyint");
        assert_eq!(convert_float_to_int(-300.0, -128, 127, tp).unwrap_err().value, -128);
    }

    #[test]
    fn test_int_conversions() {
        let tp = MysqlType::Long;
        assert_eq!(convert_int_to_int(5, 0, 10, tp), Ok(5));
        assert_eq!(convert_int_to_int(11, 0, 10, tp).unwrap_err().value, 10);
        assert_eq!(convert_uint_to_int(u64::MAX, i64::MAX, tp).unwrap_err().value, i64::MAX);
        assert_eq!(convert_uint_to_uint(300, 255, tp).unwrap_err().value, 255);

        let strict = ContextFlags::strict();
        assert_eq!(convert_int_to_uint(strict, -1, u64::MAX, tp).unwrap_err().value, 0);
        let wrap = strict.with_allow_negative_to_unsigned(true);
        assert_eq!(convert_int_to_uint(wrap, -1, u64::MAX, tp), Ok(u64::MAX));
    }

    #[test]
    fn test_float_to_uint() {
        let tp = MysqlType::Longlong;
        let strict = ContextFlags::strict();
        assert_eq!(convert_float_to_uint(strict, 1.5, u64::MAX, tp), Ok(2));
        assert_eq!(convert_float_to_uint(strict, -1.0, u64::MAX, tp).unwrap_err().value, 0);
        let wrap = strict.with_allow_negative_to_unsigned(true);
        let err = convert_float_to_uint(wrap, -1.0, u64::MAX, tp).unwrap_err();
        assert_eq!(err.value, u64::MAX);
        assert_eq!(convert_float_to_uint(strict, 1e20, u64::MAX, tp).unwrap_err().value, u64::MAX);
        assert_eq!(convert_float_to_uint(strict, 256.0, 255, tp).unwrap_err().value, 255);
    }

    #[test]
    fn test_scientific_notation() {
        let cases = [
            ("1E6", "1000000"),
            (".12345E+5", "12345"),
            ("123.456e3", "123456"),
            ("123.456e2", "12345.6"),
            ("123.456e5", "12345600"),
            ("123.456e-2", "1.23456"),
            ("123.456e-5", "0.00123456"),
            ("-1.5e1", "-15"),
            ("12.5e0", "12.5"),
            ("42", "42"),
        ];
        for (input, expected) in cases {
            assert_eq!(convert_scientific_notation(input).unwrap(), expected, "{input}");
        }
        assert!(convert_scientific_notation("1e").is_err());
        assert!(convert_scientific_notation("1e99999").is_err());
    }

    #[test]
    fn test_decimal_to_uint_exact() {
        let tp = MysqlType::Longlong;
        let d = BigDecimal::from_str("18446744073709551615").unwrap();
        assert_eq!(convert_decimal_to_uint(&d, u64::MAX, tp), Ok(u64::MAX));
        let d = BigDecimal::from_str("18446744073709551615.4").unwrap();
        assert_eq!(convert_decimal_to_uint(&d, u64::MAX, tp), Ok(u64::MAX));
        let d = BigDecimal::from_str("18446744073709551614.5").unwrap();
        assert_eq!(convert_decimal_to_uint(&d, u64::MAX, tp), Ok(u64::MAX));
        let d = BigDecimal::from_str("18446744073709551615.5").unwrap();
        assert_eq!(convert_decimal_to_uint(&d, u64::MAX, tp).unwrap_err().value, u64::MAX);
        let d = BigDecimal::from_str("-1").unwrap();
        assert_eq!(convert_decimal_to_uint(&d, u64::MAX, tp).unwrap_err().value, 0);
        assert_eq!(convert_decimal_str_to_uint("0012.5", 255, tp), Ok(13));
        assert_eq!(convert_decimal_str_to_uint("2.56e2", 255, tp).unwrap_err().value, 255);
    }

    #[test]
    fn test_round_int_str() {
        assert_eq!(round_int_str(b'4', "12"), "12");
        assert_eq!(round_int_str(b'5', "12"), "13");
        assert_eq!(round_int_str(b'5', "19"), "20");
        assert_eq!(round_int_str(b'9', "99"), "100");
        assert_eq!(round_int_str(b'5', "-99"), "-100");
        assert_eq!(round_int_str(b'5', "9"), "10");
        assert_eq!(round_int_str(b'5', "-1"), "-2");
    }

    #[test]
    fn test_float_str_to_int_str() {
        let cases = [
            ("1.5", "2"),
            ("-9.5", "-10"),
            ("1e3", "1000"),
            ("1.23e1", "12"),
            ("1.25e1", "13"),
            ("12e-5", "0"),
            ("5e-1", "1"),
            ("-5e-1", "-1"),
            ("-0.4", "0"),
            (".5", "1"),
            ("+2.5", "3"),
            ("123", "123"),
        ];
        for (input, expected) in cases {
            assert_eq!(float_str_to_int_str(input, input).unwrap(), expected, "{input}");
        }
        let err = float_str_to_int_str("1e25", "1e25").unwrap_err();
        assert_eq!(err.value, MAX_UINT_STR);
        assert_eq!(err.error.code(), 1690);
        let err = float_str_to_int_str("-1e25", "-1e25").unwrap_err();
        assert_eq!(err.value, MIN_INT_STR);
    }

    #[test]
    fn test_str_to_int_strict() {
        let mut ctx = Context::strict();
        assert_eq!(str_to_int(&mut ctx, " 42 ", false), Ok(42));
        assert_eq!(str_to_int(&mut ctx, "1.5", false), Ok(2));
        let err = str_to_int(&mut ctx, "12abc", false).unwrap_err();
        assert_eq!(err.value, 12);
        assert_eq!(err.error, Error::truncated_wrong_value("DOUBLE", "12abc"));
        let err = str_to_int(&mut ctx, "12abc", true).unwrap_err();
        assert_eq!(err.error, Error::truncated_wrong_value("INTEGER", "12abc"));
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_str_to_int_warning() {
        let mut ctx = warn_ctx();
        assert_eq!(str_to_int(&mut ctx, "12abc", false), Ok(12));
        assert_eq!(str_to_int(&mut ctx, "abc", true), Ok(0));
        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_str_to_int_overflow() {
        let mut ctx = Context::strict();
        let err = str_to_int(&mut ctx, "99999999999999999999", false).unwrap_err();
        assert_eq!(err.value, i64::MAX);
        assert_eq!(
            err.error.to_string(),
            "BIGINT value is out of range in '99999999999999999999'"
        );
        let err = str_to_int(&mut ctx, "-1e30", false).unwrap_err();
        assert_eq!(err.value, i64::MIN);
    }

    #[test]
    fn test_str_to_uint() {
        let mut ctx = Context::strict();
        assert_eq!(str_to_uint(&mut ctx, "18446744073709551615", false), Ok(u64::MAX));
        assert_eq!(str_to_uint(&mut ctx, "+7", true), Ok(7));
        assert_eq!(str_to_uint(&mut ctx, "-000", true), Ok(0));
        let err = str_to_uint(&mut ctx, "-1", true).unwrap_err();
        assert_eq!(
            err.error.to_string(),
            "BIGINT UNSIGNED value is out of range in '-1'"
        );
        let err = str_to_uint(&mut ctx, "18446744073709551616", false).unwrap_err();
        assert_eq!(err.value, u64::MAX);
    }

    #[test]
    fn test_str_to_float() {
        let mut ctx = Context::strict();
        assert_eq!(str_to_float(&mut ctx, "1.5e2", false), Ok(150.0));
        assert_eq!(str_to_float(&mut ctx, "123.", false), Ok(123.0));
        assert_eq!(str_to_float(&mut ctx, "", true), Ok(0.0));
        let err = str_to_float(&mut ctx, "1e5e", false).unwrap_err();
        assert_eq!(err.value, 100_000.0);
        let err = str_to_float(&mut ctx, "-1e400", false).unwrap_err();
        assert_eq!(err.value, -f64::MAX);
        assert_eq!(err.error, Error::truncated_wrong_value("DOUBLE", "-1e400"));

        let mut ctx = warn_ctx();
        assert_eq!(str_to_float(&mut ctx, "2.5\0junk", false), Ok(2.5));
        assert_eq!(str_to_float(&mut ctx, "x", false), Ok(0.0));
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_str_to_duration() {
        let mut ctx = Context::strict();
        match str_to_duration(&mut ctx, "10:11:12", 0).unwrap() {
            DurationOrTime::Duration(d) => assert_eq!(d.to_string(), "10:11:12"),
            DurationOrTime::Time(t) => panic!("unexpected datetime {t}"),
        }
        match str_to_duration(&mut ctx, "20201231101112", 0).unwrap() {
            DurationOrTime::Time(t) => assert_eq!(t.to_string(), "2020-12-31 10:11:12"),
            DurationOrTime::Duration(d) => panic!("unexpected duration {d}"),
        }
        let err = str_to_duration(&mut ctx, "10:61:00", 0).unwrap_err();
        assert_eq!(err.error.code(), 1292);

        let mut ctx = warn_ctx();
        assert_eq!(
            str_to_duration(&mut ctx, "10:61:00", 0),
            Ok(DurationOrTime::Duration(Duration::default()))
        );
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_number_to_duration() {
        assert_eq!(number_to_duration(101_112, 0), Ok(Duration::new(10, 11, 12, 0, 0)));
        assert_eq!(
            number_to_duration(-101_112, 0),
            Ok(Duration::new(10, 11, 12, 0, 0).neg())
        );
        let err = number_to_duration(8_390_000, 0).unwrap_err();
        assert_eq!(err.value, Duration::max_value(0));
        assert_eq!(err.error.to_string(), "Duration value is out of range in '8390000'");
        assert_eq!(
            number_to_duration(-8_390_000, 0).unwrap_err().value,
            Duration::max_value(0).neg()
        );
        let err = number_to_duration(1_060, 0).unwrap_err();
        assert_eq!(err.error, Error::truncated_wrong_value(TIME_STR, "1060"));
        assert_eq!(
            number_to_duration(20_201_231_101_112, 0),
            Ok(Duration::new(10, 11, 12, 0, 0))
        );
    }

    #[test]
    fn test_json_to_int() {
        let mut ctx = Context::strict();
        let tp = MysqlType::Longlong;
        assert_eq!(convert_json_to_int(&mut ctx, &serde_json::json!(true), false, tp), Ok(1));
        assert_eq!(convert_json_to_int(&mut ctx, &serde_json::json!(-3), false, tp), Ok(-3));
        assert_eq!(convert_json_to_int(&mut ctx, &serde_json::json!(2.5), false, tp), Ok(3));
        assert_eq!(convert_json_to_int(&mut ctx, &serde_json::json!("42"), true, tp), Ok(42));
        assert_eq!(convert_json_to_int(&mut ctx, &serde_json::json!("-42"), false, tp), Ok(-42));
        assert_eq!(
            convert_json_to_int(&mut ctx, &serde_json::json!(u64::MAX), true, tp),
            Ok(-1)
        );
        let err = convert_json_to_int(&mut ctx, &serde_json::json!(300), false, MysqlType::Tiny)
            .unwrap_err();
        assert_eq!(err.value, 127);
        let err = convert_json_to_int(&mut ctx, &serde_json::json!([1]), false, tp).unwrap_err();
        assert_eq!(err.error, Error::truncated_wrong_value("INTEGER", "[1]"));
        assert!(convert_json_to_int(&mut ctx, &serde_json::json!(1), false, MysqlType::Double)
            .is_err());
    }

    #[test]
    fn test_json_to_float_and_decimal() {
        let mut ctx = warn_ctx();
        assert_eq!(convert_json_to_float(&mut ctx, &serde_json::json!(7)), Ok(7.0));
        assert_eq!(convert_json_to_float(&mut ctx, &serde_json::json!("1.5")), Ok(1.5));
        assert_eq!(convert_json_to_float(&mut ctx, &serde_json::Value::Null), Ok(0.0));
        assert_eq!(ctx.take_warnings().len(), 1);

        let dec = convert_json_to_decimal(&mut ctx, &serde_json::json!("12.50")).unwrap();
        assert_eq!(dec, BigDecimal::from_str("12.5").unwrap());
        let dec = convert_json_to_decimal(&mut ctx, &serde_json::json!("3.2x")).unwrap();
        assert_eq!(dec, BigDecimal::from_str("3.2").unwrap());
        assert_eq!(ctx.take_warnings().len(), 1);

        let mut ctx = Context::strict();
        let err = convert_json_to_decimal(&mut ctx, &serde_json::json!({"a": 1})).unwrap_err();
        assert_eq!(err.error.code(), 1292);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&Value::Null), None);
        assert_eq!(value_to_string(&Value::Uint(9)), Some("9".to_string()));
        let t = Time::zero(TimeType::Date);
        assert_eq!(value_to_string(&Value::Time(t)), Some("0000-00-00".to_string()));
    }
}
