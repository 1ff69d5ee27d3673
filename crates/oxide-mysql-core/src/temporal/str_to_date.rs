//! `STR_TO_DATE` parsing.
//!
//! The format is consumed one token at a time. A `%x` token runs the field
//! parser for `x`; any other character must match the date text literally.
//! Leading whitespace is skipped on both sides before every token.

use std::collections::HashMap;

use tracing::trace;

use super::calendar::{calc_daynr, get_date_from_daynr};
use super::core_time::{CoreTime, Time, TimeType};
use super::format::MONTH_NAMES;
use super::parse::adjust_year;
use crate::context::Context;
use crate::error::{Error, DATETIME_STR};

const AM: u32 = 1;
const PM: u32 = 2;

/// Tokens seen while matching, with the values the fix-up pass needs.
type Seen<'a> = HashMap<&'a str, u32>;

enum Step {
    Normal,
    EndOfLine,
    Fail,
}

impl Time {
    /// Parses `date` according to `format` into a DATETIME.
    ///
    /// Returns false when the text does not match or the result is not a
    /// valid datetime; on a mismatch the value is reset to the zero DATETIME.
    /// Trailing text after the last token is accepted with a
    /// truncated-value warning.
    pub fn str_to_date(&mut self, ctx: &mut Context, date: &str, format: &str) -> bool {
        let mut seen = Seen::new();
        let mut core = CoreTime::ZERO;
        let Some(warning) = match_format(&mut core, date, format, &mut seen) else {
            self.set_core_time(CoreTime::ZERO);
            self.set_type(TimeType::Datetime);
            self.set_fsp(0);
            return false;
        };
        if !fix_hour(&mut core, &seen) {
            return false;
        }
        fix_year_day(&mut core, &seen);

        self.set_core_time(core);
        self.set_type(TimeType::Datetime);
        if self.check(ctx).is_err() {
            return false;
        }
        if warning {
            ctx.append_warning(Error::truncated_wrong_value(DATETIME_STR, date));
        }
        true
    }
}

/// Runs the matcher. `None` is a mismatch; `Some(true)` means the date had
/// text left over after the format was exhausted.
fn match_format<'a>(
    t: &mut CoreTime,
    mut date: &'a str,
    mut format: &'a str,
    seen: &mut Seen<'a>,
) -> Option<bool> {
    loop {
        date = date.trim_start();
        format = format.trim_start();
        let (token, rest) = format_token(format)?;
        if token.is_empty() {
            return Some(!date.is_empty());
        }
        if date.is_empty() {
            seen.insert(token, 0);
        } else {
            trace!(token, date, "matching STR_TO_DATE token");
            date = match_token(t, date, token, seen)?;
        }
        format = rest;
    }
}

/// Splits one token off `format`. A lone trailing `%` is an error.
fn format_token(format: &str) -> Option<(&str, &str)> {
    let mut chars = format.char_indices();
    let Some((_, first)) = chars.next() else {
        return Some(("", ""));
    };
    let end = if first == '%' {
        let (i, c) = chars.next()?;
        i + c.len_utf8()
    } else {
        first.len_utf8()
    };
    Some(format.split_at(end))
}

fn match_token<'a>(
    t: &mut CoreTime,
    date: &'a str,
    token: &'a str,
    seen: &mut Seen<'a>,
) -> Option<&'a str> {
    match token {
        "%b" => abbreviated_month(t, date),
        "%c" | "%m" => numeric(date, 2, 0..=12).map(|(v, rest)| {
            t.set_month(v);
            rest
        }),
        "%d" | "%e" => numeric(date, 2, 0..=31).map(|(v, rest)| {
            t.set_day(v);
            rest
        }),
        "%f" => Some(microseconds(t, date)),
        "%h" | "%I" | "%l" => numeric(date, 2, 1..=12).map(|(v, rest)| {
            t.set_hour(v);
            seen.insert("%h", v);
            rest
        }),
        "%H" | "%k" => numeric(date, 2, 0..=23).map(|(v, rest)| {
            t.set_hour(v);
            seen.insert("%H", v);
            rest
        }),
        "%i" => numeric(date, 2, 0..=59).map(|(v, rest)| {
            t.set_minute(v);
            rest
        }),
        "%s" | "%S" => numeric(date, 2, 0..=59).map(|(v, rest)| {
            t.set_second(v);
            rest
        }),
        "%j" => numeric(date, 3, 1..=999).map(|(v, rest)| {
            seen.insert("%j", v);
            rest
        }),
        "%M" => full_month(t, date),
        "%p" => am_or_pm(date, seen),
        "%r" => clock(t, date, true),
        "%T" => clock(t, date, false),
        "%Y" => year(t, date, 4),
        "%y" => year(t, date, 2),
        "%#" => Some(date.trim_start_matches(char::is_numeric)),
        "%." => Some(date.trim_start_matches(is_unicode_punct)),
        "%@" => Some(date.trim_start_matches(char::is_alphabetic)),
        _ => date.strip_prefix(token),
    }
}

/// Reads up to `limit` leading ASCII digits.
fn n_digits(input: &str, limit: usize) -> Option<(u32, &str)> {
    let len = input
        .bytes()
        .take(limit)
        .take_while(u8::is_ascii_digit)
        .count();
    if len == 0 {
        return None;
    }
    let v = input.as_bytes()[..len]
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    Some((v, &input[len..]))
}

fn numeric(input: &str, limit: usize, range: std::ops::RangeInclusive<u32>) -> Option<(u32, &str)> {
    n_digits(input, limit).filter(|(v, _)| range.contains(v))
}

fn microseconds<'a>(t: &mut CoreTime, input: &'a str) -> &'a str {
    match n_digits(input, 6) {
        Some((v, rest)) => {
            let digits = input.len() - rest.len();
            t.set_microsecond(v * 10u32.pow((6 - digits) as u32));
            rest
        }
        None => {
            t.set_microsecond(0);
            input
        }
    }
}

fn year<'a>(t: &mut CoreTime, input: &'a str, limit: usize) -> Option<&'a str> {
    let (v, rest) = n_digits(input, limit)?;
    let digits = input.len() - rest.len();
    let v = if digits <= 2 {
        adjust_year(i64::from(v)) as u32
    } else {
        v
    };
    t.set_year(v);
    Some(rest)
}

fn has_prefix_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn abbreviated_month<'a>(t: &mut CoreTime, input: &'a str) -> Option<&'a str> {
    let month = MONTH_NAMES
        .iter()
        .position(|name| has_prefix_ignore_case(input, &name[..3]))?;
    t.set_month(month as u32 + 1);
    Some(&input[3..])
}

fn full_month<'a>(t: &mut CoreTime, input: &'a str) -> Option<&'a str> {
    let (month, name) = MONTH_NAMES
        .iter()
        .enumerate()
        .find(|(_, name)| has_prefix_ignore_case(input, name))?;
    t.set_month(month as u32 + 1);
    Some(&input[name.len()..])
}

fn am_or_pm<'a>(input: &'a str, seen: &mut Seen<'a>) -> Option<&'a str> {
    let v = if has_prefix_ignore_case(input, "am") {
        AM
    } else if has_prefix_ignore_case(input, "pm") {
        PM
    } else {
        return None;
    };
    seen.insert("%p", v);
    Some(&input[2..])
}

/// Skips a `:` separator with optional whitespace around it.
fn separator(input: &str) -> (&str, Step) {
    let input = input.trim_start();
    if input.is_empty() {
        return (input, Step::EndOfLine);
    }
    let Some(rest) = input.strip_prefix(':') else {
        return (input, Step::Fail);
    };
    let rest = rest.trim_start();
    if rest.is_empty() {
        (rest, Step::EndOfLine)
    } else {
        (rest, Step::Normal)
    }
}

/// `%r` (`hh:mm:ss AM`) and `%T` (`hh:mm:ss`). Fields are stored as they are
/// read, so a truncated input such as `12:13` keeps its hour and minute.
fn clock<'a>(t: &mut CoreTime, input: &'a str, twelve_hour: bool) -> Option<&'a str> {
    match clock_fields(t, input, twelve_hour) {
        (_, Step::Fail) => None,
        (rest, _) => Some(rest),
    }
}

fn clock_fields<'a>(t: &mut CoreTime, input: &'a str, twelve_hour: bool) -> (&'a str, Step) {
    let hours = if twelve_hour { 1..=12 } else { 0..=23 };
    let Some((mut hour, rest)) = numeric(input, 2, hours) else {
        return (input, Step::Fail);
    };
    if twelve_hour && hour == 12 {
        hour = 0;
    }
    t.set_hour(hour);

    let rest = match separator(rest) {
        (rest, Step::Normal) => rest,
        other => return other,
    };
    let Some((minute, rest)) = numeric(rest, 2, 0..=59) else {
        return (rest, Step::Fail);
    };
    t.set_minute(minute);

    let rest = match separator(rest) {
        (rest, Step::Normal) => rest,
        other => return other,
    };
    let Some((second, rest)) = numeric(rest, 2, 0..=59) else {
        return (rest, Step::Fail);
    };
    t.set_second(second);
    if !twelve_hour {
        return (rest, Step::Normal);
    }

    let rest = rest.trim_start();
    if rest.is_empty() {
        return (rest, Step::EndOfLine);
    }
    if has_prefix_ignore_case(rest, "AM") {
        t.set_hour(hour);
    } else if has_prefix_ignore_case(rest, "PM") {
        t.set_hour(hour + 12);
    } else {
        return (rest, Step::Fail);
    }
    (&rest[2..], Step::Normal)
}

/// Unicode general category P restricted to ASCII: symbols such as `+`, `$`
/// and `|` are not punctuation here.
fn is_unicode_punct(c: char) -> bool {
    c.is_ascii_punctuation() && !matches!(c, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~')
}

/// Applies `%p` to the hour read by `%h`. Fails when `%p` is combined with
/// a 24-hour field or a zero hour.
fn fix_hour(t: &mut CoreTime, seen: &Seen<'_>) -> bool {
    let Some(&am_pm) = seen.get("%p") else {
        if seen.contains_key("%h") && t.hour() == 12 {
            t.set_hour(0);
        }
        return true;
    };
    if seen.contains_key("%H") || t.hour() == 0 {
        return false;
    }
    if t.hour() == 12 {
        match am_pm {
            AM => t.set_hour(0),
            PM => t.set_hour(12),
            _ => {}
        }
        return true;
    }
    if am_pm == PM {
        t.set_hour(t.hour() + 12);
    }
    true
}

/// Resolves `%j` against the parsed year.
fn fix_year_day(t: &mut CoreTime, seen: &Seen<'_>) {
    let Some(&year_day) = seen.get("%j") else {
        return;
    };
    if year_day == 0 {
        return;
    }
    let daynr = calc_daynr(i64::from(t.year()), 1, 1) + i64::from(year_day) - 1;
    let (year, month, day) = get_date_from_daynr(daynr);
    t.set_year(year);
    t.set_month(month);
    t.set_day(day);
}

/// Reports whether `format` contains time-of-day tokens and date tokens.
#[must_use]
pub fn get_format_type(format: &str) -> (bool, bool) {
    let mut is_duration = false;
    let mut is_date = false;
    let mut format = format.trim_start();
    while let Some((token, rest)) = format_token(format) {
        if token.is_empty() {
            break;
        }
        if let Some(c) = token.strip_prefix('%').and_then(|t| t.chars().next()) {
            match c {
                'h' | 'H' | 'i' | 'I' | 's' | 'S' | 'k' | 'l' | 'f' | 'r' | 'T' => {
                    is_duration = true;
                }
                'y' | 'Y' | 'm' | 'M' | 'c' | 'b' | 'D' | 'd' | 'e' => is_date = true,
                _ => {}
            }
        }
        if is_duration && is_date {
            break;
        }
        format = rest;
    }
    (is_duration, is_date)
}

/// Number of digits after the last `.` in `date`.
#[must_use]
pub fn date_fsp(date: &str) -> usize {
    date.rfind('.').map_or(0, |i| date.len() - i - 1)
}
