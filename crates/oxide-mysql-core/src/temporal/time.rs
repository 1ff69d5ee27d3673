//! Arithmetic, validation and conversion of [`Time`] values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::calendar::{calc_daynr, get_date_from_daynr, is_leap_year};
use super::core_time::{CoreTime, Time, TimeType};
use super::duration::Duration;
use super::parse::parse_time;
use super::{check_fsp, MICROS_PER_SECOND, NANOS_PER_MICRO, NANOS_PER_SECOND, SECONDS_PER_DAY};
use crate::context::{Context, Location};
use crate::error::{Error, Lossy, LossyResult, Result, DATETIME_STR, TIME_STR};
use crate::mysql::MAX_FSP;

/// `0001-01-01 00:00:00`.
pub const MIN_DATETIME: CoreTime = CoreTime::from_date(1, 1, 1, 0, 0, 0, 0);
/// `9999-12-31 23:59:59.999999`.
pub const MAX_DATETIME: CoreTime = CoreTime::from_date(9999, 12, 31, 23, 59, 59, 999_999);
/// Smallest TIMESTAMP, in UTC.
pub const MIN_TIMESTAMP: Time = Time::new(
    CoreTime::from_date(1970, 1, 1, 0, 0, 1, 0),
    TimeType::Timestamp,
    0,
);
/// Largest TIMESTAMP, in UTC.
pub const MAX_TIMESTAMP: Time = Time::new(
    CoreTime::from_date(2038, 1, 19, 3, 14, 7, 999_999),
    TimeType::Timestamp,
    0,
);

const MAX_DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn check_month_day(year: u32, month: u32, day: u32, allow_invalid_date: bool) -> Result<()> {
    let err = || Error::wrong_value(DATETIME_STR, format!("{year}-{month}-{day}"));
    if month > 12 {
        return Err(err());
    }
    let mut max_day = 31;
    if !allow_invalid_date {
        if month > 0 {
            max_day = MAX_DAYS_IN_MONTH[(month - 1) as usize];
        }
        if month == 2 && !is_leap_year(year) {
            max_day = 28;
        }
    }
    if day > max_day {
        return Err(err());
    }
    Ok(())
}

fn check_date_type(t: CoreTime, allow_zero_in_date: bool, allow_invalid_date: bool) -> Result<()> {
    let (year, month, day) = (t.year(), t.month(), t.day());
    if year == 0 && month == 0 && day == 0 {
        return Ok(());
    }
    if !allow_zero_in_date && (month == 0 || day == 0) {
        return Err(Error::wrong_value(
            DATETIME_STR,
            format!("{year:04}-{month:02}-{day:02}"),
        ));
    }
    if t.compare(MAX_DATETIME) == Ordering::Greater {
        return Err(Error::wrong_value(TIME_STR, t.to_string()));
    }
    check_month_day(year, month, day, allow_invalid_date)
}

fn check_datetime_type(t: CoreTime, allow_zero_in_date: bool, allow_invalid_date: bool) -> Result<()> {
    check_date_type(t, allow_zero_in_date, allow_invalid_date)?;
    let (hour, minute, second) = (t.hour(), t.minute(), t.second());
    if hour >= 24 {
        return Err(Error::wrong_value(TIME_STR, hour.to_string()));
    }
    if minute >= 60 {
        return Err(Error::wrong_value(TIME_STR, minute.to_string()));
    }
    if second >= 60 {
        return Err(Error::wrong_value(TIME_STR, second.to_string()));
    }
    Ok(())
}

/// The TIMESTAMP range as wall-clock values in `loc`.
fn timestamp_bounds(loc: Location) -> Option<(CoreTime, CoreTime)> {
    let min = MIN_TIMESTAMP.core_time().to_naive().ok()?;
    let max = MAX_TIMESTAMP.core_time().to_naive().ok()?;
    Some((
        CoreTime::from_naive(loc.from_utc(min)),
        CoreTime::from_naive(loc.from_utc(max)),
    ))
}

fn check_timestamp_type(t: CoreTime, loc: Location) -> Result<()> {
    if t.is_zero() {
        return Ok(());
    }
    let naive = t.to_naive()?;
    let utc = match loc.to_utc(naive) {
        Ok(utc) => utc,
        Err(err) => return Err(dst_error(loc, t, err)),
    };
    let check = CoreTime::from_naive(utc);
    if check.compare(MAX_TIMESTAMP.core_time()) == Ordering::Greater
        || check.compare(MIN_TIMESTAMP.core_time()) == Ordering::Less
    {
        return Err(Error::wrong_value(TIME_STR, t.to_string()));
    }
    Ok(())
}

/// A failed zone conversion is reported as a DST transition only when the
/// value lies strictly inside the TIMESTAMP range.
fn dst_error(loc: Location, t: CoreTime, err: Error) -> Error {
    if !matches!(err, Error::TimestampInDstTransition { .. }) {
        return err;
    }
    match timestamp_bounds(loc) {
        Some((min, max))
            if t.compare(min) == Ordering::Greater && t.compare(max) == Ordering::Less =>
        {
            Error::TimestampInDstTransition {
                value: t.to_string(),
                zone: loc.to_string(),
            }
        }
        _ => Error::wrong_value(TIME_STR, t.to_string()),
    }
}

/// `FROM_DAYS(num)`. Day numbers outside the calendar give the zero date.
#[must_use]
pub fn time_from_days(num: i64) -> Time {
    if num < 0 {
        return Time::zero(TimeType::Date);
    }
    let (year, month, day) = get_date_from_daynr(num);
    match CoreTime::from_date_checked(i64::from(year), i64::from(month), i64::from(day), 0, 0, 0, 0)
    {
        Some(core) => Time::new(core, TimeType::Date, 0),
        None => Time::zero(TimeType::Date),
    }
}

impl Time {
    /// The current time in the context's zone.
    #[must_use]
    pub fn now(ctx: &Context, tp: TimeType, fsp: i32) -> Self {
        let t = Self::new(CoreTime::from_naive(ctx.location().now()), tp, MAX_FSP);
        t.round_frac(fsp).unwrap_or(t)
    }

    /// Validates the fields against the value's type.
    ///
    /// DATE and DATETIME honour the zero-in-date and invalid-date flags of
    /// `ctx`; a TIMESTAMP must fall inside the TIMESTAMP range once
    /// converted from the context's zone to UTC.
    pub fn check(&self, ctx: &Context) -> Result<()> {
        let flags = ctx.flags();
        match self.tp() {
            TimeType::Timestamp => check_timestamp_type(self.core_time(), ctx.location()),
            TimeType::Date | TimeType::Datetime => check_datetime_type(
                self.core_time(),
                flags.ignore_zero_in_date,
                flags.ignore_invalid_date_err,
            ),
        }
    }

    /// Moves a TIMESTAMP inside a DST gap to the first valid wall-clock
    /// minute after it.
    pub(crate) fn adjust_dst_gap(self, loc: Location) -> Result<Self> {
        let naive = self.core_time().to_naive()?;
        let utc = loc.adjusted_to_utc(naive)?;
        Ok(Self::new(
            CoreTime::from_naive(loc.from_utc(utc)),
            TimeType::Timestamp,
            self.fsp(),
        ))
    }

    /// Changes the type and validates the result.
    ///
    /// A TIMESTAMP landing in a DST gap is moved past the gap and the
    /// transition is recorded as a warning.
    pub fn convert(self, ctx: &mut Context, tp: TimeType) -> LossyResult<Self> {
        let mut t = self;
        t.set_type(tp);
        if tp == TimeType::Date {
            let mut core = t.core_time();
            core.set_time_from_sec(0, 0);
            t.set_core_time(core);
        }
        if self.tp() == tp || self.is_zero() {
            return Ok(t);
        }
        let Err(err) = t.check(ctx) else {
            return Ok(t);
        };
        if tp == TimeType::Timestamp && matches!(err, Error::TimestampInDstTransition { .. }) {
            if let Ok(adjusted) = t.adjust_dst_gap(ctx.location()) {
                ctx.append_warning(err);
                return Ok(adjusted);
            }
        }
        Err(Lossy::new(t, err))
    }

    /// The time-of-day part as a TIME value.
    #[must_use]
    pub fn to_duration(self) -> Duration {
        if self.is_zero() {
            return Duration::ZERO;
        }
        let (hour, minute, second) = self.clock();
        let secs = i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
        Duration::from_nanos(
            secs * NANOS_PER_SECOND + i64::from(self.microsecond()) * NANOS_PER_MICRO,
            self.fsp(),
        )
    }

    /// `YYYYMMDD` for a DATE, `YYYYMMDDhhmmss[.fff]` otherwise.
    #[must_use]
    pub fn to_number(self) -> BigDecimal {
        if self.is_zero() {
            return BigDecimal::from(0);
        }
        let date = format!("{:04}{:02}{:02}", self.year(), self.month(), self.day());
        let text = if self.tp() == TimeType::Date {
            date
        } else {
            let (hour, minute, second) = self.clock();
            let mut s = format!("{date}{hour:02}{minute:02}{second:02}");
            if self.fsp() > 0 {
                let micro = format!("{:06}", self.microsecond());
                s.push('.');
                s.push_str(&micro[..self.fsp().min(MAX_FSP) as usize]);
            }
            s
        };
        BigDecimal::from_str(&text).unwrap_or_default()
    }

    /// Orders by the date and time fields, ignoring type and fsp.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        self.core_time().compare(other.core_time())
    }

    /// Parses `s` with this value's type and compares with it.
    pub fn compare_str(self, ctx: &mut Context, s: &str) -> Result<Ordering> {
        let other = parse_time(ctx, s, self.tp(), MAX_FSP)?;
        Ok(self.compare(other))
    }

    /// Rounds the fraction to `fsp` digits, halves up.
    ///
    /// Values whose date does not exist on the calendar are rounded on
    /// their time-of-day only; a carry into the next day is then an error.
    pub fn round_frac(self, fsp: i32) -> Result<Self> {
        let fsp = check_fsp(fsp)?;
        if self.tp() == TimeType::Date || self.is_zero() || fsp == self.fsp() {
            return Ok(self);
        }
        let core = self.core_time();
        let unit = 10i64.pow((MAX_FSP - fsp) as u32);
        let micro = i64::from(core.microsecond());
        let rem = micro % unit;
        let rounded = if rem * 2 >= unit {
            micro - rem + unit
        } else {
            micro - rem
        };

        let rounded_core = if core.to_naive().is_ok() {
            CoreTime::from_total_micros(core.total_micros() - micro + rounded)
        } else {
            let secs = i64::from(core.hour()) * 3600
                + i64::from(core.minute()) * 60
                + i64::from(core.second())
                + rounded / MICROS_PER_SECOND;
            if secs >= SECONDS_PER_DAY {
                return Err(Error::wrong_value(TIME_STR, self.to_string()));
            }
            let mut nt = core;
            nt.set_time_from_sec(secs, rounded % MICROS_PER_SECOND);
            nt
        };
        Ok(Self::new(rounded_core, self.tp(), fsp))
    }

    /// Packs into the 64-bit layout used for storage.
    #[must_use]
    pub fn to_packed_u64(self) -> u64 {
        if self.is_zero() {
            return 0;
        }
        let ymd = ((u64::from(self.year()) * 13 + u64::from(self.month())) << 5)
            | u64::from(self.day());
        let hms = (u64::from(self.hour()) << 12)
            | (u64::from(self.minute()) << 6)
            | u64::from(self.second());
        (((ymd << 17) | hms) << 24) | u64::from(self.microsecond())
    }

    /// Inverse of [`Time::to_packed_u64`].
    #[must_use]
    pub fn from_packed_u64(packed: u64, tp: TimeType, fsp: i32) -> Self {
        if packed == 0 {
            return Self::new(CoreTime::ZERO, tp, fsp);
        }
        let ymdhms = packed >> 24;
        let ymd = ymdhms >> 17;
        let day = ymd & 31;
        let ym = ymd >> 5;
        let month = ym % 13;
        let year = ym / 13;
        let hms = ymdhms & ((1 << 17) - 1);
        let second = hms & 63;
        let minute = (hms >> 6) & 63;
        let hour = hms >> 12;
        let micro = packed % (1 << 24);
        let core = CoreTime::from_date(
            year as i64,
            month as i64,
            day as i64,
            hour as i64,
            minute as i64,
            second as i64,
            micro as i64,
        );
        Self::new(core, tp, fsp)
    }

    /// `self - other` as a TIME. Two TIMESTAMPs are compared as instants in
    /// the context's zone.
    #[must_use]
    pub fn sub(self, ctx: &Context, other: Self) -> Duration {
        let fsp = self.fsp().max(other.fsp());
        if self.tp() == TimeType::Timestamp && other.tp() == TimeType::Timestamp {
            let loc = ctx.location();
            let instants = self
                .core_time()
                .to_naive()
                .and_then(|a| loc.to_utc(a))
                .and_then(|a| Ok((a, loc.to_utc(other.core_time().to_naive()?)?)));
            if let Ok((a, b)) = instants {
                if let Some(nanos) = (a - b).num_nanoseconds() {
                    return Duration::from_nanos(nanos, fsp);
                }
            }
        }
        let micros = self.core_time().total_micros() - other.core_time().total_micros();
        Duration::from_nanos(micros.saturating_mul(NANOS_PER_MICRO), fsp)
    }

    /// `self + d`. The result keeps the type and takes the larger fsp.
    pub fn add(self, ctx: &Context, d: Duration) -> Result<Self> {
        let total = self.core_time().total_micros() + d.micros();
        if total < 0 {
            return Err(Error::datetime_overflow());
        }
        let mut core = CoreTime::from_total_micros(total);
        if self.tp() == TimeType::Date {
            core.set_time_from_sec(0, 0);
        }
        let t = Self::new(core, self.tp(), self.fsp().max(d.fsp()));
        t.check(ctx)?;
        Ok(t)
    }

    /// Reinterprets the wall-clock value from one zone in another.
    pub fn convert_time_zone(&mut self, from: Location, to: Location) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }
        let utc = from.to_utc(self.core_time().to_naive()?)?;
        self.set_core_time(CoreTime::from_naive(to.from_utc(utc)));
        Ok(())
    }

    /// Returns true if the year is a leap year.
    #[must_use]
    pub const fn is_leap_year(self) -> bool {
        is_leap_year(self.year())
    }

    /// The last day of the value's month; 0 for an invalid month.
    #[must_use]
    pub const fn last_day(self) -> u32 {
        super::calendar::days_in_month(self.year(), self.month())
    }

    /// `WEEK(t, mode)`.
    #[must_use]
    pub fn week(self, mode: u32) -> i64 {
        self.core_time().week(mode)
    }

    /// `YEARWEEK(t, mode)`.
    #[must_use]
    pub fn year_week(self, mode: u32) -> (i64, i64) {
        self.core_time().year_week(mode)
    }

    /// `DAYOFYEAR(t)`.
    #[must_use]
    pub fn year_day(self) -> i64 {
        self.core_time().year_day()
    }

    /// Day of week, Sunday is 0.
    #[must_use]
    pub fn weekday(self) -> i64 {
        self.core_time().weekday()
    }

    /// `TO_DAYS(t)`.
    #[must_use]
    pub fn daynr(self) -> i64 {
        calc_daynr(
            i64::from(self.year()),
            i64::from(self.month()),
            i64::from(self.day()),
        )
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())?;
        if self.tp() == TimeType::Date {
            return Ok(());
        }
        let (hour, minute, second) = self.clock();
        write!(f, " {hour:02}:{minute:02}:{second:02}")?;
        let fsp = self.fsp();
        if fsp > 0 {
            let micro = format!("{:06}", self.microsecond());
            write!(f, ".{}", &micro[..fsp.min(MAX_FSP) as usize])?;
        }
        Ok(())
    }
}
