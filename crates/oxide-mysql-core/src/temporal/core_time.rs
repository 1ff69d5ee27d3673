//! Bit layout of packed temporal values.
//!
//! ```text
//! | year 14 | month 4 | day 5 | hour 5 | minute 6 | second 6 | micro 20 | fsp/type 4 |
//!  63     50 49    46 45   41 40    36 35      30 29      24 23      4  3          0
//! ```
//!
//! The low 4 bits are the tag: `0b1110` marks a DATE, otherwise bits 1..=3
//! hold the fsp and bit 0 is set for a TIMESTAMP.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mysql::{MysqlType, DEFAULT_FSP, MAX_FSP, MIN_FSP, UNSPECIFIED_FSP};

const YEAR_OFFSET: u64 = 50;
const YEAR_WIDTH: u64 = 14;
const MONTH_OFFSET: u64 = 46;
const MONTH_WIDTH: u64 = 4;
const DAY_OFFSET: u64 = 41;
const DAY_WIDTH: u64 = 5;
const HOUR_OFFSET: u64 = 36;
const HOUR_WIDTH: u64 = 5;
const MINUTE_OFFSET: u64 = 30;
const MINUTE_WIDTH: u64 = 6;
const SECOND_OFFSET: u64 = 24;
const SECOND_WIDTH: u64 = 6;
const MICRO_OFFSET: u64 = 4;
const MICRO_WIDTH: u64 = 20;
const FSP_TT_WIDTH: u64 = 4;

const fn mask(offset: u64, width: u64) -> u64 {
    ((1 << width) - 1) << offset
}

const YEAR_MASK: u64 = mask(YEAR_OFFSET, YEAR_WIDTH);
const MONTH_MASK: u64 = mask(MONTH_OFFSET, MONTH_WIDTH);
const DAY_MASK: u64 = mask(DAY_OFFSET, DAY_WIDTH);
const HOUR_MASK: u64 = mask(HOUR_OFFSET, HOUR_WIDTH);
const MINUTE_MASK: u64 = mask(MINUTE_OFFSET, MINUTE_WIDTH);
const SECOND_MASK: u64 = mask(SECOND_OFFSET, SECOND_WIDTH);
const MICRO_MASK: u64 = mask(MICRO_OFFSET, MICRO_WIDTH);
const FSP_TT_MASK: u64 = mask(0, FSP_TT_WIDTH);
const CORE_MASK: u64 = !FSP_TT_MASK;

const FSP_TT_FOR_DATE: u64 = 0b1110;
const FSP_MASK: u64 = 0b1110;
const TIMESTAMP_BIT: u64 = 1;

/// Maps an unspecified fsp to the default and clamps the rest into
/// `[MIN_FSP, MAX_FSP]`.
const fn normalize_fsp(fsp: i32) -> i32 {
    if fsp == UNSPECIFIED_FSP {
        DEFAULT_FSP
    } else if fsp < MIN_FSP {
        MIN_FSP
    } else if fsp > MAX_FSP {
        MAX_FSP
    } else {
        fsp
    }
}

/// The three MySQL types a [`Time`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeType {
    /// `DATE`
    Date,
    /// `DATETIME`
    Datetime,
    /// `TIMESTAMP`
    Timestamp,
}

impl TimeType {
    /// Returns the lowercase type name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => crate::error::DATE_STR,
            Self::Datetime => crate::error::DATETIME_STR,
            Self::Timestamp => crate::error::TIMESTAMP_STR,
        }
    }

    /// Returns the MySQL column type.
    #[must_use]
    pub const fn mysql_type(self) -> MysqlType {
        match self {
            Self::Date => MysqlType::Date,
            Self::Datetime => MysqlType::Datetime,
            Self::Timestamp => MysqlType::Timestamp,
        }
    }
}

impl TryFrom<MysqlType> for TimeType {
    type Error = Error;

    fn try_from(tp: MysqlType) -> Result<Self> {
        match tp {
            MysqlType::Date | MysqlType::NewDate => Ok(Self::Date),
            MysqlType::Datetime => Ok(Self::Datetime),
            MysqlType::Timestamp => Ok(Self::Timestamp),
            other => Err(Error::UnknownType(other as u8)),
        }
    }
}

impl fmt::Display for TimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The date and time-of-day fields of a temporal value, without its tag.
///
/// Fields are not validated. Use [`Time::check`] for that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CoreTime(u64);

impl CoreTime {
    /// The all-zero value `0000-00-00 00:00:00`.
    pub const ZERO: Self = Self(0);

    /// Packs the fields, silently dropping bits that do not fit their width.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_date(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        microsecond: i64,
    ) -> Self {
        let mut v = 0u64;
        v |= ((microsecond as u64) << MICRO_OFFSET) & MICRO_MASK;
        v |= ((second as u64) << SECOND_OFFSET) & SECOND_MASK;
        v |= ((minute as u64) << MINUTE_OFFSET) & MINUTE_MASK;
        v |= ((hour as u64) << HOUR_OFFSET) & HOUR_MASK;
        v |= ((day as u64) << DAY_OFFSET) & DAY_MASK;
        v |= ((month as u64) << MONTH_OFFSET) & MONTH_MASK;
        v |= ((year as u64) << YEAR_OFFSET) & YEAR_MASK;
        Self(v)
    }

    /// Packs the fields, or returns `None` if any is negative or too wide.
    #[must_use]
    pub const fn from_date_checked(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        microsecond: i64,
    ) -> Option<Self> {
        const fn fits(v: i64, width: u64) -> bool {
            v >= 0 && (v as u64) < (1 << width)
        }
        if fits(year, YEAR_WIDTH)
            && fits(month, MONTH_WIDTH)
            && fits(day, DAY_WIDTH)
            && fits(hour, HOUR_WIDTH)
            && fits(minute, MINUTE_WIDTH)
            && fits(second, SECOND_WIDTH)
            && fits(microsecond, MICRO_WIDTH)
        {
            Some(Self::from_date(
                year,
                month,
                day,
                hour,
                minute,
                second,
                microsecond,
            ))
        } else {
            None
        }
    }

    /// Builds a value from a wall-clock datetime, rounding nanoseconds to
    /// the nearest microsecond.
    #[must_use]
    pub fn from_naive(dt: chrono::NaiveDateTime) -> Self {
        use chrono::{Datelike, Timelike};
        let dt = dt + chrono::Duration::nanoseconds(500);
        Self::from_date(
            i64::from(dt.year()),
            i64::from(dt.month()),
            i64::from(dt.day()),
            i64::from(dt.hour()),
            i64::from(dt.minute()),
            i64::from(dt.second()),
            i64::from(dt.nanosecond() / 1000),
        )
    }

    /// Converts to a wall-clock datetime, failing for dates that do not
    /// exist on the calendar such as `2021-02-30` or `2021-00-01`.
    pub fn to_naive(self) -> Result<chrono::NaiveDateTime> {
        chrono::NaiveDate::from_ymd_opt(self.year() as i32, self.month(), self.day())
            .and_then(|d| {
                d.and_hms_micro_opt(self.hour(), self.minute(), self.second(), self.microsecond())
            })
            .ok_or_else(|| Error::wrong_value(crate::error::TIME_STR, self.to_string()))
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Year.
    #[must_use]
    pub const fn year(self) -> u32 {
        ((self.0 & YEAR_MASK) >> YEAR_OFFSET) as u32
    }

    /// Month, 1-based; 0 in zero dates.
    #[must_use]
    pub const fn month(self) -> u32 {
        ((self.0 & MONTH_MASK) >> MONTH_OFFSET) as u32
    }

    /// Day of month.
    #[must_use]
    pub const fn day(self) -> u32 {
        ((self.0 & DAY_MASK) >> DAY_OFFSET) as u32
    }

    /// Hour.
    #[must_use]
    pub const fn hour(self) -> u32 {
        ((self.0 & HOUR_MASK) >> HOUR_OFFSET) as u32
    }

    /// Minute.
    #[must_use]
    pub const fn minute(self) -> u32 {
        ((self.0 & MINUTE_MASK) >> MINUTE_OFFSET) as u32
    }

    /// Second.
    #[must_use]
    pub const fn second(self) -> u32 {
        ((self.0 & SECOND_MASK) >> SECOND_OFFSET) as u32
    }

    /// Microsecond.
    #[must_use]
    pub const fn microsecond(self) -> u32 {
        ((self.0 & MICRO_MASK) >> MICRO_OFFSET) as u32
    }

    const fn with_field(self, value: u32, offset: u64, field_mask: u64) -> Self {
        Self((self.0 & !field_mask) | ((value as u64) << offset) & field_mask)
    }

    pub(crate) fn set_year(&mut self, year: u32) {
        *self = self.with_field(year, YEAR_OFFSET, YEAR_MASK);
    }

    pub(crate) fn set_month(&mut self, month: u32) {
        *self = self.with_field(month, MONTH_OFFSET, MONTH_MASK);
    }

    pub(crate) fn set_day(&mut self, day: u32) {
        *self = self.with_field(day, DAY_OFFSET, DAY_MASK);
    }

    pub(crate) fn set_hour(&mut self, hour: u32) {
        *self = self.with_field(hour, HOUR_OFFSET, HOUR_MASK);
    }

    pub(crate) fn set_minute(&mut self, minute: u32) {
        *self = self.with_field(minute, MINUTE_OFFSET, MINUTE_MASK);
    }

    pub(crate) fn set_second(&mut self, second: u32) {
        *self = self.with_field(second, SECOND_OFFSET, SECOND_MASK);
    }

    pub(crate) fn set_microsecond(&mut self, micro: u32) {
        *self = self.with_field(micro, MICRO_OFFSET, MICRO_MASK);
    }

    /// Orders two values field by field, year first.
    #[must_use]
    pub fn compare(self, other: Self) -> std::cmp::Ordering {
        (self.0 & CORE_MASK).cmp(&(other.0 & CORE_MASK))
    }

    /// Returns true for `0000-00-00 00:00:00.000000`.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 & CORE_MASK == 0
    }
}

impl fmt::Display for CoreTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )?;
        if self.microsecond() != 0 {
            write!(f, ".{:06}", self.microsecond())?;
        }
        Ok(())
    }
}

/// A DATE, DATETIME or TIMESTAMP value.
///
/// The type and fsp live in the low 4 bits; changing them never touches
/// the date and time fields. Serializes as the raw `u64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(u64);

impl Time {
    /// `0000-00-00 00:00:00` as a DATETIME with fsp 0.
    pub const ZERO: Self = Self(0);

    /// Combines `core` with a type and fsp.
    ///
    /// A DATE ignores `fsp`. An unspecified fsp becomes the default, and
    /// any other fsp is clamped into `[0, 6]`.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn new(core: CoreTime, tp: TimeType, fsp: i32) -> Self {
        let mut v = core.0 & CORE_MASK;
        if let TimeType::Date = tp {
            return Self(v | FSP_TT_FOR_DATE);
        }
        v |= ((normalize_fsp(fsp) as u64) << 1) & FSP_MASK;
        if let TimeType::Timestamp = tp {
            v |= TIMESTAMP_BIT;
        }
        Self(v)
    }

    /// The zero value of the given type.
    #[must_use]
    pub const fn zero(tp: TimeType) -> Self {
        Self::new(CoreTime::ZERO, tp, DEFAULT_FSP)
    }

    /// Returns the raw packed bits, tag included.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Rebuilds a value from [`Time::raw`].
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    const fn fsp_tt(self) -> u64 {
        self.0 & FSP_TT_MASK
    }

    fn set_fsp_tt(&mut self, fsp_tt: u64) {
        self.0 = (self.0 & !FSP_TT_MASK) | (fsp_tt & FSP_TT_MASK);
    }

    /// The value's type.
    #[must_use]
    pub const fn tp(self) -> TimeType {
        if self.fsp_tt() == FSP_TT_FOR_DATE {
            TimeType::Date
        } else if self.0 & TIMESTAMP_BIT == TIMESTAMP_BIT {
            TimeType::Timestamp
        } else {
            TimeType::Datetime
        }
    }

    /// The fractional seconds precision; always 0 for a DATE.
    ///
    /// Raw bits from [`Time::from_raw`] or deserialization may encode 7;
    /// that reads back as 6.
    #[must_use]
    pub const fn fsp(self) -> i32 {
        let fsp_tt = self.fsp_tt();
        if fsp_tt == FSP_TT_FOR_DATE {
            0
        } else {
            normalize_fsp((fsp_tt >> 1) as i32)
        }
    }

    /// Changes the type, keeping the date and time fields.
    pub fn set_type(&mut self, tp: TimeType) {
        let mut fsp_tt = self.fsp_tt();
        if fsp_tt == FSP_TT_FOR_DATE && !matches!(tp, TimeType::Date) {
            fsp_tt = 0;
        }
        match tp {
            TimeType::Date => fsp_tt = FSP_TT_FOR_DATE,
            TimeType::Timestamp => fsp_tt |= TIMESTAMP_BIT,
            TimeType::Datetime => fsp_tt &= !TIMESTAMP_BIT,
        }
        self.set_fsp_tt(fsp_tt);
    }

    /// Changes the fsp, clamped into `[0, 6]`. Has no effect on a DATE.
    #[allow(clippy::cast_sign_loss)]
    pub fn set_fsp(&mut self, fsp: i32) {
        if self.fsp_tt() == FSP_TT_FOR_DATE {
            return;
        }
        let fsp = normalize_fsp(fsp);
        self.0 = (self.0 & !FSP_MASK) | (((fsp as u64) << 1) & FSP_MASK);
    }

    /// Returns a copy with another type.
    #[must_use]
    pub fn with_type(mut self, tp: TimeType) -> Self {
        self.set_type(tp);
        self
    }

    /// Returns the date and time fields.
    #[must_use]
    pub const fn core_time(self) -> CoreTime {
        CoreTime(self.0 & CORE_MASK)
    }

    /// Replaces the date and time fields, keeping the tag.
    pub fn set_core_time(&mut self, core: CoreTime) {
        self.0 = (self.0 & !CORE_MASK) | (core.0 & CORE_MASK);
    }

    /// Year.
    #[must_use]
    pub const fn year(self) -> u32 {
        self.core_time().year()
    }

    /// Month.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.core_time().month()
    }

    /// Day of month.
    #[must_use]
    pub const fn day(self) -> u32 {
        self.core_time().day()
    }

    /// Hour.
    #[must_use]
    pub const fn hour(self) -> u32 {
        self.core_time().hour()
    }

    /// Minute.
    #[must_use]
    pub const fn minute(self) -> u32 {
        self.core_time().minute()
    }

    /// Second.
    #[must_use]
    pub const fn second(self) -> u32 {
        self.core_time().second()
    }

    /// Microsecond.
    #[must_use]
    pub const fn microsecond(self) -> u32 {
        self.core_time().microsecond()
    }

    /// Returns `(hour, minute, second)`.
    #[must_use]
    pub const fn clock(self) -> (u32, u32, u32) {
        (self.hour(), self.minute(), self.second())
    }

    /// Returns true when every date and time field is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.core_time().is_zero()
    }

    /// Returns true when the month or the day is zero.
    #[must_use]
    pub const fn invalid_zero(self) -> bool {
        self.month() == 0 || self.day() == 0
    }
}
