//! Day numbers and week calculations.
//!
//! A day number counts days from the proleptic year 0 the way MySQL's
//! `TO_DAYS` does.

use super::core_time::CoreTime;
use super::SECONDS_PER_DAY;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Returns true for Gregorian leap years.
#[must_use]
pub const fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`; 0 for an invalid month.
#[must_use]
pub const fn days_in_month(year: u32, month: u32) -> u32 {
    if month == 0 || month > 12 {
        return 0;
    }
    if month == 2 && is_leap_year(year) {
        return 29;
    }
    DAYS_IN_MONTH[(month - 1) as usize]
}

const fn days_in_year(year: i64) -> i64 {
    if year >= 0 && is_leap_year(year as u32) {
        366
    } else {
        365
    }
}

/// Day number of a date. `0000-00-xx` maps to 0.
#[must_use]
pub const fn calc_daynr(year: i64, month: i64, day: i64) -> i64 {
    if year == 0 && month == 0 {
        return 0;
    }
    let mut year = year;
    let mut delsum = 365 * year + 31 * (month - 1) + day;
    if month <= 2 {
        year -= 1;
    } else {
        delsum -= (month * 4 + 23) / 10;
    }
    let temp = ((year / 100 + 1) * 3) / 4;
    delsum + year / 4 - temp
}

/// Inverse of [`calc_daynr`]. Day numbers outside the supported range give
/// `(0, 0, 0)`.
#[must_use]
pub fn get_date_from_daynr(daynr: i64) -> (u32, u32, u32) {
    if daynr <= 365 || daynr >= 3_652_500 {
        return (0, 0, 0);
    }
    let mut year = daynr * 100 / 36525;
    let temp = (((year - 1) / 100 + 1) * 3) / 4;
    let mut day_of_year = daynr - year * 365 - (year - 1) / 4 + temp;
    let mut year_days = days_in_year(year);
    while day_of_year > year_days {
        day_of_year -= year_days;
        year += 1;
        year_days = days_in_year(year);
    }

    let mut leap_day = 0;
    if year_days == 366 && day_of_year > 31 + 28 {
        day_of_year -= 1;
        if day_of_year == 31 + 28 {
            leap_day = 1;
        }
    }

    let mut month = 1;
    for days in DAYS_IN_MONTH {
        if day_of_year <= i64::from(days) {
            break;
        }
        day_of_year -= i64::from(days);
        month += 1;
    }
    (year as u32, month, (day_of_year + leap_day) as u32)
}

/// Day of week for a day number: 0 is Monday, or Sunday when
/// `sunday_first` is set.
#[must_use]
pub const fn calc_weekday(daynr: i64, sunday_first: bool) -> i64 {
    let mut daynr = daynr + 5;
    if sunday_first {
        daynr += 1;
    }
    daynr % 7
}

/// Decoded `WEEK()` mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekMode(u32);

impl WeekMode {
    const MONDAY_FIRST: u32 = 1;
    const YEAR: u32 = 2;
    const FIRST_WEEKDAY: u32 = 4;

    /// Decodes a MySQL week mode `0..=7`; higher bits are ignored.
    #[must_use]
    pub const fn new(mode: u32) -> Self {
        let mut v = mode & 7;
        if v & Self::MONDAY_FIRST == 0 {
            v ^= Self::FIRST_WEEKDAY;
        }
        Self(v)
    }

    #[must_use]
    const fn with_year(self) -> Self {
        Self(self.0 | Self::YEAR)
    }

    const fn monday_first(self) -> bool {
        self.0 & Self::MONDAY_FIRST != 0
    }

    const fn year(self) -> bool {
        self.0 & Self::YEAR != 0
    }

    const fn first_weekday(self) -> bool {
        self.0 & Self::FIRST_WEEKDAY != 0
    }
}

/// Returns `(year, week)` for a date under a week mode.
#[must_use]
pub(crate) fn calc_week(t: CoreTime, mode: WeekMode) -> (i64, i64) {
    let (ty, tm, td) = (i64::from(t.year()), i64::from(t.month()), i64::from(t.day()));
    let daynr = calc_daynr(ty, tm, td);
    let mut first_daynr = calc_daynr(ty, 1, 1);
    let monday_first = mode.monday_first();
    let mut week_year = mode.year();
    let first_weekday = mode.first_weekday();

    let mut weekday = calc_weekday(first_daynr, !monday_first);
    let mut year = ty;

    if tm == 1 && td <= 7 - weekday {
        if !week_year && ((first_weekday && weekday != 0) || (!first_weekday && weekday >= 4)) {
            return (year, 0);
        }
        week_year = true;
        year -= 1;
        let days = days_in_year(year);
        first_daynr -= days;
        weekday = (weekday + 53 * 7 - days) % 7;
    }

    let days = if (first_weekday && weekday != 0) || (!first_weekday && weekday >= 4) {
        daynr - (first_daynr + 7 - weekday)
    } else {
        daynr - (first_daynr - weekday)
    };

    if week_year && days >= 52 * 7 {
        weekday = (weekday + days_in_year(year)) % 7;
        if (!first_weekday && weekday < 4) || (first_weekday && weekday == 0) {
            return (year + 1, 1);
        }
    }
    (year, days / 7 + 1)
}

impl CoreTime {
    /// `WEEK(date, mode)`; 0 for dates with a zero month or day.
    #[must_use]
    pub fn week(self, mode: u32) -> i64 {
        if self.month() == 0 || self.day() == 0 {
            return 0;
        }
        calc_week(self, WeekMode::new(mode)).1
    }

    /// `YEARWEEK(date, mode)` as `(year, week)`.
    #[must_use]
    pub fn year_week(self, mode: u32) -> (i64, i64) {
        calc_week(self, WeekMode::new(mode).with_year())
    }

    /// `DAYOFYEAR(date)`; 0 for dates with a zero month or day.
    #[must_use]
    pub fn year_day(self) -> i64 {
        if self.month() == 0 || self.day() == 0 {
            return 0;
        }
        let year = i64::from(self.year());
        calc_daynr(year, i64::from(self.month()), i64::from(self.day()))
            - calc_daynr(year, 1, 1)
            + 1
    }

    /// Day of week with Sunday as 0.
    #[must_use]
    pub fn weekday(self) -> i64 {
        let daynr = calc_daynr(
            i64::from(self.year()),
            i64::from(self.month()),
            i64::from(self.day()),
        );
        calc_weekday(daynr, true)
    }

    /// Day number of the date part.
    #[must_use]
    pub fn daynr(self) -> i64 {
        calc_daynr(
            i64::from(self.year()),
            i64::from(self.month()),
            i64::from(self.day()),
        )
    }

    /// Microseconds since day 0.
    pub(crate) fn total_micros(self) -> i64 {
        let secs = self.daynr() * SECONDS_PER_DAY
            + i64::from(self.hour()) * 3600
            + i64::from(self.minute()) * 60
            + i64::from(self.second());
        secs * 1_000_000 + i64::from(self.microsecond())
    }

    /// Builds a value from microseconds since day 0. Totals whose day number
    /// falls outside the calendar give a zero date with the time-of-day set.
    pub(crate) fn from_total_micros(total: i64) -> Self {
        let seconds = total.div_euclid(1_000_000);
        let micro = total.rem_euclid(1_000_000);
        let (year, month, day) = get_date_from_daynr(seconds.div_euclid(SECONDS_PER_DAY));
        let mut ct = Self::ZERO;
        ct.set_year(year);
        ct.set_month(month);
        ct.set_day(day);
        ct.set_time_from_sec(seconds.rem_euclid(SECONDS_PER_DAY), micro);
        ct
    }

    /// Sets the time-of-day from seconds into the day.
    pub(crate) fn set_time_from_sec(&mut self, seconds: i64, micro: i64) {
        self.set_hour((seconds / 3600) as u32);
        let seconds = seconds % 3600;
        self.set_minute((seconds / 60) as u32);
        self.set_second((seconds % 60) as u32);
        self.set_microsecond(micro as u32);
    }
}
