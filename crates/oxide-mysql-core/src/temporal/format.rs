//! `DATE_FORMAT` rendering.

use std::fmt::Display;

use super::core_time::Time;
use crate::error::{Error, Result, TIME_STR};

/// Full month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full weekday names, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const ABBREV_WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Formats `v` left-padded with zeros to at least `n` characters.
#[must_use]
pub fn format_int_width_n(v: impl Display, n: usize) -> String {
    format!("{v:0>n$}")
}

fn day_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

fn month_name(month: u32) -> Result<&'static str> {
    match month {
        1..=12 => Ok(MONTH_NAMES[(month - 1) as usize]),
        _ => Err(Error::wrong_value(TIME_STR, month.to_string())),
    }
}

impl Time {
    /// Renders the value with MySQL `DATE_FORMAT` tokens.
    ///
    /// Characters after `%` that are not tokens are copied literally.
    /// Month names fail for a zero month.
    pub fn date_format(self, layout: &str) -> Result<String> {
        let mut buf = String::with_capacity(layout.len() * 2);
        let mut in_pattern = false;
        for c in layout.chars() {
            if in_pattern {
                self.write_token(c, &mut buf)?;
                in_pattern = false;
            } else if c == '%' {
                in_pattern = true;
            } else {
                buf.push(c);
            }
        }
        Ok(buf)
    }

    fn write_token(self, c: char, buf: &mut String) -> Result<()> {
        let twelve = |h: u32| if h % 12 == 0 { 12 } else { h % 12 };
        match c {
            'b' => buf.push_str(&month_name(self.month())?[..3]),
            'M' => buf.push_str(month_name(self.month())?),
            'm' => buf.push_str(&format_int_width_n(self.month(), 2)),
            'c' => buf.push_str(&self.month().to_string()),
            'D' => {
                buf.push_str(&self.day().to_string());
                buf.push_str(day_suffix(self.day()));
            }
            'd' => buf.push_str(&format_int_width_n(self.day(), 2)),
            'e' => buf.push_str(&self.day().to_string()),
            'j' => buf.push_str(&format_int_width_n(self.year_day(), 3)),
            'H' => buf.push_str(&format_int_width_n(self.hour(), 2)),
            'k' => buf.push_str(&self.hour().to_string()),
            'h' | 'I' => buf.push_str(&format_int_width_n(twelve(self.hour()), 2)),
            'l' => buf.push_str(&twelve(self.hour()).to_string()),
            'i' => buf.push_str(&format_int_width_n(self.minute(), 2)),
            'p' => buf.push_str(if self.hour() / 12 % 2 == 0 { "AM" } else { "PM" }),
            'r' => {
                let h = self.hour() % 24;
                let suffix = if h < 12 { "AM" } else { "PM" };
                buf.push_str(&format!(
                    "{:02}:{:02}:{:02} {suffix}",
                    twelve(h),
                    self.minute(),
                    self.second()
                ));
            }
            'T' => buf.push_str(&format!(
                "{:02}:{:02}:{:02}",
                self.hour(),
                self.minute(),
                self.second()
            )),
            'S' | 's' => buf.push_str(&format_int_width_n(self.second(), 2)),
            'f' => buf.push_str(&format!("{:06}", self.microsecond())),
            'U' => buf.push_str(&format_int_width_n(self.week(0), 2)),
            'u' => buf.push_str(&format_int_width_n(self.week(1), 2)),
            'V' => buf.push_str(&format_int_width_n(self.week(2), 2)),
            'v' => buf.push_str(&format_int_width_n(self.year_week(3).1, 2)),
            'a' => buf.push_str(ABBREV_WEEKDAY_NAMES[self.weekday() as usize]),
            'W' => buf.push_str(WEEKDAY_NAMES[self.weekday() as usize]),
            'w' => buf.push_str(&self.weekday().to_string()),
            'X' => buf.push_str(&format_int_width_n(self.year_week(2).0, 4)),
            'x' => buf.push_str(&format_int_width_n(self.year_week(3).0, 4)),
            'Y' => buf.push_str(&format_int_width_n(self.year(), 4)),
            'y' => {
                let year = format_int_width_n(self.year(), 4);
                buf.push_str(&year[year.len() - 2..]);
            }
            other => buf.push(other),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::{CoreTime, TimeType};

    fn t(y: i64, mo: i64, d: i64, h: i64, mi: i64, s: i64, us: i64) -> Time {
        Time::new(CoreTime::from_date(y, mo, d, h, mi, s, us), TimeType::Datetime, 6)
    }

    #[test]
    fn test_format_int_width_n() {
        assert_eq!(format_int_width_n(7, 2), "07");
        assert_eq!(format_int_width_n(123, 2), "123");
        assert_eq!(format_int_width_n(5, 4), "0005");
    }

    #[test]
    fn test_date_tokens() {
        let v = t(2010, 1, 7, 23, 12, 34, 12345);
        assert_eq!(
            v.date_format("%b %M %m %c %D %d %e %j").unwrap(),
            "Jan January 01 1 7th 07 7 007"
        );
        assert_eq!(v.date_format("%Y %y %a %W %w").unwrap(), "2010 10 Thu Thursday 4");
        assert_eq!(v.date_format("%U %u %V %v %X %x").unwrap(), "01 01 01 01 2010 2010");
    }

    #[test]
    fn test_time_tokens() {
        let v = t(2010, 1, 7, 23, 12, 34, 12345);
        assert_eq!(
            v.date_format("%H %k %h %I %l %i %p").unwrap(),
            "23 23 11 11 11 12 PM"
        );
        assert_eq!(v.date_format("%r | %T | %S %s %f").unwrap(), "11:12:34 PM | 23:12:34 | 34 34 012345");
        assert_eq!(t(2010, 1, 1, 0, 5, 0, 0).date_format("%r").unwrap(), "12:05:00 AM");
    }

    #[test]
    fn test_literals_and_unknown_tokens() {
        let v = t(2021, 3, 22, 0, 0, 0, 0);
        assert_eq!(v.date_format("%Y-%m-%d %%|%Q|").unwrap(), "2021-03-22 %|Q|");
        assert_eq!(v.date_format("%D").unwrap(), "22nd");
        assert_eq!(t(2021, 3, 3, 0, 0, 0, 0).date_format("%D").unwrap(), "3rd");
        assert_eq!(t(2021, 3, 31, 0, 0, 0, 0).date_format("%D").unwrap(), "31st");
    }

    #[test]
    fn test_zero_month_name_fails() {
        let v = t(2021, 0, 1, 0, 0, 0, 0);
        assert!(v.date_format("%M").is_err());
        assert!(v.date_format("%b").is_err());
        assert_eq!(v.date_format("%m").unwrap(), "00");
    }
}
