//! Per-statement evaluation context.
//!
//! A [`Context`] carries the session time zone, the SQL-mode-like flags that
//! decide how lenient parsing is, and the warnings collected while a
//! statement's literals are converted. It is owned by one statement at a
//! time and is never shared.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Duration as ChronoDuration, FixedOffset, LocalResult, NaiveDateTime, TimeZone,
    Timelike, Utc,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Flags controlling truncation and date validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ContextFlags {
    /// Silently accept truncated values.
    pub ignore_truncate_err: bool,
    /// Accept truncated values and record a warning.
    pub truncate_as_warning: bool,
    /// Accept a zero month or day inside an otherwise valid date.
    pub ignore_zero_in_date: bool,
    /// Accept days that do not exist in their month, e.g. `2021-02-30`.
    pub ignore_invalid_date_err: bool,
    /// Accept `0000-00-00`.
    pub ignore_zero_date_err: bool,
    /// Let negative integers wrap when cast to unsigned.
    pub allow_negative_to_unsigned: bool,
    /// Convert a TIME to YEAR through its numeric form instead of the current date.
    pub cast_time_to_year_through_concat: bool,
    /// Report division by zero as a warning.
    pub divided_by_zero_as_warning: bool,
    /// The statement is an INSERT.
    pub in_insert_stmt: bool,
    /// The statement is an UPDATE.
    pub in_update_stmt: bool,
    /// The statement is a DELETE.
    pub in_delete_stmt: bool,
    /// The statement is a SELECT.
    pub in_select_stmt: bool,
}

impl ContextFlags {
    /// Flags for strict mode: every truncation is an error.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            ignore_truncate_err: false,
            truncate_as_warning: false,
            ignore_zero_in_date: false,
            ignore_invalid_date_err: false,
            ignore_zero_date_err: false,
            allow_negative_to_unsigned: false,
            cast_time_to_year_through_concat: false,
            divided_by_zero_as_warning: false,
            in_insert_stmt: false,
            in_update_stmt: false,
            in_delete_stmt: false,
            in_select_stmt: false,
        }
    }

    /// Sets whether truncation errors are ignored.
    #[must_use]
    pub const fn with_ignore_truncate_err(mut self, v: bool) -> Self {
        self.ignore_truncate_err = v;
        self
    }

    /// Sets whether truncation errors become warnings.
    #[must_use]
    pub const fn with_truncate_as_warning(mut self, v: bool) -> Self {
        self.truncate_as_warning = v;
        self
    }

    /// Sets whether a zero month or day is accepted.
    #[must_use]
    pub const fn with_ignore_zero_in_date(mut self, v: bool) -> Self {
        self.ignore_zero_in_date = v;
        self
    }

    /// Sets whether nonexistent days are accepted.
    #[must_use]
    pub const fn with_ignore_invalid_date_err(mut self, v: bool) -> Self {
        self.ignore_invalid_date_err = v;
        self
    }

    /// Sets whether the zero date is accepted.
    #[must_use]
    pub const fn with_ignore_zero_date_err(mut self, v: bool) -> Self {
        self.ignore_zero_date_err = v;
        self
    }

    /// Sets whether negative values may wrap to unsigned.
    #[must_use]
    pub const fn with_allow_negative_to_unsigned(mut self, v: bool) -> Self {
        self.allow_negative_to_unsigned = v;
        self
    }

    /// Sets how TIME converts to YEAR.
    #[must_use]
    pub const fn with_cast_time_to_year_through_concat(mut self, v: bool) -> Self {
        self.cast_time_to_year_through_concat = v;
        self
    }

    /// Sets whether division by zero is a warning.
    #[must_use]
    pub const fn with_divided_by_zero_as_warning(mut self, v: bool) -> Self {
        self.divided_by_zero_as_warning = v;
        self
    }
}

/// The time zone a context interprets wall-clock values in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Location {
    /// Coordinated Universal Time.
    #[default]
    Utc,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
    /// The operating system's local zone, including DST rules.
    Local,
}

impl Location {
    /// Creates a fixed-offset location from seconds east of UTC.
    pub fn fixed(seconds: i32) -> Result<Self> {
        FixedOffset::east_opt(seconds)
            .map(Self::Fixed)
            .ok_or_else(|| Error::UnknownTimeZone(seconds.to_string()))
    }

    /// Resolves a wall-clock time in this zone to a UTC instant.
    ///
    /// An ambiguous wall-clock time resolves to its earliest instant. A time
    /// inside a forward DST gap is an error.
    pub fn to_utc(&self, local: NaiveDateTime) -> Result<NaiveDateTime> {
        match self {
            Self::Utc => Ok(local),
            Self::Fixed(offset) => Ok(local - ChronoDuration::seconds(i64::from(offset.local_minus_utc()))),
            Self::Local => match chrono::Local.from_local_datetime(&local) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.naive_utc()),
                LocalResult::None => Err(Error::TimestampInDstTransition {
                    value: local.format("%Y-%m-%d %H:%M:%S").to_string(),
                    zone: self.to_string(),
                }),
            },
        }
    }

    /// Converts a UTC instant to wall-clock time in this zone.
    #[must_use]
    pub fn from_utc(&self, utc: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Utc => utc,
            Self::Fixed(offset) => offset.from_utc_datetime(&utc).naive_local(),
            Self::Local => chrono::Local.from_utc_datetime(&utc).naive_local(),
        }
    }

    /// Like [`Location::to_utc`], but a time inside a DST gap is moved to the
    /// end of the gap. Gaps longer than four hours are still an error.
    pub fn adjusted_to_utc(&self, local: NaiveDateTime) -> Result<NaiveDateTime> {
        let err = match self.to_utc(local) {
            Ok(utc) => return Ok(utc),
            Err(e) => e,
        };
        let mut probe = local.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(local);
        for _ in 0..(4 * 60) {
            probe += ChronoDuration::minutes(1);
            if let Ok(utc) = self.to_utc(probe) {
                debug!(from = %local, to = %probe, "moved timestamp out of DST gap");
                return Ok(utc);
            }
        }
        Err(err)
    }

    /// Returns the current wall-clock time in this zone.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        let utc: DateTime<Utc> = Utc::now();
        self.from_utc(utc.naive_utc())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("UTC"),
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Local => f.write_str("Local"),
        }
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "+00:00" || trimmed == "Z" {
            return Ok(Self::Utc);
        }
        if trimmed.eq_ignore_ascii_case("system") || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        let bytes = trimmed.as_bytes();
        if bytes.len() == 6 && (bytes[0] == b'+' || bytes[0] == b'-') && bytes[3] == b':' {
            let hours: i32 = trimmed[1..3]
                .parse()
                .map_err(|_| Error::UnknownTimeZone(s.to_string()))?;
            let minutes: i32 = trimmed[4..6]
                .parse()
                .map_err(|_| Error::UnknownTimeZone(s.to_string()))?;
            if hours > 14 || minutes > 59 {
                return Err(Error::UnknownTimeZone(s.to_string()));
            }
            let secs = hours * 3600 + minutes * 60;
            return Self::fixed(if bytes[0] == b'-' { -secs } else { secs });
        }
        Err(Error::UnknownTimeZone(s.to_string()))
    }
}

/// Per-statement configuration and warning sink.
#[derive(Debug, Clone, Default)]
pub struct Context {
    flags: ContextFlags,
    location: Location,
    warnings: Vec<Error>,
}

impl Context {
    /// Creates a context with the given flags and time zone.
    #[must_use]
    pub const fn new(flags: ContextFlags, location: Location) -> Self {
        Self {
            flags,
            location,
            warnings: Vec::new(),
        }
    }

    /// Creates a strict UTC context.
    #[must_use]
    pub const fn strict() -> Self {
        Self::new(ContextFlags::strict(), Location::Utc)
    }

    /// Returns the flags.
    #[must_use]
    pub const fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// Returns the time zone.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Replaces the flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: ContextFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replaces the time zone.
    #[must_use]
    pub const fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Records a warning.
    pub fn append_warning(&mut self, err: Error) {
        debug!(code = err.code(), warning = %err, "appending warning");
        self.warnings.push(err);
    }

    /// Returns the warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    /// Drains the collected warnings.
    pub fn take_warnings(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.warnings)
    }

    /// Applies the truncation policy to `err`.
    ///
    /// Errors outside the truncation class are returned unchanged. Truncation
    /// errors are dropped, recorded as warnings, or returned, depending on
    /// the flags.
    pub fn handle_truncate(&mut self, err: Error) -> Result<()> {
        if !err.is_truncate_class() {
            return Err(err);
        }
        if self.flags.ignore_truncate_err {
            return Ok(());
        }
        if self.flags.truncate_as_warning {
            self.append_warning(err);
            return Ok(());
        }
        Err(err)
    }
}

/// Serializable description of a [`Context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// `UTC`, `SYSTEM` or a fixed offset such as `+08:00`.
    pub time_zone: String,
    /// Context flags.
    #[serde(flatten)]
    pub flags: ContextFlags,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            flags: ContextFlags::default(),
        }
    }
}

impl ContextConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Builds a fresh context.
    pub fn build(&self) -> Result<Context> {
        let location: Location = self.time_zone.parse()?;
        Ok(Context::new(self.flags, location))
    }
}
