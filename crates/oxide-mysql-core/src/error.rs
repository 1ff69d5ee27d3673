//! Error types for literal parsing and value conversion.
//!
//! Every variant maps onto a MySQL error number through [`Error::code`], so
//! callers that match on numeric codes see the same values a MySQL server
//! would report.

use std::fmt;

/// Type name used in `datetime` related error messages.
pub const DATETIME_STR: &str = "datetime";
/// Type name used in `date` related error messages.
pub const DATE_STR: &str = "date";
/// Type name used in `time` related error messages.
pub const TIME_STR: &str = "time";
/// Type name used in `timestamp` related error messages.
pub const TIMESTAMP_STR: &str = "timestamp";

/// Errors produced while parsing literals or converting values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A value was accepted after dropping characters or precision.
    #[error("Truncated incorrect {tp} value: '{value}'")]
    TruncatedWrongValue {
        /// Target type name.
        tp: String,
        /// The offending input.
        value: String,
    },

    /// A literal has the wrong shape or an out-of-domain field.
    #[error("Incorrect {tp} value: '{value}'")]
    WrongValue {
        /// Target type name.
        tp: String,
        /// The offending input.
        value: String,
    },

    /// A value is not valid for the function it was passed to.
    #[error("Incorrect {tp} value: '{value}'")]
    IncorrectValue {
        /// Target type name.
        tp: String,
        /// The offending input.
        value: String,
    },

    /// A datetime literal could not be interpreted.
    #[error("Incorrect datetime value: '{0}'")]
    IncorrectDatetimeValue(String),

    /// A constant does not fit into its target type.
    #[error("constant {value} overflows {type_name}")]
    Overflow {
        /// The offending value.
        value: String,
        /// The target type name.
        type_name: String,
    },

    /// A value is outside the range of its target type.
    #[error("{type_name} value is out of range in '{value}'")]
    DataOutOfRange {
        /// The target type name.
        type_name: String,
        /// The offending value.
        value: String,
    },

    /// Data was truncated.
    #[error("{message}")]
    Truncated {
        /// Description of what was truncated.
        message: String,
    },

    /// Out-of-range value stored with clamping.
    #[error("Out of range value for column '{0}'")]
    WarnDataOutOfRange(String),

    /// A datetime function produced a field overflow.
    #[error("Datetime function: {func} field overflow")]
    DatetimeFunctionOverflow {
        /// The overflowing field.
        func: String,
    },

    /// A timestamp falls into a daylight saving time gap.
    #[error(
        "Timestamp is not valid, since it is in Daylight Saving Time transition '{value}' for time zone '{zone}'"
    )]
    TimestampInDstTransition {
        /// The timestamp text.
        value: String,
        /// The time zone name.
        zone: String,
    },

    /// The input is not a valid year format.
    #[error("invalid year format")]
    InvalidYearFormat,

    /// The input is not a valid year.
    #[error("invalid year")]
    InvalidYear,

    /// A binary decimal could not be parsed.
    #[error("Incorrect value: '{0}'")]
    BadNumber(String),

    /// An invalid week mode was given.
    #[error("invalid week mode format: '{0}'")]
    InvalidWeekModeFormat(String),

    /// A value is illegal for the given type.
    #[error("Illegal {tp} '{value}' value found during parsing")]
    IllegalValueForType {
        /// Type name.
        tp: String,
        /// The offending value.
        value: String,
    },

    /// A positive out-of-range integer was cast to its negative complement.
    #[error("Cast to signed converted positive out-of-range integer to it's negative complement")]
    CastAsSignedOverflow,

    /// A negative integer was cast to unsigned.
    #[error("Cast to unsigned converted negative integer to it's positive complement")]
    CastNegIntAsUnsigned,

    /// Division by zero.
    #[error("Division by 0")]
    DivByZero,

    /// A string is longer than its column.
    #[error("Data too long for column '{0}'")]
    DataTooLong(String),

    /// A column specifier is wrong.
    #[error("Incorrect column specifier for column '{0}'")]
    WrongFieldSpec(String),

    /// A statement uses syntax that is not allowed.
    #[error("You have an error in your SQL syntax: {0}")]
    Syntax(String),

    /// A value has the wrong format for a function.
    #[error("Incorrect {tp} value: '{value}' for function {func}")]
    WrongValueForType {
        /// Type name.
        tp: String,
        /// The offending value.
        value: String,
        /// Function name.
        func: String,
    },

    /// Invalid default value for a column.
    #[error("Invalid default value for '{0}'")]
    InvalidDefault(String),

    /// A SET column has too many members.
    #[error("Too many strings for column {0} and SET")]
    TooBigSet(String),

    /// A DECIMAL scale is too large.
    #[error("Too big scale {scale} specified for column '{column}'. Maximum is {max}.")]
    TooBigScale {
        /// Requested scale.
        scale: i64,
        /// Column name.
        column: String,
        /// Allowed maximum.
        max: u64,
    },

    /// A precision (decimal width or fsp) is too large or negative.
    #[error("Too-big precision {fsp} specified for '{column}'. Maximum is {max}.")]
    TooBigPrecision {
        /// Requested precision.
        fsp: i64,
        /// Column or type name.
        column: String,
        /// Allowed maximum.
        max: u64,
    },

    /// Invalid field size.
    #[error("Invalid size for column '{0}'.")]
    InvalidFieldSize(String),

    /// M must be at least D for DECIMAL(M,D).
    #[error("For float(M,D), double(M,D) or decimal(M,D), M must be >= D (column '{0}').")]
    MBiggerThanD(String),

    /// An ENUM/SET definition repeats a member.
    #[error("Column '{column}' has duplicated value '{value}' in {tp}")]
    DuplicatedValueInType {
        /// Column name.
        column: String,
        /// Repeated value.
        value: String,
        /// ENUM or SET.
        tp: String,
    },

    /// Display width out of range.
    #[error("Display width out of range for column '{column}' (max = {max})")]
    TooBigDisplayWidth {
        /// Column name.
        column: String,
        /// Allowed maximum.
        max: u64,
    },

    /// Column length too big.
    #[error("Column length too big for column '{column}' (max = {max}); use BLOB or TEXT instead")]
    TooBigFieldLength {
        /// Column name.
        column: String,
        /// Allowed maximum.
        max: u64,
    },

    /// A SET name or number could not be resolved.
    #[error("{0}")]
    InvalidSetMember(String),

    /// An interval unit is unknown.
    #[error("invalid unit: {0}")]
    InvalidUnit(String),

    /// A charset is not registered.
    #[error("Unknown character set: '{0}'")]
    UnknownCharset(String),

    /// A collation is not registered or does not match its charset.
    #[error("Unknown collation: '{0}'")]
    UnknownCollation(String),

    /// A time zone name could not be resolved.
    #[error("Unknown or incorrect time zone: '{0}'")]
    UnknownTimeZone(String),

    /// A type code does not name a MySQL type.
    #[error("unknown type code {0}")]
    UnknownType(u8),

    /// A context configuration could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A value has no integer bounds because its type is not an integer type.
    #[error("type {0} has no integer bounds")]
    NotIntegerType(String),
}

impl Error {
    /// Creates a [`Error::TruncatedWrongValue`].
    pub fn truncated_wrong_value(tp: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TruncatedWrongValue {
            tp: tp.into(),
            value: value.into(),
        }
    }

    /// Creates a [`Error::WrongValue`].
    pub fn wrong_value(tp: impl Into<String>, value: impl Into<String>) -> Self {
        Self::WrongValue {
            tp: tp.into(),
            value: value.into(),
        }
    }

    /// Creates a [`Error::DataOutOfRange`].
    pub fn out_of_range(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DataOutOfRange {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Creates a [`Error::Truncated`].
    pub fn truncated(message: impl Into<String>) -> Self {
        Self::Truncated {
            message: message.into(),
        }
    }

    /// Creates a [`Error::DatetimeFunctionOverflow`] for the `time` field.
    #[must_use]
    pub fn datetime_overflow() -> Self {
        Self::DatetimeFunctionOverflow {
            func: TIME_STR.to_string(),
        }
    }

    /// Returns the MySQL error number of this error.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::TruncatedWrongValue { .. }
            | Self::WrongValue { .. }
            | Self::IncorrectDatetimeValue(_) => 1292,
            Self::IncorrectValue { .. } => 1525,
            Self::Overflow { .. } | Self::DataOutOfRange { .. } | Self::CastAsSignedOverflow => {
                1690
            }
            Self::Truncated { .. } => 1265,
            Self::WarnDataOutOfRange(_) | Self::CastNegIntAsUnsigned => 1264,
            Self::DatetimeFunctionOverflow { .. } => 1441,
            Self::InvalidYearFormat
            | Self::InvalidYear
            | Self::BadNumber(_)
            | Self::InvalidWeekModeFormat(_)
            | Self::IllegalValueForType { .. } => 1367,
            Self::DivByZero => 1365,
            Self::DataTooLong(_) => 1406,
            Self::WrongFieldSpec(_) => 1063,
            Self::Syntax(_) => 1064,
            Self::WrongValueForType { .. } => 1411,
            Self::InvalidDefault(_) => 1067,
            Self::TooBigSet(_) => 1097,
            Self::TooBigScale { .. } => 1425,
            Self::TooBigPrecision { .. } => 1426,
            Self::InvalidFieldSize(_) => 3013,
            Self::MBiggerThanD(_) => 1427,
            Self::DuplicatedValueInType { .. } => 1291,
            Self::TooBigDisplayWidth { .. } => 1439,
            Self::TooBigFieldLength { .. } => 1074,
            Self::UnknownCharset(_) => 1115,
            Self::UnknownCollation(_) => 1273,
            Self::UnknownTimeZone(_) => 1298,
            Self::TimestampInDstTransition { .. }
            | Self::InvalidSetMember(_)
            | Self::InvalidUnit(_)
            | Self::Config(_)
            | Self::UnknownType(_)
            | Self::NotIntegerType(_) => 1105,
        }
    }

    /// Returns true for errors a [`Context`](crate::context::Context) may
    /// ignore or downgrade to a warning.
    #[must_use]
    pub const fn is_truncate_class(&self) -> bool {
        matches!(
            self.code(),
            1292 | 1406 | 1366 | 1264 | 1690 | 1367 | 1411 | 1441 | 1265
        )
    }
}

/// Result type for parsing and conversion.
pub type Result<T> = std::result::Result<T, Error>;

/// A best-effort value returned together with the error that degraded it.
///
/// Conversions never drop their clamped result on error: the value is
/// carried here so callers may keep it after inspecting the error.
#[derive(Debug, Clone, PartialEq)]
pub struct Lossy<T> {
    /// The clamped or partially parsed value.
    pub value: T,
    /// Why the value is not exact.
    pub error: Error,
}

impl<T> Lossy<T> {
    /// Creates a lossy result.
    pub const fn new(value: T, error: Error) -> Self {
        Self { value, error }
    }

    /// Maps the carried value, keeping the error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lossy<U> {
        Lossy {
            value: f(self.value),
            error: self.error,
        }
    }
}

impl<T> fmt::Display for Lossy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<T: fmt::Debug> std::error::Error for Lossy<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Lossy<T>> for Error {
    fn from(lossy: Lossy<T>) -> Self {
        lossy.error
    }
}

/// Result of a conversion that keeps its value on failure.
pub type LossyResult<T> = std::result::Result<T, Lossy<T>>;

/// Extracts the value of a lossy result, discarding the error.
pub fn lossy_value<T>(res: LossyResult<T>) -> T {
    match res {
        Ok(v) | Err(Lossy { value: v, .. }) => v,
    }
}

/// Splits a lossy result into its value and optional error.
pub fn split_lossy<T>(res: LossyResult<T>) -> (T, Option<Error>) {
    match res {
        Ok(v) => (v, None),
        Err(Lossy { value, error }) => (value, Some(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(Error::wrong_value(DATETIME_STR, "x").code(), 1292);
        assert_eq!(Error::out_of_range("BIGINT", "1e100").code(), 1690);
        assert_eq!(Error::truncated("cut").code(), 1265);
        assert_eq!(Error::datetime_overflow().code(), 1441);
        assert_eq!(
            Error::TimestampInDstTransition {
                value: "x".into(),
                zone: "y".into()
            }
            .code(),
            1105
        );
        assert_eq!(Error::InvalidYear.code(), 1367);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::truncated_wrong_value("DOUBLE", "1a").to_string(),
            "Truncated incorrect DOUBLE value: '1a'"
        );
        assert_eq!(
            Error::wrong_value(TIME_STR, "25:00").to_string(),
            "Incorrect time value: '25:00'"
        );
        assert_eq!(
            Error::out_of_range("BIGINT UNSIGNED", "-1").to_string(),
            "BIGINT UNSIGNED value is out of range in '-1'"
        );
    }

    #[test]
    fn test_truncate_class() {
        assert!(Error::truncated_wrong_value("INTEGER", "1x").is_truncate_class());
        assert!(Error::datetime_overflow().is_truncate_class());
        assert!(!Error::Syntax("x".into()).is_truncate_class());
        assert!(!Error::InvalidSetMember("x".into()).is_truncate_class());
    }

    #[test]
    fn test_lossy() {
        let res: LossyResult<u64> = Err(Lossy::new(7, Error::DivByZero));
        assert_eq!(split_lossy(res.clone()), (7, Some(Error::DivByZero)));
        assert_eq!(lossy_value(res.clone()), 7);
        let err: Error = res.unwrap_err().into();
        assert_eq!(err, Error::DivByZero);
    }
}
