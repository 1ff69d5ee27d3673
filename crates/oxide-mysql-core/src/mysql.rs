//! MySQL column type codes, field types and type-level constants.

use core::fmt;

use crate::error::{Error, Result};

/// Largest fractional-seconds precision.
pub const MAX_FSP: i32 = 6;
/// Smallest fractional-seconds precision.
pub const MIN_FSP: i32 = 0;
/// Precision used when none is given.
pub const DEFAULT_FSP: i32 = 0;
/// Marker for "no precision given".
pub const UNSPECIFIED_FSP: i32 = -1;
/// Largest signed 24-bit integer.
pub const MAX_INT24: i64 = (1 << 23) - 1;
/// Smallest signed 24-bit integer.
pub const MIN_INT24: i64 = -(1 << 23);
/// Largest unsigned 24-bit integer.
pub const MAX_UINT24: u64 = (1 << 24) - 1;

/// Column is NOT NULL.
pub const NOT_NULL_FLAG: u32 = 1;
/// Column is UNSIGNED.
pub const UNSIGNED_FLAG: u32 = 1 << 5;
/// Column is BINARY.
pub const BINARY_FLAG: u32 = 1 << 7;

/// The wire type code of a MySQL column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MysqlType {
    /// Old-style DECIMAL, also used for "unspecified".
    Decimal = 0,
    /// TINYINT.
    Tiny = 1,
    /// SMALLINT.
    Short = 2,
    /// INT.
    Long = 3,
    /// FLOAT.
    Float = 4,
    /// DOUBLE.
    Double = 5,
    /// NULL.
    Null = 6,
    /// TIMESTAMP.
    Timestamp = 7,
    /// BIGINT.
    Longlong = 8,
    /// MEDIUMINT.
    Int24 = 9,
    /// DATE.
    Date = 10,
    /// TIME.
    Duration = 11,
    /// DATETIME.
    Datetime = 12,
    /// YEAR.
    Year = 13,
    /// Internal DATE.
    NewDate = 14,
    /// VARCHAR.
    Varchar = 15,
    /// BIT.
    Bit = 16,
    /// JSON.
    Json = 0xf5,
    /// DECIMAL.
    NewDecimal = 0xf6,
    /// ENUM.
    Enum = 0xf7,
    /// SET.
    Set = 0xf8,
    /// TINYBLOB.
    TinyBlob = 0xf9,
    /// MEDIUMBLOB.
    MediumBlob = 0xfa,
    /// LONGBLOB.
    LongBlob = 0xfb,
    /// BLOB.
    Blob = 0xfc,
    /// VAR_STRING.
    VarString = 0xfd,
    /// CHAR.
    String = 0xfe,
    /// GEOMETRY.
    Geometry = 0xff,
}

impl MysqlType {
    /// Returns the lower-case SQL name of the type.
    #[must_use]
    pub const fn type_str(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::Tiny => "tinyint",
            Self::Short => "smallint",
            Self::Long => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Null => "null",
            Self::Timestamp => "timestamp",
            Self::Longlong => "bigint",
            Self::Int24 => "mediumint",
            Self::Date | Self::NewDate => "date",
            Self::Duration => "time",
            Self::Datetime => "datetime",
            Self::Year => "year",
            Self::Varchar => "varchar",
            Self::Json => "json",
            Self::Decimal | Self::NewDecimal => "decimal",
            Self::Enum => "enum",
            Self::Set => "set",
            Self::TinyBlob => "tinyblob",
            Self::MediumBlob => "mediumblob",
            Self::LongBlob => "longblob",
            Self::Blob => "blob",
            Self::VarString => "var_string",
            Self::String => "char",
            Self::Geometry => "geometry",
        }
    }

    /// TINYBLOB, BLOB, MEDIUMBLOB or LONGBLOB.
    #[must_use]
    pub const fn is_blob(self) -> bool {
        matches!(
            self,
            Self::TinyBlob | Self::MediumBlob | Self::Blob | Self::LongBlob
        )
    }

    /// CHAR or VARCHAR.
    #[must_use]
    pub const fn is_char(self) -> bool {
        matches!(self, Self::String | Self::Varchar)
    }

    /// VARCHAR or VAR_STRING.
    #[must_use]
    pub const fn is_varchar(self) -> bool {
        matches!(self, Self::VarString | Self::Varchar)
    }

    /// Types that carry fractional seconds.
    #[must_use]
    pub const fn is_fractionable(self) -> bool {
        matches!(self, Self::Datetime | Self::Duration | Self::Timestamp)
    }

    /// Types that carry a calendar date.
    #[must_use]
    pub const fn is_time(self) -> bool {
        matches!(self, Self::Datetime | Self::Date | Self::Timestamp)
    }

    /// Integer types, YEAR included.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Tiny | Self::Short | Self::Int24 | Self::Long | Self::Longlong | Self::Year
        )
    }

    /// Numeric types.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Bit
                | Self::Tiny
                | Self::Int24
                | Self::Long
                | Self::Longlong
                | Self::NewDecimal
                | Self::Float
                | Self::Double
                | Self::Short
        )
    }

    /// Temporal types, TIME included.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Duration | Self::Datetime | Self::Timestamp | Self::Date | Self::NewDate
        )
    }

    /// Character and blob types.
    #[must_use]
    pub const fn is_string(self) -> bool {
        self.is_char() || self.is_blob() || self.is_varchar()
    }

    /// Largest unsigned value of an integer-like type.
    pub fn integer_unsigned_upper_bound(self) -> Result<u64> {
        match self {
            Self::Tiny => Ok(u64::from(u8::MAX)),
            Self::Short | Self::Enum => Ok(u64::from(u16::MAX)),
            Self::Int24 => Ok(MAX_UINT24),
            Self::Long => Ok(u64::from(u32::MAX)),
            Self::Longlong | Self::Bit | Self::Set => Ok(u64::MAX),
            _ => Err(Error::NotIntegerType(self.type_str().to_string())),
        }
    }

    /// Largest signed value of an integer-like type.
    pub fn integer_signed_upper_bound(self) -> Result<i64> {
        match self {
            Self::Tiny => Ok(i64::from(i8::MAX)),
            Self::Short => Ok(i64::from(i16::MAX)),
            Self::Int24 => Ok(MAX_INT24),
            Self::Long => Ok(i64::from(i32::MAX)),
            Self::Longlong => Ok(i64::MAX),
            Self::Enum => Ok(65535),
            _ => Err(Error::NotIntegerType(self.type_str().to_string())),
        }
    }

    /// Smallest signed value of an integer-like type.
    pub fn integer_signed_lower_bound(self) -> Result<i64> {
        match self {
            Self::Tiny => Ok(i64::from(i8::MIN)),
            Self::Short => Ok(i64::from(i16::MIN)),
            Self::Int24 => Ok(MIN_INT24),
            Self::Long => Ok(i64::from(i32::MIN)),
            Self::Longlong => Ok(i64::MIN),
            Self::Enum => Ok(0),
            _ => Err(Error::NotIntegerType(self.type_str().to_string())),
        }
    }
}

impl TryFrom<u8> for MysqlType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        let tp = match code {
            0 => Self::Decimal,
            1 => Self::Tiny,
            2 => Self::Short,
            3 => Self::Long,
            4 => Self::Float,
            5 => Self::Double,
            6 => Self::Null,
            7 => Self::Timestamp,
            8 => Self::Longlong,
            9 => Self::Int24,
            10 => Self::Date,
            11 => Self::Duration,
            12 => Self::Datetime,
            13 => Self::Year,
            14 => Self::NewDate,
            15 => Self::Varchar,
            16 => Self::Bit,
            0xf5 => Self::Json,
            0xf6 => Self::NewDecimal,
            0xf7 => Self::Enum,
            0xf8 => Self::Set,
            0xf9 => Self::TinyBlob,
            0xfa => Self::MediumBlob,
            0xfb => Self::LongBlob,
            0xfc => Self::Blob,
            0xfd => Self::VarString,
            0xfe => Self::String,
            0xff => Self::Geometry,
            other => return Err(Error::UnknownType(other)),
        };
        Ok(tp)
    }
}

impl fmt::Display for MysqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_str())
    }
}

/// The evaluation class of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalType {
    /// Signed or unsigned integer.
    Int,
    /// Floating point.
    Real,
    /// Fixed-point decimal.
    Decimal,
    /// Character or binary string.
    String,
    /// DATE or DATETIME.
    Datetime,
    /// TIMESTAMP.
    Timestamp,
    /// TIME.
    Duration,
    /// JSON document.
    Json,
}

impl EvalType {
    /// Returns true for [`EvalType::String`].
    #[must_use]
    pub const fn is_string_kind(self) -> bool {
        matches!(self, Self::String)
    }
}

/// Full type information of an expression or column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    /// Type code.
    pub tp: MysqlType,
    /// Column flags (`UNSIGNED_FLAG`, ...).
    pub flag: u32,
    /// Display length, or `None` when unspecified.
    pub flen: Option<u32>,
    /// Decimal digits or fsp, or `None` when unspecified.
    pub decimal: Option<u8>,
    /// Charset name.
    pub charset: String,
    /// Collation name.
    pub collate: String,
    /// ENUM/SET members.
    pub elems: Vec<String>,
}

impl FieldType {
    /// Creates a field type with unspecified length and scale.
    #[must_use]
    pub const fn new(tp: MysqlType) -> Self {
        Self {
            tp,
            flag: 0,
            flen: None,
            decimal: None,
            charset: String::new(),
            collate: String::new(),
            elems: Vec::new(),
        }
    }

    /// Sets the display length.
    #[must_use]
    pub const fn flen(mut self, flen: u32) -> Self {
        self.flen = Some(flen);
        self
    }

    /// Sets the scale or fsp.
    #[must_use]
    pub const fn decimal(mut self, decimal: u8) -> Self {
        self.decimal = Some(decimal);
        self
    }

    /// Marks the type as UNSIGNED.
    #[must_use]
    pub const fn unsigned(mut self) -> Self {
        self.flag |= UNSIGNED_FLAG;
        self
    }

    /// Sets charset and collation.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>, collate: impl Into<String>) -> Self {
        self.charset = charset.into();
        self.collate = collate.into();
        self
    }

    /// Sets ENUM/SET members.
    #[must_use]
    pub fn elems<I, S>(mut self, elems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elems = elems.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true when the UNSIGNED flag is set.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        self.flag & UNSIGNED_FLAG != 0
    }

    /// Returns true for a string type using the binary collation.
    #[must_use]
    pub fn is_binary_str(&self) -> bool {
        self.collate == crate::charset::COLLATION_BIN && self.tp.is_string()
    }

    /// Returns the evaluation class of this type.
    #[must_use]
    pub const fn eval_type(&self) -> EvalType {
        match self.tp {
            MysqlType::Tiny
            | MysqlType::Short
            | MysqlType::Int24
            | MysqlType::Long
            | MysqlType::Longlong
            | MysqlType::Bit
            | MysqlType::Year => EvalType::Int,
            MysqlType::Float | MysqlType::Double => EvalType::Real,
            MysqlType::Decimal | MysqlType::NewDecimal => EvalType::Decimal,
            MysqlType::Date | MysqlType::NewDate | MysqlType::Datetime => EvalType::Datetime,
            MysqlType::Timestamp => EvalType::Timestamp,
            MysqlType::Duration => EvalType::Duration,
            MysqlType::Json => EvalType::Json,
            MysqlType::Null
            | MysqlType::Varchar
            | MysqlType::Enum
            | MysqlType::Set
            | MysqlType::TinyBlob
            | MysqlType::MediumBlob
            | MysqlType::LongBlob
            | MysqlType::Blob
            | MysqlType::VarString
            | MysqlType::String
            | MysqlType::Geometry => EvalType::String,
        }
    }

    /// Returns the SQL representation of the type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = self.tp.type_str().to_string();
        match self.tp {
            MysqlType::Enum | MysqlType::Set => {
                let members: Vec<String> = self
                    .elems
                    .iter()
                    .map(|e| format!("'{}'", e.replace('\'', "''")))
                    .collect();
                sql.push('(');
                sql.push_str(&members.join(","));
                sql.push(')');
            }
            _ => match (self.flen, self.decimal) {
                (Some(flen), Some(dec)) if self.tp.is_numeric() => {
                    sql.push_str(&format!("({flen},{dec})"));
                }
                (_, Some(fsp)) if self.tp.is_fractionable() => {
                    sql.push_str(&format!("({fsp})"));
                }
                (Some(flen), _) => sql.push_str(&format!("({flen})")),
                _ => {}
            },
        }
        if self.is_unsigned() && self.tp.is_numeric() {
            sql.push_str(" UNSIGNED");
        }
        sql
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::new(MysqlType::Null)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        assert_eq!(MysqlType::Json as u8, 0xf5);
        assert_eq!(MysqlType::try_from(12), Ok(MysqlType::Datetime));
        assert!(MysqlType::try_from(100).is_err());
        assert_eq!(MysqlType::Duration.to_string(), "time");
    }

    #[test]
    fn test_predicates() {
        assert!(MysqlType::Year.is_integer());
        assert!(!MysqlType::Year.is_numeric());
        assert!(MysqlType::Duration.is_temporal());
        assert!(!MysqlType::Duration.is_time());
        assert!(MysqlType::Timestamp.is_fractionable());
        assert!(MysqlType::Blob.is_string());
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(MysqlType::Tiny.integer_unsigned_upper_bound(), Ok(255));
        assert_eq!(MysqlType::Int24.integer_signed_upper_bound(), Ok(8_388_607));
        assert_eq!(MysqlType::Int24.integer_signed_lower_bound(), Ok(-8_388_608));
        assert_eq!(MysqlType::Enum.integer_signed_lower_bound(), Ok(0));
        assert_eq!(MysqlType::Set.integer_unsigned_upper_bound(), Ok(u64::MAX));
        assert!(MysqlType::Varchar.integer_signed_upper_bound().is_err());
    }

    #[test]
    fn test_field_type_to_sql() {
        assert_eq!(
            FieldType::new(MysqlType::NewDecimal).flen(10).decimal(2).to_string(),
            "decimal(10,2)"
        );
        assert_eq!(
            FieldType::new(MysqlType::Datetime).decimal(3).to_string(),
            "datetime(3)"
        );
        assert_eq!(
            FieldType::new(MysqlType::Long).unsigned().to_string(),
            "int UNSIGNED"
        );
        assert_eq!(
            FieldType::new(MysqlType::Enum).elems(["a", "b"]).to_string(),
            "enum('a','b')"
        );
        assert_eq!(FieldType::new(MysqlType::Set).eval_type(), EvalType::String);
    }
}
