//! The literal value enum.

use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::{EnumValue, SetValue};
use crate::charset::{CHARSET_BIN, COLLATION_BIN};
use crate::mysql::{FieldType, MysqlType};
use crate::temporal::{Duration, Time};

/// A resolved SQL literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Double precision float.
    Float(f64),
    /// Character string.
    String(String),
    /// Binary string.
    Bytes(Vec<u8>),
    /// Exact decimal.
    Decimal(BigDecimal),
    /// DATE, DATETIME or TIMESTAMP.
    Time(Time),
    /// TIME.
    Duration(Duration),
    /// ENUM member.
    Enum(EnumValue),
    /// SET members.
    Set(SetValue),
}

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the type code of the value.
    #[must_use]
    pub const fn mysql_type(&self) -> MysqlType {
        match self {
            Self::Null => MysqlType::Null,
            Self::Int(_) | Self::Uint(_) => MysqlType::Longlong,
            Self::Float(_) => MysqlType::Double,
            Self::String(_) => MysqlType::VarString,
            Self::Bytes(_) => MysqlType::Blob,
            Self::Decimal(_) => MysqlType::NewDecimal,
            Self::Time(t) => t.tp().mysql_type(),
            Self::Duration(_) => MysqlType::Duration,
            Self::Enum(_) => MysqlType::Enum,
            Self::Set(_) => MysqlType::Set,
        }
    }

    /// Returns the field type a literal of this value gets.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        let ft = FieldType::new(self.mysql_type());
        match self {
            Self::Uint(_) => ft.unsigned(),
            Self::Time(t) => ft.decimal(u8::try_from(t.fsp()).unwrap_or_default()),
            Self::Duration(d) => ft.decimal(u8::try_from(d.fsp()).unwrap_or_default()),
            Self::Bytes(_) => ft.charset(CHARSET_BIN, COLLATION_BIN),
            _ => ft,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Decimal(d) => f.write_str(&d.to_plain_string()),
            Self::Time(t) => write!(f, "{t}"),
            Self::Duration(d) => write!(f, "{d}"),
            Self::Enum(e) => write!(f, "{e}"),
            Self::Set(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<Time> for Value {
    fn from(v: Time) -> Self {
        Self::Time(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Self::Duration(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::from(-3i64).to_string(), "-3");
        assert_eq!(Value::from(1.5f64).to_string(), "1.5");
        assert_eq!(Value::from(1e20f64).to_string(), "100000000000000000000");
        assert_eq!(Value::Bytes(b"ab".to_vec()).to_string(), "ab");
        let dec = BigDecimal::from_str("12.340").unwrap();
        assert_eq!(Value::from(dec).to_string(), "12.340");
        let set = SetValue {
            name: "a,b".into(),
            value: 3,
        };
        assert_eq!(Value::Set(set).to_string(), "a,b");
    }

    #[test]
    fn test_field_type() {
        assert!(Value::Uint(1).field_type().is_unsigned());
        assert!(!Value::Int(1).field_type().is_unsigned());
        assert_eq!(Value::Float(1.0).mysql_type(), MysqlType::Double);
        assert_eq!(Value::from("x").mysql_type(), MysqlType::VarString);
        let d = Duration::new(1, 2, 3, 400_000, 3);
        assert_eq!(Value::from(d).field_type().decimal, Some(3));
    }

    #[test]
    fn test_from_option() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some(7i64)), Value::Int(7));
    }
}
