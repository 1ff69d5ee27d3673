//! Typed SQL literal values.
//!
//! [`Value`] is what a value expression carries after its literal has been
//! resolved. ENUM and SET members are resolved against their column's
//! member list with [`parse_enum`] and [`parse_set`].

mod enum_value;
mod set_value;
mod value;

pub use enum_value::{parse_enum, parse_enum_name, parse_enum_value, EnumValue};
pub use set_value::{parse_set, parse_set_name, parse_set_value, SetValue};
pub use value::Value;

/// Parses an unsigned integer with an optional base prefix: `0x` (hex),
/// `0o` or a bare leading `0` (octal), `0b` (binary).
pub(crate) fn parse_uint_literal(s: &str) -> Option<u64> {
    let lower = s.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uint_literal() {
        assert_eq!(parse_uint_literal("42"), Some(42));
        assert_eq!(parse_uint_literal("0"), Some(0));
        assert_eq!(parse_uint_literal("0x1F"), Some(31));
        assert_eq!(parse_uint_literal("0b101"), Some(5));
        assert_eq!(parse_uint_literal("0o17"), Some(15));
        assert_eq!(parse_uint_literal("017"), Some(15));
        assert_eq!(parse_uint_literal("09"), None);
        assert_eq!(parse_uint_literal("+1"), None);
        assert_eq!(parse_uint_literal("0x"), None);
        assert_eq!(parse_uint_literal("abc"), None);
        assert_eq!(parse_uint_literal("18446744073709551616"), None);
    }
}
