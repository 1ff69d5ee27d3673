//! SET values.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::parse_uint_literal;
use crate::charset::collator_for;
use crate::error::{Error, Result};

/// A resolved SET: the comma-joined member names and their bitmask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetValue {
    /// Members in declaration order, joined with `,`.
    pub name: String,
    /// Bit `i` is set when member `i` is present.
    pub value: u64,
}

impl SetValue {
    /// The empty set.
    pub const ZERO: Self = Self {
        name: String::new(),
        value: 0,
    };

    /// The bitmask as a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_number(&self) -> f64 {
        self.value as f64
    }
}

impl fmt::Display for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn not_in_set(elems: &[String], name: &str) -> Error {
    Error::InvalidSetMember(format!("item {name} is not in Set [{}]", elems.join(" ")))
}

/// Resolves `name` against `elems`, first as a comma-separated member
/// list under `collation`, then as a bitmask.
pub fn parse_set(elems: &[String], name: &str, collation: &str) -> Result<SetValue> {
    if let Ok(v) = parse_set_name(elems, name, collation) {
        return Ok(v);
    }
    match parse_uint_literal(name) {
        Some(number) => parse_set_value(elems, number),
        None => Err(not_in_set(elems, name)),
    }
}

/// Resolves a comma-separated member list. Order and duplicates in `name`
/// do not matter; every item must name a member.
pub fn parse_set_name(elems: &[String], name: &str, collation: &str) -> Result<SetValue> {
    if name.is_empty() {
        return Ok(SetValue::ZERO);
    }
    let collator = collator_for(collation);
    let mut wanted: HashSet<Vec<u8>> = name.split(',').map(|s| collator.key(s)).collect();

    let mut items = Vec::new();
    let mut value = 0u64;
    for (i, elem) in elems.iter().enumerate().take(64) {
        if wanted.remove(&collator.key(elem)) {
            value |= 1 << i;
            items.push(elem.as_str());
        }
    }
    if !wanted.is_empty() {
        return Err(not_in_set(elems, name));
    }
    Ok(SetValue {
        name: items.join(","),
        value,
    })
}

/// Resolves a bitmask. Bits without a member are rejected.
pub fn parse_set_value(elems: &[String], number: u64) -> Result<SetValue> {
    if number == 0 {
        return Ok(SetValue::ZERO);
    }
    let mut rest = number;
    let mut items = Vec::new();
    for (i, elem) in elems.iter().enumerate().take(64) {
        let bit = 1u64 << i;
        if rest & bit != 0 {
            items.push(elem.as_str());
            rest &= !bit;
        }
    }
    if rest != 0 {
        return Err(Error::InvalidSetMember(format!(
            "invalid number {rest} for Set [{}]",
            elems.join(" ")
        )));
    }
    Ok(SetValue {
        name: items.join(","),
        value: number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elems() -> Vec<String> {
        ["a", "b", "c"].iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_set_name_order_independent() {
        let v = parse_set(&elems(), "c,A", "utf8mb4_general_ci").unwrap();
        assert_eq!(v.name, "a,c");
        assert_eq!(v.value, 0b101);
    }

    #[test]
    fn test_parse_set_name_duplicates_collapse() {
        let v = parse_set_name(&elems(), "b,b", "utf8mb4_bin").unwrap();
        assert_eq!(v, SetValue { name: "b".into(), value: 0b10 });
    }

    #[test]
    fn test_parse_set_empty() {
        assert_eq!(parse_set(&elems(), "", "").unwrap(), SetValue::ZERO);
        assert_eq!(parse_set_value(&elems(), 0).unwrap(), SetValue::ZERO);
    }

    #[test]
    fn test_parse_set_unmatched_item() {
        let err = parse_set(&elems(), "a,d", "").unwrap_err();
        assert_eq!(err.to_string(), "item a,d is not in Set [a b c]");
        assert!(parse_set(&elems(), "A", "utf8mb4_bin").is_err());
    }

    #[test]
    fn test_parse_set_by_number() {
        let v = parse_set(&elems(), "3", "").unwrap();
        assert_eq!(v, SetValue { name: "a,b".into(), value: 3 });
        let err = parse_set_value(&elems(), 0b1001).unwrap_err();
        assert_eq!(err.to_string(), "invalid number 8 for Set [a b c]");
    }
}
