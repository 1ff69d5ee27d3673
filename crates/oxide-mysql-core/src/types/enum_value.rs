//! ENUM values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::parse_uint_literal;
use crate::charset::collator_for;
use crate::error::{Error, Result};

/// A resolved ENUM member: its name and 1-based ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    /// The member name as declared.
    pub name: String,
    /// 1-based position in the member list. 0 is the empty value.
    pub value: u64,
}

impl EnumValue {
    /// The ordinal as a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_number(&self) -> f64 {
        self.value as f64
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn not_in_enum(elems: &[String], name: &str) -> Error {
    Error::truncated(format!(
        "convert to MySQL enum failed: item {name} is not in enum [{}]",
        elems.join(" ")
    ))
}

/// Resolves `name` against `elems`, first by name under `collation`, then
/// as an ordinal.
pub fn parse_enum(elems: &[String], name: &str, collation: &str) -> Result<EnumValue> {
    if let Ok(v) = parse_enum_name(elems, name, collation) {
        return Ok(v);
    }
    match parse_uint_literal(name) {
        Some(number) => parse_enum_value(elems, number),
        None => Err(not_in_enum(elems, name)),
    }
}

/// Resolves `name` by comparing it with each member under `collation`.
pub fn parse_enum_name(elems: &[String], name: &str, collation: &str) -> Result<EnumValue> {
    let collator = collator_for(collation);
    elems
        .iter()
        .position(|elem| collator.compare(elem, name).is_eq())
        .map(|i| EnumValue {
            name: elems[i].clone(),
            value: i as u64 + 1,
        })
        .ok_or_else(|| not_in_enum(elems, name))
}

/// Resolves a 1-based ordinal.
pub fn parse_enum_value(elems: &[String], number: u64) -> Result<EnumValue> {
    let index = usize::try_from(number).unwrap_or(usize::MAX);
    if number == 0 || index > elems.len() {
        return Err(Error::truncated(format!(
            "convert to MySQL enum failed: number {number} overflow enum boundary [1, {}]",
            elems.len()
        )));
    }
    Ok(EnumValue {
        name: elems[index - 1].clone(),
        value: number,
    })
}
