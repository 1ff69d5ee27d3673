//! ENUM and SET resolution against column definitions.

mod common;
use common::*;

use oxide_mysql_core::mysql::{FieldType, MysqlType};
use oxide_mysql_core::types::{parse_enum, parse_set, EnumValue, SetValue, Value};

fn column(tp: MysqlType, members: &[&str], collation: &str) -> FieldType {
    FieldType::new(tp)
        .charset("utf8mb4", collation)
        .elems(members.iter().copied())
}

#[test]
fn enum_by_name_follows_collation() {
    let ci = column(MysqlType::Enum, &["small", "medium", "large"], "utf8mb4_general_ci");
    let v = parse_enum(&ci.elems, "LARGE", &ci.collate).unwrap();
    assert_eq!(
        v,
        EnumValue {
            name: "large".into(),
            value: 3
        }
    );

    let bin = column(MysqlType::Enum, &["small", "medium", "large"], "utf8mb4_bin");
    assert!(parse_enum(&bin.elems, "LARGE", &bin.collate).is_err());
}

#[test]
fn enum_by_ordinal() {
    let members = elems(&["a", "b"]);
    assert_eq!(parse_enum(&members, "2", "utf8mb4_bin").unwrap().name, "b");
    let err = parse_enum(&members, "3", "utf8mb4_bin").unwrap_err();
    assert_eq!(err.code(), 1265);
    assert!(parse_enum(&members, "0", "utf8mb4_bin").is_err());
}

#[test]
fn set_members_in_declaration_order() {
    let col = column(MysqlType::Set, &["read", "write", "exec"], "utf8mb4_general_ci");
    let v = parse_set(&col.elems, "EXEC,read", &col.collate).unwrap();
    assert_eq!(
        v,
        SetValue {
            name: "read,exec".into(),
            value: 0b101
        }
    );
    assert_eq!(Value::Set(v).to_string(), "read,exec");
}

#[test]
fn set_rejects_unknown_members_and_bits() {
    let members = elems(&["read", "write"]);
    let err = parse_set(&members, "read,delete", "utf8mb4_bin").unwrap_err();
    assert_eq!(err.to_string(), "item read,delete is not in Set [read write]");
    let err = parse_set(&members, "4", "utf8mb4_bin").unwrap_err();
    assert_eq!(err.to_string(), "invalid number 4 for Set [read write]");
}

#[test]
fn set_by_bitmask() {
    let members = elems(&["read", "write"]);
    let v = parse_set(&members, "3", "utf8mb4_bin").unwrap();
    assert_eq!(v.name, "read,write");
    assert_eq!(parse_set(&members, "", "utf8mb4_bin").unwrap(), SetValue::ZERO);
}

#[test]
fn column_type_renders_members() {
    let col = column(MysqlType::Enum, &["a", "it's"], "utf8mb4_bin");
    assert_eq!(col.to_sql(), "enum('a','it''s')");
}
