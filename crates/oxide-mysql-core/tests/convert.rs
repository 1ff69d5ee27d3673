//! Numeric conversions under the three truncation policies.

mod common;
use common::*;

use oxide_mysql_core::context::ContextFlags;
use oxide_mysql_core::convert::{
    convert_float_to_int, convert_int_to_uint, str_to_float, str_to_int, str_to_uint,
};
use oxide_mysql_core::error::Error;
use oxide_mysql_core::mysql::MysqlType;

#[test]
fn strict_context_returns_value_and_error() {
    let err = str_to_int(&mut strict(), "12abc", false).unwrap_err();
    assert_eq!(err.value, 12);
    assert_eq!(err.error, Error::truncated_wrong_value("DOUBLE", "12abc"));
    assert_eq!(err.error.code(), 1292);
}

#[test]
fn warning_context_collects() {
    let mut ctx = warn_ctx();
    assert_eq!(str_to_int(&mut ctx, "12abc", false), Ok(12));
    assert_eq!(str_to_int(&mut ctx, "abc", true), Ok(0));
    assert_eq!(ctx.warnings().len(), 2);
}

#[test]
fn ignoring_context_drops() {
    let mut ctx = ctx_from_json(r#"{"ignore_truncate_err": true, "truncate_as_warning": true}"#);
    assert_eq!(str_to_int(&mut ctx, "12abc", false), Ok(12));
    assert!(ctx.warnings().is_empty());
}

#[test]
fn overflow_is_never_downgraded() {
    let mut ctx = warn_ctx();
    let err = str_to_int(&mut ctx, "99999999999999999999", false).unwrap_err();
    assert_eq!(err.value, i64::MAX);
    assert_eq!(err.error.code(), 1690);

    let err = str_to_uint(&mut ctx, "-1", true).unwrap_err();
    assert_eq!(err.value, 0);
    assert_eq!(
        err.error.to_string(),
        "BIGINT UNSIGNED value is out of range in '-1'"
    );
}

#[test]
fn rounding_half_away_from_zero() {
    let mut ctx = strict();
    assert_eq!(str_to_int(&mut ctx, "1.5", false), Ok(2));
    let tp = MysqlType::Tiny;
    assert_eq!(convert_float_to_int(2.5, -128, 127, tp), Ok(3));
    assert_eq!(convert_float_to_int(-128.4, -128, 127, tp), Ok(-128));
}

#[test]
fn negative_to_unsigned_policy() {
    let tp = MysqlType::Longlong;
    let strict_flags = ContextFlags::strict();
    assert_eq!(
        convert_int_to_uint(strict_flags, -1, u64::MAX, tp)
            .unwrap_err()
            .value,
        0
    );
    let wrap = strict_flags.with_allow_negative_to_unsigned(true);
    assert_eq!(convert_int_to_uint(wrap, -1, u64::MAX, tp), Ok(u64::MAX));
}

#[test]
fn float_prefixes() {
    let mut ctx = strict();
    assert_eq!(str_to_float(&mut ctx, "1.5e2", false), Ok(150.0));
    let err = str_to_float(&mut ctx, "-1e400", false).unwrap_err();
    assert_eq!(err.value, -f64::MAX);
}
