//! Temporal literals parsed under contexts built from configuration.

mod common;
use common::*;

use bigdecimal::BigDecimal;
use oxide_mysql_core::error::Error;
use oxide_mysql_core::temporal::{
    parse_duration, parse_time, CoreTime, Duration, Time, TimeType,
};
use oxide_mysql_core::types::Value;

#[test]
fn datetime_round_trips_through_display() {
    for s in [
        "2020-01-01 12:00:00.123456",
        "1999-12-31 23:59:59.5",
        "2000-02-29 00:00:00",
    ] {
        let fsp = oxide_mysql_core::temporal::get_fsp(s);
        assert_eq!(datetime(s, fsp).to_string(), s);
    }
}

#[test]
fn compact_and_delimited_agree() {
    assert_eq!(datetime("20200102030405", 0), datetime("2020-01-02 03:04:05", 0));
    assert_eq!(datetime("200102030405", 0), datetime("2020/01/02 03:04:05", 0));
}

#[test]
fn timezone_suffix_uses_configured_location() {
    let mut ctx = ctx_from_json(r#"{"time_zone": "+01:00"}"#);
    let t = parse_time(&mut ctx, "2020-10-10 10:10:10Z", TimeType::Datetime, 0).unwrap();
    assert_eq!(t.to_string(), "2020-10-10 11:10:10");
}

#[test]
fn extra_groups_warn_when_configured() {
    let mut ctx = ctx_from_json(r#"{"truncate_as_warning": true}"#);
    let t = parse_time(
        &mut ctx,
        "2020-05-28 23:59:59 00:00:00",
        TimeType::Datetime,
        0,
    )
    .unwrap();
    assert_eq!(t.to_string(), "2020-05-28 23:59:59");
    let warnings = ctx.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code(), 1292);
}

#[test]
fn invalid_dates_are_rejected_unless_relaxed() {
    let err = parse_time(&mut strict(), "2020-00-10", TimeType::Date, 0).unwrap_err();
    assert_eq!(err.error.code(), 1292);

    let mut relaxed = ctx_from_json(r#"{"ignore_zero_in_date": true}"#);
    let t = parse_time(&mut relaxed, "2020-00-10", TimeType::Date, 0).unwrap();
    assert_eq!(t.to_string(), "2020-00-10");
}

#[test]
fn timestamp_range() {
    let t = parse_time(&mut strict(), "2038-01-19 03:14:07", TimeType::Timestamp, 0).unwrap();
    assert_eq!(t.tp(), TimeType::Timestamp);
    let err = parse_time(&mut strict(), "1969-12-31 23:59:59", TimeType::Timestamp, 0)
        .unwrap_err();
    assert!(err.value.is_zero());
}

#[test]
fn bad_fsp_is_rejected() {
    let err = parse_time(&mut strict(), "2020-01-01", TimeType::Datetime, 7).unwrap_err();
    assert_eq!(err.error.code(), 1426);
}

#[test]
fn duration_literals() {
    let d = parse_duration(&mut strict(), "1 10:11:12", 0).unwrap();
    assert_eq!(d, Duration::new(34, 11, 12, 0, 0));
    assert_eq!(d.to_string(), "34:11:12");

    let d = parse_duration(&mut strict(), "-12:34:56.789", 3).unwrap();
    assert_eq!(d.to_string(), "-12:34:56.789");
}

#[test]
fn duration_clamps_to_range() {
    let err = parse_duration(&mut strict(), "839:00:00", 0).unwrap_err();
    assert_eq!(err.value.map(|d| d.to_string()).as_deref(), Some("838:59:59"));
    assert_eq!(err.error.code(), 1292);
}

#[test]
fn duration_garbage_is_null() {
    let err = parse_duration(&mut strict(), "abc", 0).unwrap_err();
    assert!(err.value.is_none());
    assert!(matches!(err.error, Error::TruncatedWrongValue { .. }));
}

#[test]
fn temporal_values_carry_their_type() {
    let v = Value::from(datetime("2020-01-02 03:04:05.5", 1));
    assert_eq!(v.field_type().decimal, Some(1));
    assert_eq!(v.to_string(), "2020-01-02 03:04:05.5");
}

#[test]
fn duration_day_prefix_overflow_clamps() {
    let err = parse_duration(&mut strict(), "999999999999999999 1:00:00", 0).unwrap_err();
    assert_eq!(err.value.map(|d| d.to_string()).as_deref(), Some("838:59:59"));
    assert_eq!(err.error.code(), 1292);

    let err = parse_duration(&mut strict(), "-999999999999999999 1:00:00", 0).unwrap_err();
    assert_eq!(err.value.map(|d| d.to_string()).as_deref(), Some("-838:59:59"));
}

#[test]
fn duration_hour_carry_at_limit_clamps() {
    let err = parse_duration(&mut strict(), "9223372036854775807:59:59.9", 0).unwrap_err();
    assert_eq!(err.value.map(|d| d.to_string()).as_deref(), Some("838:59:59"));
    assert_eq!(err.error.code(), 1292);
}

fn sample_core() -> CoreTime {
    CoreTime::from_date(2020, 1, 2, 3, 4, 5, 123_456)
}

#[test]
fn fsp_above_range_is_clamped() {
    for tp in [TimeType::Datetime, TimeType::Timestamp] {
        let t = Time::new(sample_core(), tp, 7);
        assert_eq!(t.tp(), tp);
        assert_eq!(t.fsp(), 6);
        assert_eq!(t.to_string(), "2020-01-02 03:04:05.123456");
        assert_eq!(
            t.to_number(),
            "20200102030405.123456".parse::<BigDecimal>().unwrap()
        );
    }
}

#[test]
fn fsp_below_range_is_clamped() {
    let t = Time::new(sample_core(), TimeType::Datetime, -5);
    assert_eq!(t.tp(), TimeType::Datetime);
    assert_eq!(t.fsp(), 0);
    assert_eq!(t.to_string(), "2020-01-02 03:04:05");

    let t = Time::new(sample_core(), TimeType::Datetime, -1);
    assert_eq!(t.fsp(), 0);
}

#[test]
fn set_fsp_keeps_type_and_range() {
    let mut t = Time::new(sample_core(), TimeType::Timestamp, 0);
    t.set_fsp(9);
    assert_eq!(t.tp(), TimeType::Timestamp);
    assert_eq!(t.fsp(), 6);
    t.set_fsp(-3);
    assert_eq!(t.tp(), TimeType::Timestamp);
    assert_eq!(t.fsp(), 0);
}

#[test]
fn deserialized_out_of_range_tag_reads_as_max_fsp() {
    let raw = Time::new(sample_core(), TimeType::Timestamp, 6).raw() | 0b1111;
    let t: Time = serde_json::from_str(&raw.to_string()).unwrap();
    assert_eq!(t.tp(), TimeType::Timestamp);
    assert_eq!(t.fsp(), 6);
    assert_eq!(t.to_string(), "2020-01-02 03:04:05.123456");
    assert_eq!(
        t.to_number(),
        "20200102030405.123456".parse::<BigDecimal>().unwrap()
    );
}
