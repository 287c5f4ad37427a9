// tests/integration/string_commands_test.rs

//! Integration tests for string commands and lazy expiry.

use super::test_helpers::{bulk, TestContext};
use emberdb::core::{EmberError, RespValue};
use std::time::Duration;
use tokio_test::assert_ok;

#[tokio::test]
async fn test_set_then_get_roundtrip() {
    let ctx = TestContext::new();
    let resp = assert_ok!(ctx.execute(&["SET", "x", "hello"]).await);
    assert_eq!(resp, RespValue::SimpleString("OK".into()));

    let resp = ctx.execute(&["GET", "x"]).await.unwrap();
    assert_eq!(resp, bulk("hello"));
}

#[tokio::test]
async fn test_get_missing_key_returns_null() {
    let ctx = TestContext::new();
    let resp = ctx.execute(&["GET", "nope"]).await.unwrap();
    assert_eq!(resp, RespValue::Null);
}

#[tokio::test]
async fn test_get_on_list_is_a_type_error() {
    let ctx = TestContext::new();
    ctx.execute(&["RPUSH", "l", "a"]).await.unwrap();
    let err = ctx.execute(&["GET", "l"]).await.unwrap_err();
    assert!(matches!(err, EmberError::WrongType));
}

#[tokio::test]
async fn test_set_with_px_expires_lazily() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "x", "v", "PX", "100"]).await.unwrap();

    // Still live well inside the window.
    assert_eq!(ctx.execute(&["GET", "x"]).await.unwrap(), bulk("v"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(ctx.execute(&["GET", "x"]).await.unwrap(), RespValue::Null);
    // The expired key reads as absent for every accessor.
    assert_eq!(
        ctx.execute(&["TYPE", "x"]).await.unwrap(),
        RespValue::SimpleString("none".into())
    );
}

#[tokio::test]
async fn test_set_without_px_clears_prior_expiry() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "x", "v1", "PX", "100"]).await.unwrap();
    ctx.execute(&["SET", "x", "v2"]).await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(ctx.execute(&["GET", "x"]).await.unwrap(), bulk("v2"));
}

#[tokio::test]
async fn test_incr_creates_missing_key_at_one() {
    let ctx = TestContext::new();
    let resp = ctx.execute(&["INCR", "n"]).await.unwrap();
    assert_eq!(resp, RespValue::Integer(1));
    assert_eq!(ctx.execute(&["GET", "n"]).await.unwrap(), bulk("1"));
}

#[tokio::test]
async fn test_incr_increments_integer_string() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "n", "41"]).await.unwrap();
    let resp = ctx.execute(&["INCR", "n"]).await.unwrap();
    assert_eq!(resp, RespValue::Integer(42));
}

#[tokio::test]
async fn test_incr_handles_negative_values() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "n", "-3"]).await.unwrap();
    let resp = ctx.execute(&["INCR", "n"]).await.unwrap();
    assert_eq!(resp, RespValue::Integer(-2));
}

#[tokio::test]
async fn test_incr_rejects_non_integer_value_without_mutating() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "n", "abc"]).await.unwrap();
    let err = ctx.execute(&["INCR", "n"]).await.unwrap_err();
    assert!(matches!(err, EmberError::NotAnInteger));
    assert_eq!(ctx.execute(&["GET", "n"]).await.unwrap(), bulk("abc"));
}

#[tokio::test]
async fn test_incr_rejects_overflow() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "n", &i64::MAX.to_string()]).await.unwrap();
    let err = ctx.execute(&["INCR", "n"]).await.unwrap_err();
    assert!(matches!(err, EmberError::NotAnInteger));
}

#[tokio::test]
async fn test_type_reports_each_kind() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "s", "v"]).await.unwrap();
    ctx.execute(&["RPUSH", "l", "v"]).await.unwrap();
    ctx.execute(&["XADD", "st", "1-1", "f", "v"]).await.unwrap();

    assert_eq!(
        ctx.execute(&["TYPE", "s"]).await.unwrap(),
        RespValue::SimpleString("string".into())
    );
    assert_eq!(
        ctx.execute(&["TYPE", "l"]).await.unwrap(),
        RespValue::SimpleString("list".into())
    );
    assert_eq!(
        ctx.execute(&["TYPE", "st"]).await.unwrap(),
        RespValue::SimpleString("stream".into())
    );
    assert_eq!(
        ctx.execute(&["TYPE", "missing"]).await.unwrap(),
        RespValue::SimpleString("none".into())
    );
}

#[tokio::test]
async fn test_info_replication_reports_master() {
    let ctx = TestContext::new();
    assert_eq!(ctx.execute(&["INFO"]).await.unwrap(), bulk("role:master"));
    assert_eq!(
        ctx.execute(&["INFO", "replication"]).await.unwrap(),
        bulk("role:master")
    );
    assert_eq!(ctx.execute(&["INFO", "memory"]).await.unwrap(), bulk(""));
}
