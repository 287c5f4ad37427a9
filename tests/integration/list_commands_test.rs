// tests/integration/list_commands_test.rs

//! Integration tests for list commands.

use super::test_helpers::{bulk, bulk_array, TestContext};
use emberdb::core::{EmberError, RespValue};

#[tokio::test]
async fn test_rpush_appends_in_order() {
    let ctx = TestContext::new();
    let resp = ctx.execute(&["RPUSH", "l", "a", "b", "c"]).await.unwrap();
    assert_eq!(resp, RespValue::Integer(3));

    let resp = ctx.execute(&["LRANGE", "l", "0", "-1"]).await.unwrap();
    assert_eq!(resp, bulk_array(&["a", "b", "c"]));
}

#[tokio::test]
async fn test_rpush_returns_growing_length() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.execute(&["RPUSH", "l", "a"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(
        ctx.execute(&["RPUSH", "l", "b", "c"]).await.unwrap(),
        RespValue::Integer(3)
    );
}

#[tokio::test]
async fn test_lpush_prepends_each_value() {
    let ctx = TestContext::new();
    let resp = ctx.execute(&["LPUSH", "l", "a", "b", "c"]).await.unwrap();
    assert_eq!(resp, RespValue::Integer(3));

    // Each value is prepended in turn, so the final order is reversed.
    let resp = ctx.execute(&["LRANGE", "l", "0", "-1"]).await.unwrap();
    assert_eq!(resp, bulk_array(&["c", "b", "a"]));
}

#[tokio::test]
async fn test_push_on_string_key_is_a_type_error() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "k", "v"]).await.unwrap();
    let err = ctx.execute(&["RPUSH", "k", "a"]).await.unwrap_err();
    assert!(matches!(err, EmberError::NotAList));
}

#[tokio::test]
async fn test_lpop_single() {
    let ctx = TestContext::new();
    ctx.execute(&["RPUSH", "l", "a", "b"]).await.unwrap();
    assert_eq!(ctx.execute(&["LPOP", "l"]).await.unwrap(), bulk("a"));
    assert_eq!(ctx.execute(&["LPOP", "l"]).await.unwrap(), bulk("b"));
    assert_eq!(ctx.execute(&["LPOP", "l"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_lpop_missing_key_shapes() {
    let ctx = TestContext::new();
    // Without a count the reply is a null bulk, with a count an empty array.
    assert_eq!(ctx.execute(&["LPOP", "nope"]).await.unwrap(), RespValue::Null);
    assert_eq!(
        ctx.execute(&["LPOP", "nope", "2"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}

#[tokio::test]
async fn test_lpop_with_count_pops_head_run() {
    let ctx = TestContext::new();
    ctx.execute(&["RPUSH", "l", "a", "b", "c"]).await.unwrap();
    assert_eq!(
        ctx.execute(&["LPOP", "l", "2"]).await.unwrap(),
        bulk_array(&["a", "b"])
    );
    // Asking for more than remains pops what is left.
    assert_eq!(
        ctx.execute(&["LPOP", "l", "5"]).await.unwrap(),
        bulk_array(&["c"])
    );
}

#[tokio::test]
async fn test_llen_reports_length() {
    let ctx = TestContext::new();
    assert_eq!(ctx.execute(&["LLEN", "l"]).await.unwrap(), RespValue::Integer(0));
    ctx.execute(&["RPUSH", "l", "a", "b"]).await.unwrap();
    assert_eq!(ctx.execute(&["LLEN", "l"]).await.unwrap(), RespValue::Integer(2));
}

#[tokio::test]
async fn test_llen_on_string_key_is_a_type_error() {
    let ctx = TestContext::new();
    ctx.execute(&["SET", "k", "v"]).await.unwrap();
    let err = ctx.execute(&["LLEN", "k"]).await.unwrap_err();
    assert!(matches!(err, EmberError::NotAList));
}

#[tokio::test]
async fn test_lrange_negative_indices_count_from_tail() {
    let ctx = TestContext::new();
    ctx.execute(&["RPUSH", "l", "a", "b", "c", "d"]).await.unwrap();
    assert_eq!(
        ctx.execute(&["LRANGE", "l", "-2", "-1"]).await.unwrap(),
        bulk_array(&["c", "d"])
    );
    assert_eq!(
        ctx.execute(&["LRANGE", "l", "1", "2"]).await.unwrap(),
        bulk_array(&["b", "c"])
    );
}

#[tokio::test]
async fn test_lrange_clamps_out_of_range_indices() {
    let ctx = TestContext::new();
    ctx.execute(&["RPUSH", "l", "a", "b"]).await.unwrap();
    assert_eq!(
        ctx.execute(&["LRANGE", "l", "-100", "100"]).await.unwrap(),
        bulk_array(&["a", "b"])
    );
}

#[tokio::test]
async fn test_lrange_inverted_range_is_empty() {
    let ctx = TestContext::new();
    ctx.execute(&["RPUSH", "l", "a", "b", "c"]).await.unwrap();
    assert_eq!(
        ctx.execute(&["LRANGE", "l", "2", "1"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}

#[tokio::test]
async fn test_lrange_missing_key_is_empty() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.execute(&["LRANGE", "nope", "0", "-1"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}
