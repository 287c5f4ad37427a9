// tests/integration/blocking_test.rs

//! Integration tests for the blocking coordinator: BLPOP hand-offs, FIFO
//! waiter order, timeouts, and XREAD BLOCK wake-ups.

use super::test_helpers::{bulk, bulk_array, TestContext};
use emberdb::core::RespValue;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_blpop_pops_immediately_when_list_is_non_empty() {
    let ctx = TestContext::new();
    ctx.execute(&["RPUSH", "q", "x"]).await.unwrap();
    let resp = ctx.execute(&["BLPOP", "q", "0"]).await.unwrap();
    assert_eq!(resp, bulk_array(&["q", "x"]));
}

#[tokio::test]
async fn test_blpop_is_served_by_a_later_rpush() {
    let ctx = TestContext::new();

    let waiter_ctx = ctx.clone();
    let waiter = tokio::spawn(async move {
        waiter_ctx.execute_as(10, &["BLPOP", "q", "0"]).await
    });

    // Give the waiter time to park before pushing.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let resp = ctx.execute(&["RPUSH", "q", "x"]).await.unwrap();
    assert_eq!(resp, RespValue::Integer(1));

    let resp = waiter.await.unwrap().unwrap();
    assert_eq!(resp, bulk_array(&["q", "x"]));

    // The handed-off element never lands in the stored list.
    assert_eq!(ctx.execute(&["LLEN", "q"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_blpop_waiters_are_served_fifo() {
    let ctx = TestContext::new();

    let first_ctx = ctx.clone();
    let first = tokio::spawn(async move {
        first_ctx.execute_as(10, &["BLPOP", "q", "0"]).await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second_ctx = ctx.clone();
    let second = tokio::spawn(async move {
        second_ctx.execute_as(11, &["BLPOP", "q", "0"]).await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // One push of two values serves both waiters in parking order.
    let resp = ctx.execute(&["RPUSH", "q", "v1", "v2"]).await.unwrap();
    assert_eq!(resp, RespValue::Integer(2));

    assert_eq!(first.await.unwrap().unwrap(), bulk_array(&["q", "v1"]));
    assert_eq!(second.await.unwrap().unwrap(), bulk_array(&["q", "v2"]));
    assert_eq!(ctx.execute(&["LLEN", "q"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_blpop_excess_values_stay_in_the_list() {
    let ctx = TestContext::new();

    let waiter_ctx = ctx.clone();
    let waiter = tokio::spawn(async move {
        waiter_ctx.execute_as(10, &["BLPOP", "q", "0"]).await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    ctx.execute(&["RPUSH", "q", "a", "b", "c"]).await.unwrap();
    assert_eq!(waiter.await.unwrap().unwrap(), bulk_array(&["q", "a"]));
    assert_eq!(
        ctx.execute(&["LRANGE", "q", "0", "-1"]).await.unwrap(),
        bulk_array(&["b", "c"])
    );
}

#[tokio::test]
async fn test_blpop_times_out_with_null() {
    let ctx = TestContext::new();
    let started = Instant::now();
    let resp = ctx.execute(&["BLPOP", "q", "0.2"]).await.unwrap();
    assert_eq!(resp, RespValue::Null);
    assert!(started.elapsed() >= Duration::from_millis(150));

    // The timed-out waiter is gone: a later push keeps its element.
    ctx.execute(&["RPUSH", "q", "x"]).await.unwrap();
    assert_eq!(ctx.execute(&["LLEN", "q"]).await.unwrap(), RespValue::Integer(1));
}

#[tokio::test]
async fn test_xread_block_is_woken_by_xadd() {
    let ctx = TestContext::new();

    let reader_ctx = ctx.clone();
    let reader = tokio::spawn(async move {
        reader_ctx
            .execute_as(10, &["XREAD", "BLOCK", "0", "STREAMS", "s", "$"])
            .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    ctx.execute(&["XADD", "s", "1-1", "k", "v"]).await.unwrap();

    let resp = reader.await.unwrap().unwrap();
    assert_eq!(
        resp,
        RespValue::Array(vec![RespValue::Array(vec![
            bulk("s"),
            RespValue::Array(vec![RespValue::Array(vec![
                bulk("1-1"),
                bulk_array(&["k", "v"]),
            ])]),
        ])])
    );
}

#[tokio::test]
async fn test_xread_block_sees_only_entries_after_its_watermark() {
    let ctx = TestContext::new();
    ctx.execute(&["XADD", "s", "1-1", "old", "1"]).await.unwrap();

    let reader_ctx = ctx.clone();
    let reader = tokio::spawn(async move {
        reader_ctx
            .execute_as(10, &["XREAD", "BLOCK", "0", "STREAMS", "s", "$"])
            .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    ctx.execute(&["XADD", "s", "2-1", "new", "2"]).await.unwrap();

    let resp = reader.await.unwrap().unwrap();
    assert_eq!(
        resp,
        RespValue::Array(vec![RespValue::Array(vec![
            bulk("s"),
            RespValue::Array(vec![RespValue::Array(vec![
                bulk("2-1"),
                bulk_array(&["new", "2"]),
            ])]),
        ])])
    );
}

#[tokio::test]
async fn test_xread_block_times_out_with_null() {
    let ctx = TestContext::new();
    let started = Instant::now();
    let resp = ctx
        .execute(&["XREAD", "BLOCK", "200", "STREAMS", "s", "$"])
        .await
        .unwrap();
    assert_eq!(resp, RespValue::Null);
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn test_xread_block_wakes_all_readers() {
    let ctx = TestContext::new();

    let reader_a_ctx = ctx.clone();
    let reader_a = tokio::spawn(async move {
        reader_a_ctx
            .execute_as(10, &["XREAD", "BLOCK", "0", "STREAMS", "s", "$"])
            .await
    });
    let reader_b_ctx = ctx.clone();
    let reader_b = tokio::spawn(async move {
        reader_b_ctx
            .execute_as(11, &["XREAD", "BLOCK", "0", "STREAMS", "s", "$"])
            .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    ctx.execute(&["XADD", "s", "1-1", "k", "v"]).await.unwrap();

    // Stream waits are broadcast: both readers observe the append.
    for reader in [reader_a, reader_b] {
        let resp = reader.await.unwrap().unwrap();
        let RespValue::Array(streams) = resp else {
            panic!("expected array reply from XREAD");
        };
        assert_eq!(streams.len(), 1);
    }
}
