// tests/integration/server_test.rs

//! End-to-end tests over a live TCP listener, asserting the exact octet
//! shapes of the wire protocol.

use emberdb::config::Config;
use emberdb::core::state::ServerState;
use emberdb::server::connection_loop;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Binds an ephemeral port, spawns the accept loop, and returns the address.
async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = ServerState::new(Config::default());
    tokio::spawn(connection_loop::run(listener, state));
    addr
}

/// Writes a raw request and asserts the exact reply bytes.
async fn send_and_expect(stream: &mut TcpStream, request: &[u8], expected: &[u8]) {
    stream.write_all(request).await.unwrap();
    let mut reply = vec![0u8; expected.len()];
    stream.read_exact(&mut reply).await.unwrap();
    assert_eq!(
        reply,
        expected,
        "reply was {:?}, expected {:?}",
        String::from_utf8_lossy(&reply),
        String::from_utf8_lossy(expected)
    );
}

#[tokio::test]
async fn test_ping_over_the_wire() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    send_and_expect(&mut conn, b"*1\r\n$4\r\nPING\r\n", b"+PONG\r\n").await;
}

#[tokio::test]
async fn test_set_and_get_over_the_wire() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    send_and_expect(
        &mut conn,
        b"*3\r\n$3\r\nSET\r\n$1\r\nx\r\n$5\r\nhello\r\n",
        b"+OK\r\n",
    )
    .await;
    send_and_expect(&mut conn, b"*2\r\n$3\r\nGET\r\n$1\r\nx\r\n", b"$5\r\nhello\r\n").await;
}

#[tokio::test]
async fn test_rpush_and_lrange_over_the_wire() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    send_and_expect(
        &mut conn,
        b"*5\r\n$5\r\nRPUSH\r\n$1\r\nL\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n",
        b":3\r\n",
    )
    .await;
    send_and_expect(
        &mut conn,
        b"*4\r\n$6\r\nLRANGE\r\n$1\r\nL\r\n$1\r\n0\r\n$2\r\n-1\r\n",
        b"*3\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n",
    )
    .await;
}

#[tokio::test]
async fn test_duplicate_xadd_id_error_over_the_wire() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    let xadd = b"*5\r\n$4\r\nXADD\r\n$1\r\ns\r\n$3\r\n1-1\r\n$1\r\nk\r\n$1\r\nv\r\n";
    send_and_expect(&mut conn, xadd, b"$3\r\n1-1\r\n").await;
    send_and_expect(
        &mut conn,
        xadd,
        b"-ERR The ID specified in XADD is equal or smaller than the target stream top item\r\n",
    )
    .await;
}

#[tokio::test]
async fn test_multi_exec_over_the_wire() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    send_and_expect(&mut conn, b"*1\r\n$5\r\nMULTI\r\n", b"+OK\r\n").await;
    send_and_expect(&mut conn, b"*2\r\n$4\r\nINCR\r\n$1\r\nn\r\n", b"+QUEUED\r\n").await;
    send_and_expect(&mut conn, b"*2\r\n$4\r\nINCR\r\n$1\r\nn\r\n", b"+QUEUED\r\n").await;
    send_and_expect(&mut conn, b"*1\r\n$4\r\nEXEC\r\n", b"*2\r\n:1\r\n:2\r\n").await;
}

#[tokio::test]
async fn test_blpop_is_served_across_connections() {
    let addr = start_server().await;
    let mut waiter = TcpStream::connect(addr).await.unwrap();
    let mut pusher = TcpStream::connect(addr).await.unwrap();

    waiter
        .write_all(b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$1\r\n0\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    send_and_expect(
        &mut pusher,
        b"*3\r\n$5\r\nRPUSH\r\n$1\r\nq\r\n$1\r\nx\r\n",
        b":1\r\n",
    )
    .await;

    let expected = b"*2\r\n$1\r\nq\r\n$1\r\nx\r\n";
    let mut reply = vec![0u8; expected.len()];
    waiter.read_exact(&mut reply).await.unwrap();
    assert_eq!(reply, expected);
}

#[tokio::test]
async fn test_unknown_command_error_over_the_wire() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    send_and_expect(
        &mut conn,
        b"*1\r\n$4\r\nFROB\r\n",
        b"-ERR unknown command 'FROB'\r\n",
    )
    .await;
}

#[tokio::test]
async fn test_arity_error_keeps_connection_usable() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    send_and_expect(
        &mut conn,
        b"*1\r\n$3\r\nGET\r\n",
        b"-ERR wrong number of arguments for 'GET' command\r\n",
    )
    .await;
    send_and_expect(&mut conn, b"*1\r\n$4\r\nPING\r\n", b"+PONG\r\n").await;
}

#[tokio::test]
async fn test_malformed_frame_is_silently_skipped() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    // A request that is valid RESP but not an array of bulk strings gets no
    // reply; the next command is served normally.
    conn.write_all(b"*1\r\n:42\r\n").await.unwrap();
    send_and_expect(&mut conn, b"*1\r\n$4\r\nPING\r\n", b"+PONG\r\n").await;
}

#[tokio::test]
async fn test_pipelined_commands_reply_in_issue_order() {
    let addr = start_server().await;
    let mut conn = TcpStream::connect(addr).await.unwrap();
    send_and_expect(
        &mut conn,
        b"*2\r\n$4\r\nINCR\r\n$1\r\nc\r\n*2\r\n$4\r\nINCR\r\n$1\r\nc\r\n*2\r\n$4\r\nINCR\r\n$1\r\nc\r\n",
        b":1\r\n:2\r\n:3\r\n",
    )
    .await;
}
