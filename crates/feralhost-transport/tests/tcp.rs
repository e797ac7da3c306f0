//! Integration tests for the TCP transport.
//!
//! These tests spin up a real listener and a raw `TcpStream` client to
//! verify framing on the wire: every frame is terminated by a NUL byte
//! in both directions.

use feralhost_transport::{Connection, TcpTransport, Transport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Binds on a random port and returns the transport plus its address.
async fn bind() -> (TcpTransport, String) {
    let transport = TcpTransport::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = transport.local_addr().expect("local addr").to_string();
    (transport, addr)
}

#[tokio::test]
async fn test_tcp_accept_and_send_receive() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move {
        transport.accept().await.expect("should accept")
    });
    let mut client = TcpStream::connect(&addr).await.expect("connect");
    let conn = server.await.expect("task should complete");

    client.write_all(b"%xt%o%oac%-1%\0").await.unwrap();
    let frame = conn.recv().await.expect("recv ok");
    assert_eq!(frame.as_deref(), Some("%xt%o%oac%-1%"));

    conn.send("hello").await.expect("send ok");
    let mut buf = [0u8; 6];
    client.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello\0");
}

#[tokio::test]
async fn test_tcp_splits_multiple_frames_in_one_write() {
    let (mut transport, addr) = bind().await;
    let server = tokio::spawn(async move { transport.accept().await.unwrap() });
    let mut client = TcpStream::connect(&addr).await.unwrap();
    let conn = server.await.unwrap();

    client.write_all(b"one\0\0two\0").await.unwrap();
    assert_eq!(conn.recv().await.unwrap().as_deref(), Some("one"));
    // The stray empty frame between them is skipped.
    assert_eq!(conn.recv().await.unwrap().as_deref(), Some("two"));
}

#[tokio::test]
async fn test_tcp_clean_close_returns_none() {
    let (mut transport, addr) = bind().await;
    let server = tokio::spawn(async move { transport.accept().await.unwrap() });
    let client = TcpStream::connect(&addr).await.unwrap();
    let conn = server.await.unwrap();

    drop(client);
    assert!(conn.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn test_tcp_oversized_frame_is_skipped() {
    let transport = TcpTransport::bind("127.0.0.1:0")
        .await
        .unwrap()
        .max_frame_len(4);
    let addr = transport.local_addr().unwrap().to_string();
    let mut transport = transport;
    let server = tokio::spawn(async move { transport.accept().await.unwrap() });
    let mut client = TcpStream::connect(&addr).await.unwrap();
    let conn = server.await.unwrap();

    client.write_all(b"abcd\0abcdefghijklm\0wxyz\0").await.unwrap();
    assert_eq!(conn.recv().await.unwrap().as_deref(), Some("abcd"));
    // The long frame is dropped whole; the next one arrives intact.
    assert_eq!(conn.recv().await.unwrap().as_deref(), Some("wxyz"));
}

#[tokio::test]
async fn test_tcp_oversized_frame_then_close_returns_none() {
    let transport = TcpTransport::bind("127.0.0.1:0")
        .await
        .unwrap()
        .max_frame_len(4);
    let addr = transport.local_addr().unwrap().to_string();
    let mut transport = transport;
    let server = tokio::spawn(async move { transport.accept().await.unwrap() });
    let mut client = TcpStream::connect(&addr).await.unwrap();
    let conn = server.await.unwrap();

    client.write_all(b"abcdefghij").await.unwrap();
    drop(client);
    assert!(conn.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn test_tcp_invalid_utf8_frame_is_skipped() {
    let (mut transport, addr) = bind().await;
    let server = tokio::spawn(async move { transport.accept().await.unwrap() });
    let mut client = TcpStream::connect(&addr).await.unwrap();
    let conn = server.await.unwrap();

    client
        .write_all(b"%xt%o%oac%-1%\xff\xfe%\0%xt%o%oac%-1%\0")
        .await
        .unwrap();
    assert_eq!(conn.recv().await.unwrap().as_deref(), Some("%xt%o%oac%-1%"));
}

#[tokio::test]
async fn test_tcp_connection_ids_are_unique() {
    let (mut transport, addr) = bind().await;
    let server = tokio::spawn(async move {
        let a = transport.accept().await.unwrap();
        let b = transport.accept().await.unwrap();
        (a, b)
    });
    let _c1 = TcpStream::connect(&addr).await.unwrap();
    let _c2 = TcpStream::connect(&addr).await.unwrap();
    let (a, b) = server.await.unwrap();
    assert_ne!(a.id(), b.id());
}
