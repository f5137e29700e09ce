//! End-to-end tests over real sockets.

use flate2::read::GzDecoder;
use rawhttpd::config::Config;
use rawhttpd::server::listener::serve;
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

async fn start_server(cfg: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = serve(listener, &cfg).await;
    });
    addr
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rawhttpd-e2e-{}-{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_with_dir(dir: PathBuf) -> Config {
    let mut cfg = Config::default();
    cfg.files.directory = Some(dir);
    cfg
}

/// Reads one response: headers, then Content-Length bytes of body if announced.
async fn read_response(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let length = head
                .split("\r\n")
                .find_map(|line| line.strip_prefix("Content-Length: "))
                .map(|v| v.parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return buf;
            }
        }
        let n = timeout(Duration::from_secs(5), stream.read(&mut chunk))
            .await
            .expect("timed out waiting for response")
            .unwrap();
        assert!(n > 0, "connection closed mid-response");
        buf.extend_from_slice(&chunk[..n]);
    }
}

async fn assert_closed(stream: &mut TcpStream) {
    let mut rest = Vec::new();
    let n = timeout(Duration::from_secs(5), stream.read_to_end(&mut rest))
        .await
        .expect("connection was not closed")
        .unwrap_or(0);
    assert_eq!(n, 0);
}

async fn roundtrip(stream: &mut TcpStream, request: &[u8]) -> Vec<u8> {
    stream.write_all(request).await.unwrap();
    read_response(stream).await
}

fn body_of(response: &[u8]) -> &[u8] {
    let end = response.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    &response[end + 4..]
}

#[tokio::test]
async fn test_echo_exact_bytes() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(&mut stream, b"GET /echo/abc HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: open\r\nContent-Length: 3\r\n\r\nabc"
    );
}

#[tokio::test]
async fn test_unmatched_path_closes_connection() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(&mut stream, b"GET /nonexistent HTTP/1.1\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");
    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_unparseable_request_closes_connection() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(&mut stream, b"BREW /pot HTTP/1.1\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");
    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_keep_alive_serves_second_request() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let first = roundtrip(&mut stream, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(first, b"HTTP/1.1 200 OK\r\n\r\n");

    let second = roundtrip(&mut stream, b"GET /echo/again HTTP/1.1\r\n\r\n").await;
    assert_eq!(body_of(&second), b"again");
}

#[tokio::test]
async fn test_connection_close_is_honored() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(
        &mut stream,
        b"GET /echo/bye HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\nContent-Length: 3\r\n\r\nbye"
    );
    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_root_with_close() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(&mut stream, b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert_eq!(response, b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n");
    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_echo_gzip_decodes() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(
        &mut stream,
        b"GET /echo/compress-me HTTP/1.1\r\nAccept-Encoding: encoding-1, gzip, encoding-2\r\n\r\n",
    )
    .await;

    let head = String::from_utf8_lossy(&response[..response.len() - body_of(&response).len()]).to_string();
    assert!(head.starts_with("HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Type: text/plain\r\nConnection: open\r\n"));

    let mut decoded = String::new();
    GzDecoder::new(body_of(&response))
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "compress-me");
}

#[tokio::test]
async fn test_echo_unsupported_encoding_has_no_length() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(
        &mut stream,
        b"GET /echo/abc HTTP/1.1\r\nAccept-Encoding: invalid-encoding\r\n\r\n",
    )
    .await;

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: open\r\n\r\n"
    );
}

#[tokio::test]
async fn test_user_agent_and_missing_header() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(
        &mut stream,
        b"GET /user-agent HTTP/1.1\r\nHost: localhost:4221\r\nUser-Agent: foobar/1.2.3\r\n\r\n",
    )
    .await;
    assert_eq!(body_of(&response), b"foobar/1.2.3");

    // The connection survives a 400
    let response = roundtrip(&mut stream, b"GET /user-agent HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\nConnection: open\r\n\r\n");

    let response = roundtrip(&mut stream, b"GET / HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, b"HTTP/1.1 200 OK\r\n\r\n");
}

#[tokio::test]
async fn test_files_get_and_missing() {
    let dir = scratch_dir("get");
    std::fs::write(dir.join("hello.txt"), b"Hello, World!").unwrap();
    let addr = start_server(config_with_dir(dir)).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(&mut stream, b"GET /files/hello.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nConnection: open\r\nContent-Length: 13\r\n\r\nHello, World!"
    );

    // A missing file is a 404 but keeps the connection
    let response = roundtrip(&mut stream, b"GET /files/absent.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");

    let response = roundtrip(&mut stream, b"GET /echo/still-here HTTP/1.1\r\n\r\n").await;
    assert_eq!(body_of(&response), b"still-here");
}

#[tokio::test]
async fn test_upload_then_download_large_body() {
    let dir = scratch_dir("upload");
    let addr = start_server(config_with_dir(dir.clone())).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let payload: Vec<u8> = (0..5000u32).map(|i| b'a' + (i % 26) as u8).collect();
    let mut request =
        format!("POST /files/big.txt HTTP/1.1\r\nContent-Length: {}\r\n\r\n", payload.len()).into_bytes();
    request.extend_from_slice(&payload);

    let response = roundtrip(&mut stream, &request).await;
    assert_eq!(response, b"HTTP/1.1 201 Created\r\nConnection: open\r\n\r\n");
    assert_eq!(std::fs::read(dir.join("big.txt")).unwrap(), payload);

    let response = roundtrip(&mut stream, b"GET /files/big.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(body_of(&response), &payload[..]);
}

#[tokio::test]
async fn test_upload_without_content_length_keeps_connection_usable() {
    let dir = scratch_dir("upload-no-length");
    let addr = start_server(config_with_dir(dir.clone())).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let response = roundtrip(
        &mut stream,
        b"POST /files/p.txt HTTP/1.1\r\nHost: x\r\n\r\nhello",
    )
    .await;
    assert_eq!(response, b"HTTP/1.1 201 Created\r\nConnection: open\r\n\r\n");
    assert_eq!(std::fs::read(dir.join("p.txt")).unwrap(), b"hello");

    let response = roundtrip(&mut stream, b"GET /echo/abc HTTP/1.1\r\n\r\n").await;
    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: open\r\nContent-Length: 3\r\n\r\nabc"
    );
}

#[tokio::test]
async fn test_pipelined_requests() {
    let addr = start_server(Config::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /echo/one HTTP/1.1\r\n\r\nGET /echo/two HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    let expected: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: open\r\nContent-Length: 3\r\n\r\none\
HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: open\r\nContent-Length: 3\r\n\r\ntwo";

    let mut received = Vec::new();
    let mut chunk = [0u8; 1024];
    while received.len() < expected.len() {
        let n = timeout(Duration::from_secs(5), stream.read(&mut chunk))
            .await
            .expect("timed out waiting for pipelined responses")
            .unwrap();
        assert!(n > 0, "connection closed early");
        received.extend_from_slice(&chunk[..n]);
    }
    assert_eq!(received, expected);
}

#[tokio::test]
async fn test_oversized_request_is_rejected() {
    let mut cfg = Config::default();
    cfg.server.read_buffer_size = 512;
    cfg.server.max_request_size = 1024;
    let addr = start_server(cfg).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    // Exactly the limit, still short of the announced body
    let mut request = b"POST /files/x HTTP/1.1\r\nContent-Length: 10000\r\n\r\n".to_vec();
    request.resize(1024, b'x');

    let response = roundtrip(&mut stream, &request).await;
    assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n");
    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_idle_connection_times_out() {
    let mut cfg = Config::default();
    cfg.server.read_timeout_secs = Some(1);
    let addr = start_server(cfg).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    assert_closed(&mut stream).await;
}
