//! End-to-end coverage of the six scenarios in the design document's
//! "Concrete end-to-end scenarios" section, driving [`httpd_core::http::service`]
//! over a real loopback socket (no chroot, no privilege descent — the
//! handler itself is oblivious to both).

use httpd_core::http::{self, Outcome};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::time::Duration;

/// Serve exactly one request against `root` and return the raw bytes
/// the client received.
fn serve_one(root: &Path, request: &[u8]) -> Vec<u8> {
    let std_listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = std_listener.local_addr().unwrap();

    let client = std::thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream.write_all(request).expect("write request");
        let mut response = Vec::new();
        stream.read_to_end(&mut response).expect("read response");
        response
    });

    let (accepted, _) = std_listener.accept().expect("accept");
    accepted.set_nonblocking(true).expect("set nonblocking");
    let mut stream = mio::net::TcpStream::from_std(accepted);

    loop {
        match http::service(&mut stream, root).expect("service") {
            Outcome::Close => break,
            Outcome::Pending => std::thread::sleep(Duration::from_millis(5)),
        }
    }
    drop(stream);

    client.join().expect("client thread")
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn s1_index_redirect() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("site")).unwrap();
    std::fs::write(dir.path().join("site/index.html"), b"hi").unwrap();

    let response = text(&serve_one(
        dir.path(),
        b"GET /site/ HTTP/1.1\r\n\r\n",
    ));

    assert!(response.starts_with("HTTP/1.1 301 Moved Permanently"));
    assert!(response.contains("Location: /site/index.html\r\n"));
}

#[test]
fn s2_file_serve() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("site")).unwrap();
    std::fs::write(dir.path().join("site/index.html"), b"hi").unwrap();

    let response = serve_one(dir.path(), b"GET /site/index.html HTTP/1.1\r\n\r\n");
    let text = text(&response);

    assert!(text.starts_with("HTTP/1.1 200 OK"));
    assert!(text.contains("Content-Type: text/html\r\n"));
    assert!(text.contains("Content-Length: 2\r\n"));
    assert!(response.ends_with(b"hi"));
}

#[test]
fn s3_not_found() {
    let dir = tempfile::tempdir().unwrap();

    let response = text(&serve_one(dir.path(), b"GET /missing HTTP/1.1\r\n\r\n"));

    assert!(response.starts_with("HTTP/1.1 404 Not Found"));
    assert!(response.contains("404 Not Found"));
}

#[test]
fn s4_not_implemented() {
    let dir = tempfile::tempdir().unwrap();

    let response = text(&serve_one(dir.path(), b"POST /x HTTP/1.1\r\n\r\n"));

    assert!(response.starts_with("HTTP/1.1 501 Not Implemented"));
}

#[test]
fn s5_directory_redirect_with_slash() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("d")).unwrap();

    let response = text(&serve_one(dir.path(), b"GET /d HTTP/1.1\r\n\r\n"));

    assert!(response.starts_with("HTTP/1.1 301 Moved Permanently"));
    assert!(response.contains("Location: /d/\r\n"));
}

#[test]
fn s6_extension_mapping() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.png"), b"\x89PNG").unwrap();
    std::fs::write(dir.path().join("a.unknownext"), b"???").unwrap();

    let png = text(&serve_one(dir.path(), b"GET /a.png HTTP/1.1\r\n\r\n"));
    assert!(png.contains("Content-Type: image/png\r\n"));

    let unknown = text(&serve_one(dir.path(), b"GET /a.unknownext HTTP/1.1\r\n\r\n"));
    assert!(unknown.contains("Content-Type: application/octet-stream\r\n"));
}

#[test]
fn connection_close_header_is_honored_and_socket_still_closes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

    let response = text(&serve_one(
        dir.path(),
        b"GET /a.txt HTTP/1.1\r\nConnection: close\r\n\r\n",
    ));

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.ends_with("hello"));
}

#[test]
fn empty_target_is_internal_server_error() {
    let dir = tempfile::tempdir().unwrap();

    // The literal "HTTP/1.1" appears before "GET" here, so nothing
    // whitespace-delimited follows "GET" before the buffer ends.
    let response = text(&serve_one(dir.path(), b"HTTP/1.1 GET \r\n\r\n"));

    assert!(response.starts_with("HTTP/1.1 500 Internal Server Error"));
}
