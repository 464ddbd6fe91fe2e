//! Minimal HTTP/1.1 GET request-line parsing.
//!
//! This server neither buffers across reads nor supports pipelining:
//! whatever a single read batch contains is parsed as if it were the
//! complete request head. See [`crate::http::connection`].

use crate::error::RequestError;

/// Upper bound on the extracted request target, in bytes.
pub const MAX_TARGET_LEN: usize = 4096;

/// A parsed request: just enough to route.
#[derive(Debug, Clone)]
pub struct Request {
    pub target: String,
}

/// Parse `buf` as a request head.
///
/// Rejects with [`RequestError::NotImplemented`] unless the buffer
/// contains both the literal `GET` and the literal `HTTP/1.1`.
pub fn parse(buf: &[u8]) -> Result<Request, RequestError> {
    let text = String::from_utf8_lossy(buf);

    if !text.contains("GET") || !text.contains("HTTP/1.1") {
        return Err(RequestError::NotImplemented);
    }

    let after_method = text.find("GET").map_or("", |idx| &text[idx + 3..]);

    let target: String = after_method
        .trim_start()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .take(MAX_TARGET_LEN)
        .collect();

    Ok(Request { target })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_get_methods() {
        let err = parse(b"POST /x HTTP/1.1\r\n\r\n").unwrap_err();
        assert_eq!(err, RequestError::NotImplemented);
    }

    #[test]
    fn rejects_non_1_1_protocol() {
        let err = parse(b"GET /x HTTP/1.0\r\n\r\n").unwrap_err();
        assert_eq!(err, RequestError::NotImplemented);
    }

    #[test]
    fn extracts_target() {
        let req = parse(b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(req.target, "/index.html");
    }

    #[test]
    fn empty_target_is_parsed_not_rejected() {
        // Both required literals are present, but nothing whitespace-
        // delimited follows "GET" before the buffer ends.
        let req = parse(b"HTTP/1.1 GET \r\n\r\n").unwrap();
        assert_eq!(req.target, "");
    }
}
