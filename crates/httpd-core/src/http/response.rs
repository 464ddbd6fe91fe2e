//! Response framing: status line, headers, and canonical error bodies.

use super::content_type;

/// The `Server` header value, with a build timestamp baked in by
/// `build.rs`.
pub const SERVER: &str = concat!("httpd (built on ", env!("HTTPD_BUILD_TIMESTAMP"), ")");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    MovedPermanently,
    Forbidden,
    NotFound,
    InternalServerError,
    NotImplemented,
}

impl Status {
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::MovedPermanently => 301,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
            Self::NotImplemented => 501,
        }
    }

    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::MovedPermanently => "Moved Permanently",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
            Self::NotImplemented => "Not Implemented",
        }
    }
}

/// Build the fixed minimal HTML body used for every non-200 response:
/// the code and reason appear in both the title and the `<h1>`.
#[must_use]
pub fn error_body(status: Status) -> Vec<u8> {
    format!(
        "<html><head><title>{code} {reason}</title></head>\
         <body><h1>{code} {reason}</h1></body></html>",
        code = status.code(),
        reason = status.reason(),
    )
    .into_bytes()
}

/// Render a full response (status line, headers, body) into one
/// buffer, ready to hand to the connection for a non-blocking send
/// loop.
#[must_use]
pub fn render(status: Status, content_type: &str, body: &[u8], location: Option<&str>) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {code} {reason}\r\n\
         Content-Length: {len}\r\n\
         Content-Type: {content_type}\r\n\
         Server: {server}\r\n",
        code = status.code(),
        reason = status.reason(),
        len = body.len(),
        server = SERVER,
    );

    if let Some(location) = location {
        head.push_str("Location: ");
        head.push_str(location);
        head.push_str("\r\n");
    }

    head.push_str("\r\n");

    let mut out = head.into_bytes();
    out.extend_from_slice(body);
    out
}

/// A redirect response carries no body of its own.
#[must_use]
pub fn redirect(location: &str) -> Vec<u8> {
    render(Status::MovedPermanently, content_type::DEFAULT, &[], Some(location))
}

/// An error response: status line, headers, and the canonical HTML
/// body for that status.
#[must_use]
pub fn error(status: Status) -> Vec<u8> {
    let body = error_body(status);
    render(status, "text/html", &body, None)
}

/// The head for a `200 OK` file response whose body is streamed
/// separately (via `sendfile` or a buffered copy), so the body is
/// never materialized here.
#[must_use]
pub fn file_head(content_type: &str, len: u64) -> Vec<u8> {
    format!(
        "HTTP/1.1 {code} {reason}\r\n\
         Content-Length: {len}\r\n\
         Content-Type: {content_type}\r\n\
         Server: {server}\r\n\r\n",
        code = Status::Ok.code(),
        reason = Status::Ok.reason(),
        server = SERVER,
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_contains_code_and_reason_twice() {
        let body = String::from_utf8(error_body(Status::NotFound)).unwrap();
        assert_eq!(body.matches("404").count(), 2);
        assert_eq!(body.matches("Not Found").count(), 2);
    }

    #[test]
    fn render_includes_location_only_when_given() {
        let with = render(Status::MovedPermanently, content_type::DEFAULT, &[], Some("/x/"));
        assert!(String::from_utf8_lossy(&with).contains("Location: /x/\r\n"));

        let without = render(Status::Ok, content_type::DEFAULT, b"hi", None);
        assert!(!String::from_utf8_lossy(&without).contains("Location:"));
    }

    #[test]
    fn render_reports_correct_content_length() {
        let out = render(Status::Ok, "text/plain", b"hello", None);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Content-Length: 5\r\n"));
        assert!(text.ends_with("hello"));
    }
}
