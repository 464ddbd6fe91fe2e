//! Extension-to-MIME lookup.
//!
//! Matched by exact, case-sensitive suffix beginning at the final `.`
//! in the path. Unknown and extensionless paths fall back to
//! `application/octet-stream`.

const TABLE: &[(&str, &str)] = &[
    (".ogg", "audio/ogg"),
    (".pdf", "application/pdf"),
    (".wasm", "application/wasm"),
    (".xml", "application/xml"),
    (".zip", "application/zip"),
    (".mp3", "audio/mpeg"),
    (".gif", "image/gif"),
    (".jpg", "image/jpeg"),
    (".png", "image/png"),
    (".svg", "image/svg+xml"),
    (".css", "text/css"),
    (".html", "text/html"),
    (".js", "application/javascript"),
    (".txt", "text/plain"),
    (".asc", "text/plain"),
    (".mpeg", "video/mpeg"),
    (".avi", "video/x-msvideo"),
    (".mp4", "video/mp4"),
];

/// Fallback MIME type for unrecognized or extensionless targets.
pub const DEFAULT: &str = "application/octet-stream";

/// Look up the MIME type for `path` by exact-suffix, case-sensitive
/// extension match.
#[must_use]
pub fn lookup(path: &str) -> &'static str {
    TABLE
        .iter()
        .find(|(ext, _)| path.ends_with(ext))
        .map_or(DEFAULT, |(_, mime)| mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_exactly() {
        assert_eq!(lookup("/a/b.html"), "text/html");
        assert_eq!(lookup("/a/b.PNG"), DEFAULT);
        assert_eq!(lookup("/archive.tar.gz"), DEFAULT);
        assert_eq!(lookup("/clip.mp4"), "video/mp4");
    }

    #[test]
    fn extensionless_and_unknown_fall_back() {
        assert_eq!(lookup("/no-extension"), DEFAULT);
        assert_eq!(lookup("/weird.ext"), DEFAULT);
    }
}
