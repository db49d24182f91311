//! Resolution of request paths against the base URL.
//!
//! A path is joined as an RFC 3986 reference. A path with characters a URI
//! may not contain is percent-encoded once and joined again; a path that
//! already carries escapes is never encoded a second time.

use url::Url;

use crate::error::ApiError;

/// Join `path` onto `base`, percent-encoding it once if the first attempt
/// fails.
pub fn resolve(base: &Url, path: &str) -> Result<Url, ApiError> {
    let first = join(base, path);
    let err = match first {
        Ok(url) => return Ok(url),
        Err(err) => err,
    };
    if is_url_encoded(path) {
        return Err(err);
    }
    join(base, &encode(path))
}

fn join(base: &Url, path: &str) -> Result<Url, ApiError> {
    if let Some(c) = path.chars().find(|c| !is_uri_char(*c)) {
        return Err(invalid(path, format!("character {c:?} is not allowed in a URI")));
    }
    if has_stray_percent(path) {
        return Err(invalid(path, "'%' is not followed by two hex digits".to_string()));
    }
    base.join(path).map_err(|e| invalid(path, e.to_string()))
}

fn invalid(path: &str, reason: String) -> ApiError {
    ApiError::InvalidUrl {
        url: path.to_string(),
        reason,
    }
}

/// Unreserved and reserved characters of RFC 3986, plus `%` for escapes.
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
}

fn has_stray_percent(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| *b == b'%' && !is_escape_at(bytes, i))
}

fn is_escape_at(bytes: &[u8], i: usize) -> bool {
    bytes.len() > i + 2 && bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit()
}

/// True when `path` contains at least one well-formed `%XX` escape.
pub fn is_url_encoded(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| *b == b'%' && is_escape_at(bytes, i))
}

/// Percent-encode every character a URI may not contain, every `%` and
/// every `#`. Other reserved characters keep their meaning, but a fragment
/// would never reach the server.
pub fn encode(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut buf = [0u8; 4];
    for c in path.chars() {
        if c != '%' && c != '#' && is_uri_char(c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    out
}
