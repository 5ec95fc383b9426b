//! Canonical string construction for download-URL signing.
//!
//! Both sides of the protocol digest the same canonical form:
//!
//! ```text
//! CanonicalPath?name=value&name=value...
//! ```
//!
//! Parameters are sorted by name, then by value for duplicate names, so
//! the token does not depend on the order in which a URL happens to
//! carry its query string. Names and values are form-urlencoded after
//! sorting, which removes any ambiguity from delimiter characters
//! appearing inside values. The `token` parameter itself is never part
//! of the canonical form.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::token::Token;

/// The set of characters that must be percent-encoded in path segments.
///
/// All characters except RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) are encoded. Forward slashes in
/// the path are preserved (not encoded).
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Split a URL into the part before `?` and the raw query string after it.
///
/// # Examples
///
/// ```
/// use securl_sign::canonical::split_url;
///
/// assert_eq!(split_url("/download?a=1"), ("/download", Some("a=1")));
/// assert_eq!(split_url("/download"), ("/download", None));
/// ```
#[must_use]
pub fn split_url(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((prefix, query)) => (prefix, Some(query)),
        None => (url, None),
    }
}

/// Decode a raw query string into ordered `(name, value)` pairs.
///
/// Percent-escapes and `+` are decoded; a parameter without `=` yields
/// an empty value.
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

/// Encode `(name, value)` pairs into a query string, preserving order.
#[must_use]
pub fn encode_query(params: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// Build the canonical digest input for a URL.
///
/// `params` holds decoded pairs; any `token` entries are dropped, the
/// rest are sorted by name then value and re-encoded. The path is
/// normalized via [`canonical_path`] so absolute and path-only
/// renditions of the same endpoint digest identically.
///
/// # Examples
///
/// ```
/// use securl_sign::canonical::canonicalize;
///
/// let params = vec![
///     ("ttl".to_owned(), "1700000000".to_owned()),
///     ("eddfile".to_owned(), "42:7:3".to_owned()),
///     ("token".to_owned(), "deadbeef".to_owned()),
/// ];
/// assert_eq!(
///     canonicalize("/download", &params),
///     "/download?eddfile=42%3A7%3A3&ttl=1700000000"
/// );
/// ```
#[must_use]
pub fn canonicalize(path: &str, params: &[(String, String)]) -> String {
    let path = canonical_path(path);

    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .filter(|(name, _)| name != Token::PARAM)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    pairs.sort_unstable();

    if pairs.is_empty() {
        return path;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    format!("{path}?{}", serializer.finish())
}

/// Normalize a URL path for digesting.
///
/// A leading `scheme://authority` prefix is dropped; `://` appearing
/// after the first `/` is path data, not a scheme. Each segment is
/// decoded and re-encoded so pre-encoded paths do not get
/// double-encoded, and the result always starts with `/`.
///
/// # Examples
///
/// ```
/// use securl_sign::canonical::canonical_path;
///
/// assert_eq!(canonical_path("https://shop.example/download"), "/download");
/// assert_eq!(canonical_path("/download"), "/download");
/// assert_eq!(canonical_path("https://shop.example"), "/");
/// ```
#[must_use]
pub fn canonical_path(path: &str) -> String {
    let path = match path.find("://") {
        // Only a leading scheme counts: no `/` may precede the `://`.
        Some(idx) if !path[..idx].contains('/') => {
            let rest = &path[idx + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "",
            }
        }
        _ => path,
    };

    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| {
            // Decode first, then re-encode, so already-encoded paths
            // produce the same canonical form as raw ones.
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, PATH_ENCODE_SET).to_string()
        })
        .collect();
    let joined = encoded.join("/");

    if joined.starts_with('/') {
        joined
    } else {
        format!("/{joined}")
    }
}
