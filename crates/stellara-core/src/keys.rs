//! Cache key construction and parsing.
//!
//! Keys are colon-delimited: `<domain>:<subdomain>[:<extra>]*:<identifier>`.
//! Segments are not escaped, so identifiers must not contain `:`.

use std::fmt;

use crate::error::{CoreError, Result};

/// Segment delimiter used by every cache key.
pub const KEY_DELIMITER: char = ':';

/// Joins `prefix` and every non-empty part with `:`.
///
/// Empty segments (including an empty prefix) are skipped, so
/// `build_key("cache:news", [""])` yields `cache:news`.
///
/// # Examples
///
/// ```
/// use stellara_core::keys::build_key;
///
/// assert_eq!(
///     build_key("cache:market:snapshot", ["USD-STELLARA"]),
///     "cache:market:snapshot:USD-STELLARA"
/// );
/// assert_eq!(build_key("cache:news", [""]), "cache:news");
/// ```
pub fn build_key<I, S>(prefix: &str, parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::from(prefix);
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if !key.is_empty() {
            key.push(KEY_DELIMITER);
        }
        key.push_str(part);
    }
    key
}

/// Like [`build_key`] but rejects parts containing the delimiter.
pub fn try_build_key<I, S>(prefix: &str, parts: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<S> = parts.into_iter().collect();
    for part in &parts {
        let part: &str = part.as_ref();
        if part.contains(KEY_DELIMITER) {
            return Err(CoreError::invalid_segment(
                part,
                "segments cannot contain ':'",
            ));
        }
    }
    Ok(build_key(prefix, parts))
}

/// A cache key split into its leading segment and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    /// First segment of the key.
    pub prefix: String,
    /// Remaining segments, in order.
    pub parts: Vec<String>,
}

impl fmt::Display for ParsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_key(&self.prefix, &self.parts))
    }
}

/// Splits a key on `:`. No validation of the segment count is done.
///
/// ```
/// use stellara_core::keys::parse_key;
///
/// let parsed = parse_key("cache:news:blockchain");
/// assert_eq!(parsed.prefix, "cache");
/// assert_eq!(parsed.parts, vec!["news", "blockchain"]);
/// ```
pub fn parse_key(key: &str) -> ParsedKey {
    let mut segments = key.split(KEY_DELIMITER).map(str::to_string);
    let prefix = segments.next().unwrap_or_default();
    ParsedKey {
        prefix,
        parts: segments.collect(),
    }
}

/// First two segments of a prefix (or key), used as the metrics bucket name.
///
/// `cache:market:snapshot:extended` becomes `cache:market`; a single
/// segment is returned unchanged.
pub fn simplified_prefix(prefix: &str) -> String {
    let mut segments = prefix.splitn(3, KEY_DELIMITER);
    match (segments.next(), segments.next()) {
        (Some(first), Some(second)) => format!("{first}{KEY_DELIMITER}{second}"),
        (Some(first), None) => first.to_string(),
        _ => String::new(),
    }
}
