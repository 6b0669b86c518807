//! JSON Pointer (RFC 6901) path algebra.
//!
//! Paths are compared segment-wise, never as opaque strings: `/a/bc` is not
//! a descendant of `/a/b` even though the string `/a/b` is a prefix of it.
//!
//! # Example
//!
//! ```
//! use track_changes_pointer::{is_ancestor, parse_json_pointer, reroot_pointer};
//!
//! let a = parse_json_pointer("/a/b").unwrap();
//! let c = parse_json_pointer("/a/b/c").unwrap();
//! assert!(is_ancestor(&a, &c));
//! assert!(is_ancestor(&[], &c));
//!
//! assert_eq!(reroot_pointer("/a/b/c", "/a").unwrap(), Some("/b/c".to_string()));
//! assert_eq!(reroot_pointer("/a/b", "/a/b").unwrap(), Some(String::new()));
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathRelation, PathStep};

pub mod validate;
pub use validate::{
    validate_json_pointer, validate_json_pointer_with, PointerLimits,
    MAX_PATH_LENGTH, MAX_POINTER_LENGTH,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("json pointer must be absolute or empty: {0:?}")]
    NotAbsolute(String),
    #[error("json pointer has a trailing '/': {0:?}")]
    TrailingSlash(String),
    #[error("invalid escape sequence at byte {offset} in {pointer:?}")]
    InvalidEscape { pointer: String, offset: usize },
    #[error("json pointer too long ({len} > {max})")]
    TooLong { len: usize, max: usize },
    #[error("path too deep ({depth} > {max})")]
    TooDeep { depth: usize, max: usize },
}

/// Decode one reference token: `~1` becomes `/`, then `~0` becomes `~`.
///
/// ```
/// use track_changes_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Encode one path step as a reference token.
///
/// ```
/// use track_changes_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into unescaped path components.
///
/// The pointer is validated first; see [`validate_json_pointer`].
///
/// ```
/// use track_changes_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/foo/0").unwrap(), vec!["foo", "0"]);
/// assert!(parse_json_pointer("foo").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Path, PointerError> {
    parse_json_pointer_with(pointer, &PointerLimits::default())
}

/// Parse a JSON Pointer string, validating against explicit limits.
pub fn parse_json_pointer_with(pointer: &str, limits: &PointerLimits) -> Result<Path, PointerError> {
    validate_json_pointer_with(pointer, limits)?;
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    Ok(pointer[1..].split('/').map(unescape_component).collect())
}

/// Render a path as a JSON Pointer.
///
/// The root path formats to `""`, never to `"/"`.
pub fn format_json_pointer(path: &[String]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Convert a dotted host path (`a.b.0`) to a JSON Pointer (`/a/b/0`).
///
/// Empty dotted segments are dropped, so `""` and `"."` both map to the root.
pub fn from_dotted_path(dotted: &str) -> String {
    let segments: Vec<String> = dotted
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    format_json_pointer(&segments)
}

/// Convert a parsed path back to dotted host notation.
pub fn to_dotted_path(path: &[String]) -> String {
    path.join(".")
}

/// `true` iff every segment of `ancestor` equals the segment at the same
/// index in `path`. Non-strict: every path is its own ancestor, and the
/// root is an ancestor of everything.
pub fn is_ancestor(ancestor: &[String], path: &[String]) -> bool {
    ancestor.len() <= path.len() && ancestor.iter().zip(path).all(|(a, b)| a == b)
}

/// Classify how `a` relates to `b`.
///
/// ```
/// use track_changes_pointer::{relation, PathRelation};
///
/// let a = vec!["a".to_string()];
/// let ab = vec!["a".to_string(), "b".to_string()];
/// assert_eq!(relation(&a, &ab), PathRelation::Ancestor);
/// assert_eq!(relation(&ab, &a), PathRelation::Descendant);
/// assert_eq!(relation(&a, &a), PathRelation::Equal);
/// ```
pub fn relation(a: &[String], b: &[String]) -> PathRelation {
    match (is_ancestor(a, b), is_ancestor(b, a)) {
        (true, true) => PathRelation::Equal,
        (true, false) => PathRelation::Ancestor,
        (false, true) => PathRelation::Descendant,
        (false, false) => PathRelation::Unrelated,
    }
}

/// The suffix of `path` relative to `base`, or `None` if `base` is not an
/// ancestor of `path`.
pub fn reroot<'a>(path: &'a [String], base: &[String]) -> Option<&'a [String]> {
    if !is_ancestor(base, path) {
        return None;
    }
    Some(&path[base.len()..])
}

/// [`reroot`] on pointer strings. Equal paths collapse to `""`.
pub fn reroot_pointer(pointer: &str, base: &str) -> Result<Option<String>, PointerError> {
    let path = parse_json_pointer(pointer)?;
    let base = parse_json_pointer(base)?;
    Ok(reroot(&path, &base).map(format_json_pointer))
}

/// Parse an array index step. Leading zeros are rejected, as in RFC 6901.
pub fn parse_index(step: &str) -> Option<usize> {
    if !is_valid_index(step) {
        return None;
    }
    step.parse().ok()
}

/// Whether `index` is a canonical array index: digits only, no leading zero.
///
/// ```
/// use track_changes_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}
