//! Validation functions for JSON Pointer.

use crate::PointerError;

/// Default maximum allowed pointer string length.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Default maximum allowed path depth.
pub const MAX_PATH_LENGTH: usize = 256;

/// Size limits applied when validating pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerLimits {
    pub max_pointer_length: usize,
    pub max_path_depth: usize,
}

impl Default for PointerLimits {
    fn default() -> Self {
        Self {
            max_pointer_length: MAX_POINTER_LENGTH,
            max_path_depth: MAX_PATH_LENGTH,
        }
    }
}

/// Validate a JSON Pointer string against the default limits.
///
/// # Errors
///
/// Returns an error if:
/// - The pointer is non-empty but doesn't start with `/`
/// - The pointer ends with an unescaped `/`
/// - A `~` is not followed by `0` or `1`
/// - The pointer exceeds the maximum length (1024 characters)
/// - The path is deeper than the maximum depth (256 steps)
///
/// # Example
///
/// ```
/// use track_changes_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();  // Root is valid
/// validate_json_pointer("/foo/bar").unwrap();  // Valid absolute pointer
/// validate_json_pointer("foo").unwrap_err();  // Missing leading /
/// validate_json_pointer("/foo/").unwrap_err();  // Trailing /
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), PointerError> {
    validate_json_pointer_with(pointer, &PointerLimits::default())
}

/// Validate a JSON Pointer string against explicit limits.
pub fn validate_json_pointer_with(pointer: &str, limits: &PointerLimits) -> Result<(), PointerError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(PointerError::NotAbsolute(pointer.to_string()));
    }
    if pointer.len() > limits.max_pointer_length {
        return Err(PointerError::TooLong {
            len: pointer.len(),
            max: limits.max_pointer_length,
        });
    }
    if pointer.ends_with('/') {
        return Err(PointerError::TrailingSlash(pointer.to_string()));
    }
    let bytes = pointer.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'~' && !matches!(bytes.get(i + 1), Some(b'0') | Some(b'1')) {
            return Err(PointerError::InvalidEscape {
                pointer: pointer.to_string(),
                offset: i,
            });
        }
    }
    let depth = bytes.iter().filter(|&&b| b == b'/').count();
    if depth > limits.max_path_depth {
        return Err(PointerError::TooDeep {
            depth,
            max: limits.max_path_depth,
        });
    }
    Ok(())
}
