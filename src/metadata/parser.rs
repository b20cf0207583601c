//! Line-level descriptor parsing.
//!
//! SciScan descriptors are loosely structured: section headers, comments and
//! free text share the file with `key = value` assignments. Only lines that
//! split into exactly one key and one value are kept, everything else is
//! rejected with a [`LineError`] that the caller is expected to swallow.

use crate::error::LineError;

use super::value::{str2num, Value};

/// Placeholder the vendor writes for a key with no value.
const EMPTY_PLACEHOLDER: &str = "\"\"";

/// Characters removed from values before type inference.
///
/// Parentheses and hyphens appear as unit annotations and separators and
/// would otherwise break numeric parsing.
const STRIPPED_VALUE_CHARS: &[char] = &['(', ')', '-'];

/// Normalize a descriptor key.
///
/// Dots become underscores and a doubled underscore collapses into one. A
/// single pass is applied.
pub fn sanitize_key(key: &str) -> String {
    key.replace('.', "_").replace("__", "_")
}

/// Normalize a descriptor value before type inference.
pub fn sanitize_value(value: &str) -> String {
    value
        .replace('"', "")
        .replace("..", ".")
        .replace(STRIPPED_VALUE_CHARS, "")
}

/// Parse one descriptor line into a sanitized key and typed value.
pub fn parse_line(line: &str) -> Result<(String, Value), LineError> {
    let fields: Vec<&str> = line.split('=').collect();
    if fields.len() != 2 {
        return Err(LineError::WrongFieldCount(fields.len()));
    }

    let key = fields[0].trim();
    let value = fields[1].trim();

    if value.is_empty() || value == EMPTY_PLACEHOLDER {
        return Err(LineError::EmptyValue);
    }

    Ok((sanitize_key(key), str2num(&sanitize_value(value))))
}

// =============================================================================
// Tests
// =============================================================================
