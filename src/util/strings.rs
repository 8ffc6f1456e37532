//! String helpers for schema names

use crate::error::{DriverError, DriverResult};

/// Maximum schema name length in bytes (exclusive)
pub const MAX_NAME_LENGTH: usize = 256;

/// Check a schema name (property key, label, index or graph name).
///
/// Names must be non-empty, shorter than [`MAX_NAME_LENGTH`] bytes, must not
/// start with `_` and must not contain the `\u{1}`/`\u{2}` characters the
/// server uses as field separators.
pub fn check_name(name: &str) -> DriverResult<()> {
    if name.is_empty() {
        return Err(DriverError::Validation("name can't be empty".to_string()));
    }
    if name.len() >= MAX_NAME_LENGTH {
        return Err(DriverError::Validation(format!(
            "the length of name must be less than {} bytes, but got {}",
            MAX_NAME_LENGTH,
            name.len()
        )));
    }
    if name.starts_with('_') {
        return Err(DriverError::Validation(format!(
            "the first letter of name can't be '_': '{}'",
            name
        )));
    }
    for reserved in ['\u{1}', '\u{2}'] {
        if name.contains(reserved) {
            return Err(DriverError::Validation(format!(
                "name can't contain the character '{}'",
                reserved.escape_unicode()
            )));
        }
    }
    Ok(())
}

/// Render a schema description fragment such as `.properties("name","age")`.
///
/// `None` renders nothing at all.
pub fn describe_schema<S: AsRef<str>>(prefix: &str, elems: Option<&[S]>) -> String {
    let Some(elems) = elems else {
        return String::new();
    };
    let quoted: Vec<String> = elems
        .iter()
        .map(|elem| format!("\"{}\"", elem.as_ref()))
        .collect();
    format!(".{}({})", prefix, quoted.join(","))
}
