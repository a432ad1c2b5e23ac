//! Lenient boolean vocabulary for externally produced flags.

use serde_json::Value;

/// Case-insensitive spellings accepted as `true`. Everything else is `false`.
pub const TRUTHY_FLAG_VALUES: [&str; 4] = ["true", "1", "yes", "y"];

/// Returns true when `raw` (trimmed, case-insensitive) is in the truthy vocabulary.
pub fn is_truthy_flag(raw: &str) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    TRUTHY_FLAG_VALUES.contains(&normalized.as_str())
}

/// Applies the flag vocabulary to a loosely typed JSON cell.
///
/// Native booleans pass through, numbers count as `true` only when equal to 1,
/// strings go through [`is_truthy_flag`], and null/arrays/objects are `false`.
pub fn is_truthy_value(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64() == Some(1.0),
        Some(Value::String(raw)) => is_truthy_flag(raw),
        _ => false,
    }
}
