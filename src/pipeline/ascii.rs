//! Non-ASCII removal.

/// Removes every character outside 7-bit ASCII.
///
/// Whitespace left behind by removed characters is collapsed, and the result
/// is trimmed.
pub fn strip_non_ascii(input: &str) -> String {
    let ascii: String = input.chars().filter(char::is_ascii).collect();
    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}
