//! Meter identifier normalization.

/// Keep only the ASCII digits of a meter identifier, so that `#00-123` and `00123` compare equal.
/// Leading zeroes are significant and kept.
pub fn normalize_meter_id(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
