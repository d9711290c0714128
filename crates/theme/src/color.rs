//! Color value helpers

/// Normalize a color value for plist output.
///
/// Plist consumers compare color strings case-sensitively, so every color
/// written into a property list is uppercased. Non-hex values pass through
/// uppercased as well.
pub fn normalize_hex(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Whether a value looks like a `#`-prefixed color definition
pub fn is_hex_color(value: &str) -> bool {
    let value = value.trim();
    value.len() > 1 && value.starts_with('#')
}
