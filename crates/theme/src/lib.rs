//! # Theme
//!
//! Color scheme documents as the editor stores them on disk.
//! Two formats are supported:
//! - legacy property list themes (`.tmTheme`, `.hidden-tmTheme`)
//! - JSON color schemes (`.sublime-color-scheme`)
//!
//! Both share the same scope diffing semantics; see [`plist::missing_scopes`]
//! and [`color_scheme::missing_scopes`].

pub mod color;
pub mod color_scheme;
pub mod error;
pub mod plist;
pub mod scope;
pub mod style;

pub use color_scheme::{ColorSchemeDocument, Rule};
pub use error::ThemeError;
pub use plist::PlistNode;
pub use scope::ScopeKind;
pub use style::StyleSpec;

/// On-disk scheme format, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeFormat {
    /// XML property list (`*.tmTheme`, `*.hidden-tmTheme`)
    Plist,
    /// JSON rule list (`*.sublime-color-scheme`)
    ColorScheme,
}

impl SchemeFormat {
    /// Extension of JSON color schemes, including the leading dot
    pub const COLOR_SCHEME_EXT: &'static str = ".sublime-color-scheme";

    /// Classify an extension (with or without the leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{ext}")
        };

        if ext == Self::COLOR_SCHEME_EXT {
            Some(Self::ColorScheme)
        } else if ext.ends_with("tmTheme") {
            Some(Self::Plist)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SchemeFormat::from_extension(".tmTheme"), Some(SchemeFormat::Plist));
        assert_eq!(SchemeFormat::from_extension(".hidden-tmTheme"), Some(SchemeFormat::Plist));
        assert_eq!(
            SchemeFormat::from_extension("sublime-color-scheme"),
            Some(SchemeFormat::ColorScheme)
        );
        assert_eq!(SchemeFormat::from_extension(".json"), None);
        assert_eq!(SchemeFormat::from_extension(""), None);
    }
}
