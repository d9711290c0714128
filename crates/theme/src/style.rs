//! Style specification for a single scope

use serde::{Deserialize, Serialize};

/// Desired visual style for a scope.
///
/// Every field is optional; absent fields are left out of the assembled rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

impl StyleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foreground(color: impl Into<String>) -> Self {
        Self {
            foreground: Some(color.into()),
            ..Default::default()
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_font_style(mut self, style: impl Into<String>) -> Self {
        self.font_style = Some(style.into());
        self
    }

    /// Present attributes as `(field, value)` pairs, empty values skipped
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("foreground", self.foreground.as_deref()),
            ("background", self.background.as_deref()),
            ("font_style", self.font_style.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.attributes().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_skip_absent_and_empty() {
        let style = StyleSpec::foreground("#ff0000").with_font_style("");
        let attrs: Vec<_> = style.attributes().collect();
        assert_eq!(attrs, vec![("foreground", "#ff0000")]);
        assert!(StyleSpec::new().is_empty());
    }

    #[test]
    fn test_parse_partial_json() {
        let style: StyleSpec = serde_json::from_str(r##"{"background": "#000"}"##).unwrap();
        assert_eq!(style.background.as_deref(), Some("#000"));
        assert!(style.foreground.is_none());
    }
}
