//! Scope names and their classification

use once_cell::sync::Lazy;
use regex::Regex;

/// Auto-generated scope, one per distinct computed style
static DYNAMIC_SCOPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sublimelinter\.\w+?\.style_\d{3,}").expect("valid regex"));

/// Same pattern anchored at the start of the scope name
static DYNAMIC_SCOPE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sublimelinter\.\w+?\.style_\d{3,}").expect("valid regex"));

/// Scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Fixed scope name from the plugin's style definitions
    Static,
    /// Versioned scope name regenerated on every pass
    Dynamic,
}

impl ScopeKind {
    /// Classify a scope name
    pub fn of(scope: &str) -> Self {
        if is_dynamic(scope) {
            ScopeKind::Dynamic
        } else {
            ScopeKind::Static
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ScopeKind::Dynamic)
    }
}

/// `sublimelinter.<word>.style_<nnn>` at the start of `scope`
pub fn is_dynamic(scope: &str) -> bool {
    DYNAMIC_SCOPE_PREFIX.is_match(scope)
}

/// Whether a rule's scope field refers to a dynamic scope anywhere in it
pub fn mentions_dynamic(scope_field: &str) -> bool {
    DYNAMIC_SCOPE.is_match(scope_field)
}

/// Scopes declared by one rule's `scope` field.
///
/// A field may list several scopes separated by whitespace or by the commas of
/// a selector list. Commas are separators too, unlike a plain whitespace
/// split: `"comment, string"` declares `comment`, not `comment,`.
pub fn declared_scopes(scope_field: &str) -> impl Iterator<Item = &str> {
    scope_field
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_classification() {
        assert_eq!(ScopeKind::of("sublimelinter.gutter.style_001"), ScopeKind::Dynamic);
        assert_eq!(ScopeKind::of("sublimelinter.mark.style_12345"), ScopeKind::Dynamic);
        assert_eq!(ScopeKind::of("sublimelinter.mark.error"), ScopeKind::Static);
        // two digits are not enough
        assert_eq!(ScopeKind::of("sublimelinter.mark.style_01"), ScopeKind::Static);
        // must start the scope name
        assert_eq!(ScopeKind::of("region.sublimelinter.mark.style_001"), ScopeKind::Static);
        assert_eq!(ScopeKind::of("markup.sublimelinter.mark.error"), ScopeKind::Static);
    }

    #[test]
    fn test_mentions_dynamic() {
        assert!(mentions_dynamic("comment sublimelinter.gutter.style_002"));
        assert!(mentions_dynamic("sublimelinter.mark.style_100"));
        assert!(!mentions_dynamic("sublimelinter.mark.warning"));
    }

    #[test]
    fn test_declared_scopes() {
        let scopes: Vec<_> = declared_scopes("  comment  string.quoted,keyword ").collect();
        assert_eq!(scopes, vec!["comment", "string.quoted", "keyword"]);
        assert_eq!(declared_scopes("").count(), 0);

        let listed: Vec<_> = declared_scopes("comment, sublimelinter.mark.error").collect();
        assert_eq!(listed, vec!["comment", "sublimelinter.mark.error"]);
    }
}
