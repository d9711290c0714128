//! Errors raised while reading or rewriting scheme documents

/// Scheme document error
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Invalid plist markup: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Plist has no rule array under its top-level dict")]
    MissingRuleArray,
    #[error("Invalid color scheme JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Color scheme root must be a JSON object")]
    NotAnObject,
}
