//! Generation pass errors

use theme::ThemeError;

/// Error that aborts a generation pass
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    /// The engine cannot handle this scheme file type
    #[error("Unsupported color scheme extension: {0:?}")]
    UnsupportedExtension(String),
    #[error("Resource {path} did not load as {expected}")]
    UnexpectedResource { path: String, expected: &'static str },
    #[error("Style definitions unavailable: {0}")]
    Styles(String),
    #[error("No tokio runtime available to run the generation pass")]
    NoRuntime,
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

pub type Result<T, E = SchemeError> = std::result::Result<T, E>;
