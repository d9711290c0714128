//! User-facing notices

/// Sink for messages the user has to act on
pub trait Notifier: Send + Sync {
    /// Required static scopes are absent from the color scheme
    fn unfound_scopes(&self, scopes: &[String]);
}

/// Reports notices through the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn unfound_scopes(&self, scopes: &[String]) {
        tracing::warn!("{}", unfound_message(scopes));
    }
}

/// Text shown for scopes the user must add by hand
pub fn unfound_message(scopes: &[String]) -> String {
    format!(
        "The following scopes have not been found in the color scheme:\n{}",
        scopes.join("\n")
    )
}
