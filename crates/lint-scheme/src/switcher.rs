//! Active color scheme switching

use serde_json::Value;
use settings::{Preferences, COLOR_SCHEME};

/// Point the `color_scheme` preference at `new_path`.
///
/// Preferences are only saved when the value changes. Returns whether it did.
pub fn set_scheme_path(prefs: &dyn Preferences, new_path: &str) -> anyhow::Result<bool> {
    if prefs.get_string(COLOR_SCHEME).as_deref() == Some(new_path) {
        tracing::info!("Old scheme path detected. Pass.");
        return Ok(false);
    }

    prefs.set(COLOR_SCHEME, Value::String(new_path.to_string()));
    prefs.save()?;
    tracing::info!("Switched color scheme to {}", new_path);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPrefs;

    #[test]
    fn test_unchanged_path_does_not_save() {
        let prefs = RecordingPrefs::with_scheme("Packages/Theme/Mariana.tmTheme");

        let switched = set_scheme_path(&prefs, "Packages/Theme/Mariana.tmTheme").unwrap();
        assert!(!switched);
        assert_eq!(prefs.saves(), 0);
    }

    #[test]
    fn test_new_path_saves() {
        let prefs = RecordingPrefs::with_scheme("Packages/Theme/Mariana.tmTheme");
        let new_path = "Packages/User/SublimeLinter/Mariana (SL).hidden-tmTheme";

        assert!(set_scheme_path(&prefs, new_path).unwrap());
        assert_eq!(prefs.saves(), 1);
        assert_eq!(prefs.get_string(COLOR_SCHEME).as_deref(), Some(new_path));

        assert!(!set_scheme_path(&prefs, new_path).unwrap());
        assert_eq!(prefs.saves(), 1);
    }
}
