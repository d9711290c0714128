//! Path resolution for a generation pass

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::{SchemeContext, SkipReason};
use crate::host::Host;
use crate::PACKAGES_PREFIX;

/// Markers this crate adds to derived theme file names
static DERIVED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r" ?\(SL\) ?|hidden-").expect("valid regex"));

/// Paths a pass reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    /// Active `color_scheme` as found in the preferences
    pub scheme: String,
    /// Resource path of the theme the active one was derived from
    pub scheme_orig: String,
    /// File name of `scheme_orig`, derived-name markers removed
    pub scheme_base: String,
    /// `scheme_base` without its extension
    pub scheme_name: String,
    /// Extension of `scheme_base`, leading dot included
    pub ext: String,
    /// `<packages>/User`
    pub usr_dir: PathBuf,
    /// Plist output directory relative to `<packages>`
    pub usr_dir_rel: PathBuf,
    /// Plist output directory
    pub usr_dir_abs: PathBuf,
}

/// Work out the pass paths from the preferences.
///
/// Unloadable preferences and an unset or empty `color_scheme` skip the pass.
pub fn resolve(ctx: &SchemeContext) -> Result<PathSet, SkipReason> {
    if let Err(e) = ctx.prefs.reload() {
        return Err(SkipReason::InvalidPreferences(e.to_string()));
    }

    let scheme = ctx
        .prefs
        .get_string(settings::COLOR_SCHEME)
        .filter(|s| !s.is_empty())
        .ok_or(SkipReason::NoColorScheme)?;

    let scheme_orig = get_original_theme(ctx.host.as_ref(), &scheme, &ctx.config.user_subdir);
    let scheme_base = DERIVED_MARKER
        .replace_all(base_name(&scheme_orig), "")
        .into_owned();
    let (scheme_name, ext) = match scheme_base.rfind('.') {
        Some(dot) if dot > 0 => (scheme_base[..dot].to_string(), scheme_base[dot..].to_string()),
        _ => (scheme_base.clone(), String::new()),
    };

    let packages = ctx.host.packages_path();
    let usr_dir_rel = Path::new("User").join(&ctx.config.user_subdir);

    Ok(PathSet {
        scheme,
        scheme_orig,
        scheme_base,
        scheme_name,
        ext,
        usr_dir: packages.join("User"),
        usr_dir_abs: packages.join(&usr_dir_rel),
        usr_dir_rel,
    })
}

fn base_name(resource: &str) -> &str {
    resource.rsplit('/').next().unwrap_or(resource)
}

/// Resource path of the theme `current` was derived from.
///
/// Strips the markers of derived file names and looks the name up among the
/// package resources. Themes shipped by packages win over the user's own
/// themes; anything in the generator's output directory
/// (`Packages/User/<user_subdir>/`) is never an original. Falls back to
/// `current` when nothing else matches.
pub fn get_original_theme(host: &dyn Host, current: &str, user_subdir: &str) -> String {
    let name = DERIVED_MARKER.replace_all(base_name(current), "");
    let user = format!("{}User/", PACKAGES_PREFIX);
    let output = format!("{}{}/", user, user_subdir);

    let candidates: Vec<String> = host
        .find_resources(&name)
        .into_iter()
        .filter(|candidate| !candidate.starts_with(&output))
        .collect();
    let original = candidates
        .iter()
        .find(|candidate| !candidate.starts_with(&user))
        .or_else(|| candidates.first())
        .cloned();

    match original {
        Some(original) => {
            tracing::debug!("Original theme of {} is {}", current, original);
            original
        }
        None => current.to_string(),
    }
}

/// `/`-separated `Packages/...` resource path of a path relative to `<packages>`
pub fn packages_relative_path(relative: &Path) -> String {
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("{}{}", PACKAGES_PREFIX, parts.join("/"))
}

/// Create `dir` and any missing parents
pub fn touch_dir(dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        tracing::debug!("Creating {}", dir.display());
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MemoryHost, RecordingPrefs};
    use std::sync::Arc;

    const SUBDIR: &str = "SublimeLinter";

    fn host() -> MemoryHost {
        MemoryHost::new(4126)
            .with_resource("Packages/Color Scheme - Default/Mariana.sublime-color-scheme", "{}")
            .with_resource("Packages/Theme/Mariana.tmTheme", "<plist/>")
            .with_resource("Packages/User/SublimeLinter/Mariana (SL).hidden-tmTheme", "<plist/>")
    }

    #[test]
    fn test_get_original_theme_strips_markers() {
        let host = host();
        assert_eq!(
            get_original_theme(&host, "Packages/User/SublimeLinter/Mariana (SL).hidden-tmTheme", SUBDIR),
            "Packages/Theme/Mariana.tmTheme"
        );
        assert_eq!(
            get_original_theme(&host, "Packages/Theme/Mariana.tmTheme", SUBDIR),
            "Packages/Theme/Mariana.tmTheme"
        );
    }

    #[test]
    fn test_get_original_theme_falls_back() {
        let host = host();
        assert_eq!(
            get_original_theme(&host, "Packages/User/Custom.tmTheme", SUBDIR),
            "Packages/User/Custom.tmTheme"
        );
    }

    #[test]
    fn test_get_original_theme_of_user_theme() {
        let host = host()
            .with_resource("Packages/User/Custom.tmTheme", "<plist/>")
            .with_resource("Packages/User/SublimeLinter/Custom (SL).hidden-tmTheme", "<plist/>");

        assert_eq!(
            get_original_theme(&host, "Packages/User/SublimeLinter/Custom (SL).hidden-tmTheme", SUBDIR),
            "Packages/User/Custom.tmTheme"
        );
        assert_eq!(
            get_original_theme(&host, "Packages/User/Custom.tmTheme", SUBDIR),
            "Packages/User/Custom.tmTheme"
        );
    }

    #[test]
    fn test_resolve_without_original_strips_markers() {
        let derived = "Packages/User/SublimeLinter/Gone (SL).hidden-tmTheme";
        let host = Arc::new(host().with_resource(derived, "<plist/>"));
        let prefs = Arc::new(RecordingPrefs::with_scheme(derived));
        let ctx = context(host, prefs, Vec::new());

        let paths = resolve(&ctx).unwrap();
        assert_eq!(paths.scheme_orig, derived);
        assert_eq!(paths.scheme_base, "Gone.tmTheme");
        assert_eq!(paths.scheme_name, "Gone");
        assert_eq!(paths.ext, ".tmTheme");
    }

    #[test]
    fn test_resolve() {
        let host = Arc::new(host());
        let prefs = Arc::new(RecordingPrefs::with_scheme(
            "Packages/Color Scheme - Default/Mariana.sublime-color-scheme",
        ));
        let ctx = context(host.clone(), prefs, Vec::new());

        let paths = resolve(&ctx).unwrap();
        assert_eq!(paths.scheme_base, "Mariana.sublime-color-scheme");
        assert_eq!(paths.scheme_name, "Mariana");
        assert_eq!(paths.ext, ".sublime-color-scheme");
        assert_eq!(paths.usr_dir, host.packages_path().join("User"));
        assert_eq!(
            paths.usr_dir_abs,
            host.packages_path().join("User").join("SublimeLinter")
        );
    }

    #[test]
    fn test_resolve_skips() {
        let host = Arc::new(host());

        let unset = Arc::new(RecordingPrefs::default());
        let ctx = context(host.clone(), unset, Vec::new());
        assert_eq!(resolve(&ctx), Err(SkipReason::NoColorScheme));

        let empty = Arc::new(RecordingPrefs::with_scheme(""));
        let ctx = context(host.clone(), empty, Vec::new());
        assert_eq!(resolve(&ctx), Err(SkipReason::NoColorScheme));

        let broken = Arc::new(RecordingPrefs::with_scheme("Packages/Theme/Mariana.tmTheme"));
        broken.fail_reload();
        let ctx = context(host, broken, Vec::new());
        assert!(matches!(resolve(&ctx), Err(SkipReason::InvalidPreferences(_))));
    }

    #[test]
    fn test_packages_relative_path() {
        let rel = Path::new("User")
            .join("SublimeLinter")
            .join("Mariana (SL).hidden-tmTheme");
        assert_eq!(
            packages_relative_path(&rel),
            "Packages/User/SublimeLinter/Mariana (SL).hidden-tmTheme"
        );
    }

    #[test]
    fn test_touch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("User").join("SublimeLinter");
        touch_dir(&nested).unwrap();
        assert!(nested.is_dir());
        touch_dir(&nested).unwrap();
    }
}
