//! The engine trait and the pass orchestration it provides

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use settings::{Preferences, PrefsWatcher};
use theme::StyleSpec;

use crate::config::SchemeConfig;
use crate::error::{Result, SchemeError};
use crate::host::Host;
use crate::notice::{LogNotifier, Notifier};
use crate::paths::{self, PathSet};
use crate::registry::Registry;
use crate::style::StyleSource;
use crate::switcher;

/// Everything a pass talks to
#[derive(Clone)]
pub struct SchemeContext {
    pub host: Arc<dyn Host>,
    pub prefs: Arc<dyn Preferences>,
    pub styles: Arc<dyn StyleSource>,
    pub notifier: Arc<dyn Notifier>,
    /// Paused while a pass triggered by a preference reload runs
    pub watcher: Option<Arc<PrefsWatcher>>,
    pub config: SchemeConfig,
}

impl SchemeContext {
    pub fn new(
        host: Arc<dyn Host>,
        prefs: Arc<dyn Preferences>,
        styles: Arc<dyn StyleSource>,
    ) -> Self {
        Self {
            host,
            prefs,
            styles,
            notifier: Arc::new(LogNotifier),
            watcher: None,
            config: SchemeConfig::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_watcher(mut self, watcher: Arc<PrefsWatcher>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    pub fn with_config(mut self, config: SchemeConfig) -> Self {
        self.config = config;
        self
    }
}

/// Why a pass did nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Preferences could not be loaded or parsed
    InvalidPreferences(String),
    /// `color_scheme` is unset or empty
    NoColorScheme,
}

impl SkipReason {
    pub(crate) fn log(&self) {
        match self {
            SkipReason::InvalidPreferences(_) => tracing::warn!("Skipping color scheme pass: {}", self),
            SkipReason::NoColorScheme => tracing::debug!("Skipping color scheme pass: {}", self),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidPreferences(e) => write!(f, "preferences unavailable ({})", e),
            SkipReason::NoColorScheme => write!(f, "no color scheme set"),
        }
    }
}

/// What a pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// Nothing to add and no earlier output to refresh
    Unchanged,
    Written {
        path: PathBuf,
        /// Whether `color_scheme` was changed
        switched: bool,
        /// Required static scopes the user has to add by hand
        unfound: Vec<String>,
    },
}

/// A color scheme generator for one output format.
///
/// Implementors supply node assembly and the format specific write; a whole
/// pass is [`SchemeEngine::run_pass`].
pub trait SchemeEngine {
    /// An assembled rule in this engine's format
    type Node;

    fn context(&self) -> &SchemeContext;

    /// Assemble one rule and file it in `registry`
    fn assemble_node(
        &self,
        registry: &mut Registry<Self::Node>,
        scope: &str,
        style: &StyleSpec,
        name: Option<&str>,
    );

    /// Diff, write and switch
    fn generate_color_scheme(
        &self,
        paths: &PathSet,
        registry: &Registry<Self::Node>,
    ) -> Result<Outcome>;

    /// Assemble every style the style source currently defines
    fn build_registry(&self) -> Result<Registry<Self::Node>> {
        let styles = self
            .context()
            .styles
            .create_styles()
            .map_err(|e| SchemeError::Styles(e.to_string()))?;

        let mut registry = Registry::new();
        for def in &styles {
            self.assemble_node(&mut registry, &def.scope, &def.style, def.name.as_deref());
        }
        Ok(registry)
    }

    /// One full generation pass
    fn run_pass(&self) -> Result<Outcome> {
        let paths = match paths::resolve(self.context()) {
            Ok(paths) => paths,
            Err(reason) => {
                reason.log();
                return Ok(Outcome::Skipped(reason));
            }
        };

        let registry = self.build_registry()?;
        tracing::debug!(
            "Generating from {} with {} static and {} dynamic styles",
            paths.scheme_orig,
            registry.static_nodes.len(),
            registry.dynamic_nodes.len()
        );

        self.generate_color_scheme(&paths, &registry)
    }

    fn set_scheme_path(&self, new_path: &str) -> Result<bool> {
        Ok(switcher::set_scheme_path(self.context().prefs.as_ref(), new_path)?)
    }

    /// Tell the user which scopes they have to add themselves
    fn unfound_scopes_dialogue(&self, unfound: &[String]) {
        if !unfound.is_empty() {
            self.context().notifier.unfound_scopes(unfound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleDefinition;
    use crate::testing::{context, MemoryHost, RecordingPrefs};
    use crate::xml::XmlScheme;

    #[test]
    fn test_build_registry() {
        let styles = vec![
            StyleDefinition::new("sublimelinter.mark.error", StyleSpec::foreground("#f00")),
            StyleDefinition::new("sublimelinter.gutter.style_001", StyleSpec::foreground("#0f0"))
                .with_name("Gutter"),
        ];
        let ctx = context(
            Arc::new(MemoryHost::new(3143)),
            Arc::new(RecordingPrefs::default()),
            styles,
        );

        let registry = XmlScheme::new(ctx).build_registry().unwrap();
        assert_eq!(registry.static_nodes["sublimelinter.mark.error"].name, "sublimelinter.mark.error");
        assert_eq!(registry.dynamic_nodes["sublimelinter.gutter.style_001"].name, "Gutter");
    }

    struct FailingStyles;

    impl StyleSource for FailingStyles {
        fn create_styles(&self) -> anyhow::Result<Vec<StyleDefinition>> {
            anyhow::bail!("style file unreadable")
        }
    }

    #[test]
    fn test_style_failure_aborts_pass() {
        let ctx = SchemeContext::new(
            Arc::new(MemoryHost::new(3143).with_resource("Packages/T/A.tmTheme", "<plist/>")),
            Arc::new(RecordingPrefs::with_scheme("Packages/T/A.tmTheme")),
            Arc::new(FailingStyles),
        );

        let err = XmlScheme::new(ctx).run_pass().unwrap_err();
        assert!(matches!(err, SchemeError::Styles(_)));
    }

    #[test]
    fn test_skipped_pass() {
        let ctx = context(
            Arc::new(MemoryHost::new(3143)),
            Arc::new(RecordingPrefs::default()),
            Vec::new(),
        );
        assert_eq!(
            XmlScheme::new(ctx).run_pass().unwrap(),
            Outcome::Skipped(SkipReason::NoColorScheme)
        );
    }
}
