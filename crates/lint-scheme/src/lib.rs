//! # Lint Scheme
//!
//! Keeps the editor's color scheme able to render lint highlights.
//!
//! Each pass reads the active color scheme, checks which of the required
//! lint scopes it already defines, and writes a derived scheme carrying the
//! generated per-style rules:
//! - hosts that read JSON color schemes get a `User/<name>.sublime-color-scheme`
//!   override ([`JsonScheme`])
//! - older hosts get a full copy of the plist theme under
//!   `User/SublimeLinter/` and are switched over to it ([`XmlScheme`])
//!
//! Scopes the generator cannot provide itself are reported through a
//! [`Notifier`].

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod json;
pub mod notice;
pub mod paths;
pub mod registry;
pub mod style;
pub mod switcher;
pub mod xml;

use std::sync::Arc;

use theme::SchemeFormat;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub use config::SchemeConfig;
pub use engine::{Outcome, SchemeContext, SchemeEngine, SkipReason};
pub use error::{Result, SchemeError};
pub use host::{DirHost, Host, Resource};
pub use json::JsonScheme;
pub use notice::{LogNotifier, Notifier};
pub use paths::PathSet;
pub use registry::Registry;
pub use style::{JsonStyleSource, StyleDefinition, StyleSource};
pub use xml::XmlScheme;

/// Prefix of every package resource path
pub const PACKAGES_PREFIX: &str = "Packages/";

/// The engine matching the host
pub enum Scheme {
    Xml(XmlScheme),
    Json(JsonScheme),
}

impl Scheme {
    /// Pick the engine for the host version and configuration
    pub fn init(ctx: SchemeContext) -> Self {
        let version = ctx.host.version();
        if ctx.config.uses_json(version) {
            tracing::debug!("Host {} reads JSON color schemes", version);
            Scheme::Json(JsonScheme::new(ctx))
        } else {
            tracing::debug!("Host {} gets plist themes", version);
            Scheme::Xml(XmlScheme::new(ctx))
        }
    }

    /// Like [`Scheme::init`], optionally forcing the plist engine
    pub fn init_scheme(mut ctx: SchemeContext, force_xml: bool) -> Self {
        ctx.config.force_xml_scheme |= force_xml;
        Self::init(ctx)
    }

    pub fn format(&self) -> SchemeFormat {
        match self {
            Scheme::Xml(_) => SchemeFormat::Plist,
            Scheme::Json(_) => SchemeFormat::ColorScheme,
        }
    }

    pub fn context(&self) -> &SchemeContext {
        match self {
            Scheme::Xml(engine) => engine.context(),
            Scheme::Json(engine) => engine.context(),
        }
    }

    /// Run one pass on the current thread
    pub fn run_pass(&self) -> Result<Outcome> {
        match self {
            Scheme::Xml(engine) => engine.run_pass(),
            Scheme::Json(engine) => engine.run_pass(),
        }
    }

    /// Schedule a pass on the blocking pool.
    ///
    /// Returns `None` when the preferences leave nothing to do. With
    /// `from_reload` set, preference change dispatch stays paused until the
    /// pass finishes so the pass's own `color_scheme` update does not
    /// trigger another one.
    pub fn generate(self: &Arc<Self>, from_reload: bool) -> Result<Option<JoinHandle<Result<Outcome>>>> {
        let runtime = Handle::try_current().map_err(|_| SchemeError::NoRuntime)?;

        if let Err(reason) = paths::resolve(self.context()) {
            reason.log();
            return Ok(None);
        }

        let guard = if from_reload {
            self.context().watcher.as_ref().map(|watcher| watcher.pause())
        } else {
            None
        };

        let scheme = Arc::clone(self);
        let handle = runtime.spawn_blocking(move || {
            let _guard = guard;
            scheme.run_pass()
        });

        Ok(Some(handle))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use serde_json::Value;
    use settings::{COLOR_SCHEME, Preferences};
    use theme::SchemeFormat;

    use crate::engine::SchemeContext;
    use crate::host::{Host, Resource};
    use crate::notice::Notifier;
    use crate::style::StyleDefinition;

    /// Host serving resources from memory, with a scratch `Packages` dir
    pub struct MemoryHost {
        version: u32,
        resources: BTreeMap<String, String>,
        packages: tempfile::TempDir,
    }

    impl MemoryHost {
        pub fn new(version: u32) -> Self {
            Self {
                version,
                resources: BTreeMap::new(),
                packages: tempfile::tempdir().unwrap(),
            }
        }

        pub fn with_resource(mut self, path: &str, text: &str) -> Self {
            self.resources.insert(path.to_string(), text.to_string());
            self
        }
    }

    impl Host for MemoryHost {
        fn version(&self) -> u32 {
            self.version
        }

        fn packages_path(&self) -> PathBuf {
            self.packages.path().to_path_buf()
        }

        fn load_resource(&self, path: &str) -> anyhow::Result<Resource> {
            let text = self
                .resources
                .get(path)
                .ok_or_else(|| anyhow::anyhow!("resource not found: {}", path))?;
            if path.ends_with(SchemeFormat::COLOR_SCHEME_EXT) {
                Ok(Resource::Structured(settings::parse_jsonc(text)?))
            } else {
                Ok(Resource::Text(text.clone()))
            }
        }

        fn find_resources(&self, pattern: &str) -> Vec<String> {
            let matcher = globset::Glob::new(pattern).unwrap().compile_matcher();
            self.resources
                .keys()
                .filter(|path| matcher.is_match(path.rsplit('/').next().unwrap_or(path)))
                .cloned()
                .collect()
        }
    }

    /// In-memory preferences counting saves
    #[derive(Default)]
    pub struct RecordingPrefs {
        values: Mutex<BTreeMap<String, Value>>,
        saves: AtomicUsize,
        broken: AtomicBool,
    }

    impl RecordingPrefs {
        pub fn with_scheme(scheme: &str) -> Self {
            let prefs = Self::default();
            prefs
                .values
                .lock()
                .insert(COLOR_SCHEME.to_string(), Value::String(scheme.to_string()));
            prefs
        }

        pub fn fail_reload(&self) {
            self.broken.store(true, Ordering::SeqCst);
        }

        pub fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl Preferences for RecordingPrefs {
        fn get(&self, key: &str) -> Option<Value> {
            self.values.lock().get(key).cloned()
        }

        fn set(&self, key: &str, value: Value) {
            self.values.lock().insert(key.to_string(), value);
        }

        fn save(&self) -> anyhow::Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn reload(&self) -> anyhow::Result<()> {
            if self.broken.load(Ordering::SeqCst) {
                anyhow::bail!("Preferences.sublime-settings: expected value at line 1");
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct RecordingNotifier {
        reports: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingNotifier {
        pub fn reports(&self) -> Vec<Vec<String>> {
            self.reports.lock().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn unfound_scopes(&self, scopes: &[String]) {
            self.reports.lock().push(scopes.to_vec());
        }
    }

    pub fn context(
        host: Arc<MemoryHost>,
        prefs: Arc<RecordingPrefs>,
        styles: Vec<StyleDefinition>,
    ) -> SchemeContext {
        SchemeContext::new(host, prefs, Arc::new(styles))
    }
}
