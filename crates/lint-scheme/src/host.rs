//! Editor host port

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::PACKAGES_PREFIX;

/// A loaded package resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Raw text, as plist themes are loaded
    Text(String),
    /// Parsed JSON, as `.sublime-color-scheme` resources are loaded
    Structured(Value),
}

impl Resource {
    pub fn text(&self) -> Option<&str> {
        match self {
            Resource::Text(text) => Some(text),
            Resource::Structured(_) => None,
        }
    }

    /// The resource as JSON; text is parsed with comments allowed
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Resource::Text(text) => settings::parse_jsonc(text),
            Resource::Structured(value) => Ok(value.clone()),
        }
    }
}

/// What the scheme generator needs from the editor
pub trait Host: Send + Sync {
    /// Host build number
    fn version(&self) -> u32;

    /// Absolute path of the `Packages` directory
    fn packages_path(&self) -> PathBuf;

    /// Load a `Packages/...` resource
    fn load_resource(&self, path: &str) -> anyhow::Result<Resource>;

    /// `Packages/...` paths of resources whose file name matches `pattern`
    fn find_resources(&self, pattern: &str) -> Vec<String>;
}

/// Host backed by a plain `Packages` directory
#[derive(Debug, Clone)]
pub struct DirHost {
    packages: PathBuf,
    version: u32,
}

impl DirHost {
    pub fn new(packages: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            packages: packages.into(),
            version,
        }
    }

    /// Filesystem location of a `Packages/...` resource path
    pub fn resource_file(&self, path: &str) -> anyhow::Result<PathBuf> {
        let relative = path
            .strip_prefix(PACKAGES_PREFIX)
            .ok_or_else(|| anyhow::anyhow!("Not a package resource: {}", path))?;
        Ok(self.packages.join(relative))
    }

    fn resource_path(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.packages).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(format!("{}{}", PACKAGES_PREFIX, parts.join("/")))
    }
}

impl Host for DirHost {
    fn version(&self) -> u32 {
        self.version
    }

    fn packages_path(&self) -> PathBuf {
        self.packages.clone()
    }

    fn load_resource(&self, path: &str) -> anyhow::Result<Resource> {
        let file = self.resource_file(path)?;
        let text = fs::read_to_string(&file)
            .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), e))?;

        if path.ends_with(theme::SchemeFormat::COLOR_SCHEME_EXT) {
            Ok(Resource::Structured(settings::parse_jsonc(&text)?))
        } else {
            Ok(Resource::Text(text))
        }
    }

    fn find_resources(&self, pattern: &str) -> Vec<String> {
        let matcher = match globset::Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher(),
            Err(e) => {
                tracing::warn!("Bad resource pattern {:?}: {}", pattern, e);
                return Vec::new();
            }
        };

        let mut found: Vec<String> = walkdir::WalkDir::new(&self.packages)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && matcher.is_match(e.file_name()))
            .filter_map(|e| self.resource_path(e.path()))
            .collect();
        found.sort();
        found
    }
}
