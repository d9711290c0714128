//! Style definition sources

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use serde::Deserialize;
use theme::StyleSpec;

/// A style the plugin wants present in the color scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDefinition {
    pub scope: String,
    /// Rule name; the scope is used when absent
    pub name: Option<String>,
    pub style: StyleSpec,
}

impl StyleDefinition {
    pub fn new(scope: impl Into<String>, style: StyleSpec) -> Self {
        Self {
            scope: scope.into(),
            name: None,
            style,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Produces the styles to merge into the scheme, once per pass
pub trait StyleSource: Send + Sync {
    fn create_styles(&self) -> anyhow::Result<Vec<StyleDefinition>>;
}

impl StyleSource for BTreeMap<String, StyleSpec> {
    fn create_styles(&self) -> anyhow::Result<Vec<StyleDefinition>> {
        Ok(self
            .iter()
            .map(|(scope, style)| StyleDefinition::new(scope.clone(), style.clone()))
            .collect())
    }
}

impl StyleSource for Vec<StyleDefinition> {
    fn create_styles(&self) -> anyhow::Result<Vec<StyleDefinition>> {
        Ok(self.clone())
    }
}

#[derive(Deserialize)]
struct StyleEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    style: StyleSpec,
}

/// Styles read from a JSON file mapping scope to style:
///
/// ```json
/// { "sublimelinter.mark.error": { "foreground": "#ff0000", "name": "Error" } }
/// ```
#[derive(Debug, Clone)]
pub struct JsonStyleSource {
    path: PathBuf,
}

impl JsonStyleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StyleSource for JsonStyleSource {
    fn create_styles(&self) -> anyhow::Result<Vec<StyleDefinition>> {
        let content = fs::read_to_string(&self.path)?;
        let value = settings::parse_jsonc(&content)?;
        let entries: BTreeMap<String, StyleEntry> = serde_json::from_value(value)?;

        Ok(entries
            .into_iter()
            .map(|(scope, entry)| StyleDefinition {
                scope,
                name: entry.name,
                style: entry.style,
            })
            .collect())
    }
}
