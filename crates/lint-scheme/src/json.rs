//! JSON color scheme engine.
//!
//! Instead of copying the theme, a `User/<name>.sublime-color-scheme`
//! override is written next to it. The host merges the override into the
//! scheme of the same name, so the active `color_scheme` stays the original.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use theme::{ColorSchemeDocument, Rule, SchemeFormat, StyleSpec, color_scheme, plist};

use crate::engine::{Outcome, SchemeContext, SchemeEngine};
use crate::error::{Result, SchemeError};
use crate::paths::{PathSet, touch_dir};
use crate::registry::Registry;

pub struct JsonScheme {
    ctx: SchemeContext,
}

impl JsonScheme {
    pub fn new(ctx: SchemeContext) -> Self {
        Self { ctx }
    }

    /// Location of the override written for `paths`
    pub fn derived_path(paths: &PathSet) -> PathBuf {
        paths
            .usr_dir
            .join(format!("{}{}", paths.scheme_name, SchemeFormat::COLOR_SCHEME_EXT))
    }

    /// Required static scopes the original scheme does not define
    fn original_unfound(&self, paths: &PathSet, registry: &Registry<Rule>) -> Result<Vec<String>> {
        let format = SchemeFormat::from_extension(&paths.ext)
            .ok_or_else(|| SchemeError::UnsupportedExtension(paths.ext.clone()))?;
        let resource = self.ctx.host.load_resource(&paths.scheme_orig)?;

        match format {
            SchemeFormat::ColorScheme => {
                let original = ColorSchemeDocument::from_value(resource.to_value()?)?;
                Ok(color_scheme::missing_scopes(registry.static_scopes(), original.rules()))
            }
            SchemeFormat::Plist => {
                let text = resource.text().ok_or_else(|| SchemeError::UnexpectedResource {
                    path: paths.scheme_orig.clone(),
                    expected: "text",
                })?;
                Ok(plist::missing_scopes(registry.static_scopes(), text)?)
            }
        }
    }
}

impl SchemeEngine for JsonScheme {
    type Node = Rule;

    fn context(&self) -> &SchemeContext {
        &self.ctx
    }

    fn assemble_node(&self, registry: &mut Registry<Rule>, scope: &str, style: &StyleSpec, name: Option<&str>) {
        registry.insert(scope, color_scheme::assemble_rule(scope, style, name));
    }

    fn generate_color_scheme(&self, paths: &PathSet, registry: &Registry<Rule>) -> Result<Outcome> {
        let mut unfound = self.original_unfound(paths, registry)?;
        let path = Self::derived_path(paths);
        let prior = path.is_file();

        if unfound.is_empty() && registry.dynamic_nodes.is_empty() && !prior {
            tracing::debug!("Nothing to add to {}", paths.scheme_orig);
            return Ok(Outcome::Unchanged);
        }

        let mut doc = if prior {
            let content = fs::read_to_string(&path)?;
            let doc = ColorSchemeDocument::from_value(settings::parse_jsonc(&content)?)?;
            // Scopes the user added to the override count as defined
            unfound = color_scheme::missing_scopes(unfound.iter().map(String::as_str), doc.rules());
            doc
        } else {
            ColorSchemeDocument::new()
        };

        let kept = color_scheme::remove_dynamic_rules(doc.take_rules());
        doc.extend_rules(kept);
        doc.extend_rules(registry.dynamic().cloned().map(Value::Object));

        self.unfound_scopes_dialogue(&unfound);

        touch_dir(&paths.usr_dir)?;
        fs::write(&path, doc.to_pretty_json()?)?;
        tracing::info!("Wrote {}", path.display());

        let switched = self.set_scheme_path(&paths.scheme_orig)?;

        Ok(Outcome::Written {
            path,
            switched,
            unfound,
        })
    }
}
