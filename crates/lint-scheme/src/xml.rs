//! Plist (`.tmTheme`) engine for hosts without JSON color schemes

use std::fs;

use theme::{PlistNode, SchemeFormat, StyleSpec, plist};

use crate::engine::{Outcome, SchemeContext, SchemeEngine};
use crate::error::{Result, SchemeError};
use crate::paths::{PathSet, packages_relative_path, touch_dir};
use crate::registry::Registry;

/// Suffix of derived plist themes
pub const DERIVED_SUFFIX: &str = " (SL).hidden-tmTheme";

/// Writes a copy of the active theme with the lint rules appended and
/// switches the editor over to it
pub struct XmlScheme {
    ctx: SchemeContext,
}

impl XmlScheme {
    pub fn new(ctx: SchemeContext) -> Self {
        Self { ctx }
    }
}

impl SchemeEngine for XmlScheme {
    type Node = PlistNode;

    fn context(&self) -> &SchemeContext {
        &self.ctx
    }

    fn assemble_node(
        &self,
        registry: &mut Registry<PlistNode>,
        scope: &str,
        style: &StyleSpec,
        name: Option<&str>,
    ) {
        registry.insert(scope, PlistNode::assemble(scope, style, name));
    }

    fn generate_color_scheme(&self, paths: &PathSet, registry: &Registry<PlistNode>) -> Result<Outcome> {
        if SchemeFormat::from_extension(&paths.ext) != Some(SchemeFormat::Plist) {
            return Err(SchemeError::UnsupportedExtension(paths.ext.clone()));
        }

        let resource = self.ctx.host.load_resource(&paths.scheme_orig)?;
        let original = resource.text().ok_or_else(|| SchemeError::UnexpectedResource {
            path: paths.scheme_orig.clone(),
            expected: "text",
        })?;

        let unfound = plist::missing_scopes(registry.static_scopes(), original)?;
        self.unfound_scopes_dialogue(&unfound);

        let content = plist::append_rules(original, registry.dynamic())?;

        touch_dir(&paths.usr_dir_abs)?;
        let file_name = format!("{}{}", paths.scheme_name, DERIVED_SUFFIX);
        let path = paths.usr_dir_abs.join(&file_name);
        fs::write(&path, content)?;
        tracing::info!("Wrote {}", path.display());

        let switched = self.set_scheme_path(&packages_relative_path(&paths.usr_dir_rel.join(&file_name)))?;

        Ok(Outcome::Written {
            path,
            switched,
            unfound,
        })
    }
}
