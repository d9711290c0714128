//! Generator configuration

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};

/// First host build that reads `.sublime-color-scheme` files
pub const JSON_SCHEME_MIN_VERSION: u32 = 3149;

/// Scheme generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// Write plist themes even on hosts that understand JSON schemes
    #[serde(default)]
    pub force_xml_scheme: bool,
    /// Host version from which the JSON engine is used
    #[serde(default = "default_json_min_version")]
    pub json_min_version: u32,
    /// Directory under `Packages/User` that receives plist themes
    #[serde(default = "default_user_subdir")]
    pub user_subdir: String,
}

fn default_json_min_version() -> u32 {
    JSON_SCHEME_MIN_VERSION
}

fn default_user_subdir() -> String {
    "SublimeLinter".to_string()
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            force_xml_scheme: false,
            json_min_version: default_json_min_version(),
            user_subdir: default_user_subdir(),
        }
    }
}

impl SchemeConfig {
    /// Load from a JSON file (comments allowed)
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let value = settings::parse_jsonc(&content)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Whether a host of `version` gets the JSON engine
    pub fn uses_json(&self, version: u32) -> bool {
        version >= self.json_min_version && !self.force_xml_scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchemeConfig::default();
        assert!(!config.force_xml_scheme);
        assert_eq!(config.json_min_version, 3149);
        assert_eq!(config.user_subdir, "SublimeLinter");
    }

    #[test]
    fn test_uses_json() {
        let config = SchemeConfig::default();
        assert!(config.uses_json(3149));
        assert!(config.uses_json(4126));
        assert!(!config.uses_json(3143));

        let forced = SchemeConfig {
            force_xml_scheme: true,
            ..Default::default()
        };
        assert!(!forced.uses_json(4126));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheme.json");
        fs::write(&path, "{\n  // old host\n  \"force_xml_scheme\": true,\n}").unwrap();

        let config = SchemeConfig::from_file(&path).unwrap();
        assert!(config.force_xml_scheme);
        assert_eq!(config.user_subdir, "SublimeLinter");
    }
}
