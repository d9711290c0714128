//! Settings layers

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use serde_json::Value;

/// Layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerPriority {
    /// Built-in defaults shipped with the editor
    Default = 0,
    /// The user's `Preferences.sublime-settings`
    User = 10,
}

/// A settings layer
#[derive(Debug, Clone)]
pub struct SettingsLayer {
    pub priority: LayerPriority,
    values: BTreeMap<String, Value>,
}

impl SettingsLayer {
    pub fn new(priority: LayerPriority) -> Self {
        Self {
            priority,
            values: BTreeMap::new(),
        }
    }

    /// Load from file
    pub fn from_file(path: &Path, priority: LayerPriority) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content, priority)
    }

    /// Load from JSON string (comments and trailing commas allowed)
    pub fn from_json(json: &str, priority: LayerPriority) -> anyhow::Result<Self> {
        let value = parse_jsonc(json)?;

        let Value::Object(obj) = value else {
            anyhow::bail!("settings root must be an object");
        };

        let mut layer = Self::new(priority);
        layer.values.extend(obj);
        Ok(layer)
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a value
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Save to file.
    ///
    /// Writes a sibling temp file first and renames it over `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.values)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

/// Parse editor-flavoured JSON: `//` and `/* */` comments, trailing commas
pub fn parse_jsonc(json: &str) -> serde_json::Result<Value> {
    serde_json::from_str(&to_strict_json(json))
}

/// Output of [`to_strict_json`]. A comma is held back, together with the
/// whitespace after it, until the next token shows whether it is trailing.
struct StrictJson {
    out: String,
    held: Option<String>,
}

impl StrictJson {
    fn space(&mut self, c: char) {
        match self.held.as_mut() {
            Some(held) => held.push(c),
            None => self.out.push(c),
        }
    }

    fn token(&mut self, c: char) {
        if let Some(held) = self.held.take() {
            let keep = if c == '}' || c == ']' { &held[1..] } else { &held[..] };
            self.out.push_str(keep);
        }
        match c {
            ',' => self.held = Some(String::from(",")),
            _ => self.out.push(c),
        }
    }

    fn finish(mut self) -> String {
        if let Some(held) = self.held.take() {
            self.out.push_str(&held);
        }
        self.out
    }
}

/// Rewrite JSONC as strict JSON in one pass.
///
/// Comments are dropped but their line breaks kept, so positions in parse
/// errors still point at the right line.
fn to_strict_json(json: &str) -> String {
    let mut strict = StrictJson {
        out: String::with_capacity(json.len()),
        held: None,
    };
    let mut chars = json.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                strict.token(c);
                let mut escaped = false;
                for ch in chars.by_ref() {
                    strict.out.push(ch);
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == '"' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&ch| ch != '\n').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for ch in chars.by_ref() {
                    if ch == '\n' {
                        strict.space(ch);
                    }
                    if prev == '*' && ch == '/' {
                        break;
                    }
                    prev = ch;
                }
            }
            c if c.is_whitespace() => strict.space(c),
            c => strict.token(c),
        }
    }

    strict.finish()
}
