//! JSON color schemes (`.sublime-color-scheme`)

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ThemeError;
use crate::scope::{declared_scopes, mentions_dynamic};
use crate::style::StyleSpec;

/// One entry of the `"rules"` array
pub type Rule = Map<String, Value>;

/// Build a rule from a style. Values are written unchanged.
pub fn assemble_rule(scope: &str, style: &StyleSpec, name: Option<&str>) -> Rule {
    let mut rule = Rule::new();
    rule.insert("scope".into(), Value::String(scope.to_string()));
    rule.insert(
        "name".into(),
        Value::String(name.filter(|n| !n.is_empty()).unwrap_or(scope).to_string()),
    );

    for (key, value) in style.attributes() {
        rule.insert(key.to_string(), Value::String(value.to_string()));
    }

    rule
}

fn rule_scope(rule: &Value) -> Option<&str> {
    rule.get("scope").and_then(Value::as_str)
}

/// Required scopes that no rule declares.
///
/// Each rule's `scope` may hold several scopes; declared scopes are
/// accumulated across all rules. Stops scanning once every required scope is
/// covered. Order of `required` is kept.
pub fn missing_scopes<'r, I>(required: I, rules: &[Value]) -> Vec<String>
where
    I: IntoIterator<Item = &'r str>,
{
    let required: Vec<&str> = required.into_iter().collect();
    let mut unfound: HashSet<&str> = required.iter().copied().collect();

    for rule in rules {
        if unfound.is_empty() {
            return Vec::new();
        }
        if let Some(scope) = rule_scope(rule) {
            for declared in declared_scopes(scope) {
                unfound.remove(declared);
            }
        }
    }

    required
        .into_iter()
        .filter(|scope| unfound.contains(*scope))
        .map(str::to_string)
        .collect()
}

/// Drop rules generated by an earlier pass.
///
/// Rules without a scope are not ours and are kept.
pub fn remove_dynamic_rules(rules: Vec<Value>) -> Vec<Value> {
    rules
        .into_iter()
        .filter(|rule| !rule_scope(rule).is_some_and(mentions_dynamic))
        .collect()
}

/// A color scheme document.
///
/// Keys other than `"rules"` are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorSchemeDocument {
    root: Map<String, Value>,
}

impl ColorSchemeDocument {
    /// Empty document, `{"rules": []}`
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert("rules".into(), Value::Array(Vec::new()));
        Self { root }
    }

    /// Wrap an already parsed value
    pub fn from_value(value: Value) -> Result<Self, ThemeError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ThemeError::NotAnObject),
        }
    }

    /// Parse from JSON text
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Current rules; an absent or malformed `"rules"` key reads as empty
    pub fn rules(&self) -> &[Value] {
        self.root
            .get("rules")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Take the rules out, leaving an empty list behind
    pub fn take_rules(&mut self) -> Vec<Value> {
        match self.root.insert("rules".into(), Value::Array(Vec::new())) {
            Some(Value::Array(rules)) => rules,
            _ => Vec::new(),
        }
    }

    /// Append rules after the existing ones
    pub fn extend_rules(&mut self, rules: impl IntoIterator<Item = Value>) {
        let entry = self
            .root
            .entry("rules")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(existing) = entry {
            existing.extend(rules);
        }
    }

    /// Pretty JSON with 4-space indentation and sorted keys
    pub fn to_pretty_json(&self) -> Result<String, ThemeError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        sorted(&Value::Object(self.root.clone())).serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Recursively rebuild objects with their keys in sorted order
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
