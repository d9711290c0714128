//! Property list (`.tmTheme`) schemes
//!
//! A plist theme is a `<plist>` whose top-level `<dict>` holds an `<array>`
//! of rule dicts:
//!
//! ```xml
//! <dict>
//!     <key>name</key><string>Error</string>
//!     <key>scope</key><string>sublimelinter.mark.error</string>
//!     <key>settings</key>
//!     <dict>
//!         <key>foreground</key><string>#FF0000</string>
//!     </dict>
//! </dict>
//! ```
//!
//! The document is parsed once and queried as a tree. Rewriting splices new
//! rule dicts into the original text, so everything the theme author wrote
//! is kept byte for byte.

use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::Range;

use roxmltree::{Document, Node, ParsingOptions};

use crate::color::{is_hex_color, normalize_hex};
use crate::error::ThemeError;
use crate::scope::{declared_scopes, mentions_dynamic};
use crate::style::StyleSpec;

/// Prolog written in front of every generated plist
pub const PREAMBLE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n";

/// A single assembled rule dict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlistNode {
    pub name: String,
    pub scope: String,
    /// `(plist key, value)` pairs of the nested settings dict
    pub settings: Vec<(&'static str, String)>,
}

impl PlistNode {
    /// Build a rule dict from a style. Colors are uppercased.
    pub fn assemble(scope: &str, style: &StyleSpec, name: Option<&str>) -> Self {
        let settings = style
            .attributes()
            .map(|(field, value)| match field {
                "foreground" => ("foreground", normalize_hex(value)),
                "background" => ("background", normalize_hex(value)),
                _ => ("fontStyle", value.to_string()),
            })
            .collect();

        Self {
            name: name.filter(|n| !n.is_empty()).unwrap_or(scope).to_string(),
            scope: scope.to_string(),
            settings,
        }
    }

    /// Serialize as a `<dict>` element
    pub fn to_markup(&self) -> String {
        let mut out = String::from("<dict>");
        push_pair(&mut out, "name", &self.name);
        push_pair(&mut out, "scope", &self.scope);
        out.push_str("<key>settings</key><dict>");
        for (key, value) in &self.settings {
            push_pair(&mut out, key, value);
        }
        out.push_str("</dict></dict>");
        out
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str("<key>");
    out.push_str(&escape(key));
    out.push_str("</key><string>");
    out.push_str(&escape(value));
    out.push_str("</string>");
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}

fn parse(text: &str) -> Result<Document<'_>, ThemeError> {
    // Theme files carry the Apple plist DOCTYPE
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, options)?)
}

/// `plist > dict > array`
fn rule_array<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>, ThemeError> {
    let root = doc.root_element();
    if !root.has_tag_name("plist") {
        return Err(ThemeError::MissingRuleArray);
    }

    root.children()
        .filter(|n| n.has_tag_name("dict"))
        .find_map(|dict| dict.children().find(|n| n.has_tag_name("array")))
        .ok_or(ThemeError::MissingRuleArray)
}

/// `(key, value element)` pairs of a plist dict
fn dict_entries<'a, 'input>(dict: Node<'a, 'input>) -> Vec<(&'a str, Node<'a, 'input>)> {
    let mut entries = Vec::new();
    let mut elements = dict.children().filter(|n| n.is_element());

    while let Some(key) = elements.next() {
        if !key.has_tag_name("key") {
            continue;
        }
        if let Some(value) = elements.next() {
            entries.push((key.text().unwrap_or("").trim(), value));
        }
    }

    entries
}

fn entry<'a, 'input>(
    entries: &[(&'a str, Node<'a, 'input>)],
    key: &str,
) -> Option<Node<'a, 'input>> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Scopes of rules that define a `#` foreground color
fn colored_scopes<'a>(array: Node<'a, '_>) -> HashSet<&'a str> {
    let mut found = HashSet::new();

    for rule in array.children().filter(|n| n.has_tag_name("dict")) {
        let entries = dict_entries(rule);

        let Some(scope) = entry(&entries, "scope").and_then(|n| n.text()) else {
            continue;
        };

        let has_foreground = entry(&entries, "settings")
            .filter(|n| n.has_tag_name("dict"))
            .map(|settings| {
                let settings = dict_entries(settings);
                entry(&settings, "foreground")
                    .filter(|n| n.has_tag_name("string"))
                    .and_then(|n| n.text())
                    .is_some_and(is_hex_color)
            })
            .unwrap_or(false);

        if has_foreground {
            found.extend(declared_scopes(scope));
        }
    }

    found
}

/// Required scopes that the theme does not define.
///
/// A scope only counts as defined when a rule dict names it in its `scope`
/// string and that rule's settings carry a `#` foreground color. Mentions in
/// comments, names or other fields do not count. Order of `required` is kept.
pub fn missing_scopes<'r, I>(required: I, text: &str) -> Result<Vec<String>, ThemeError>
where
    I: IntoIterator<Item = &'r str>,
{
    let doc = parse(text)?;
    let array = rule_array(&doc)?;
    let found = colored_scopes(array);

    Ok(required
        .into_iter()
        .filter(|scope| !found.contains(*scope))
        .map(str::to_string)
        .collect())
}

/// Number of rule dicts in the rule array
pub fn rule_count(text: &str) -> Result<usize, ThemeError> {
    let doc = parse(text)?;
    let array = rule_array(&doc)?;
    Ok(array.children().filter(|n| n.has_tag_name("dict")).count())
}

/// Byte ranges of rule dicts generated by an earlier pass, each with the
/// line break that follows it
fn dynamic_rules(text: &str, array: Node<'_, '_>) -> Vec<Range<usize>> {
    array
        .children()
        .filter(|n| n.has_tag_name("dict"))
        .filter(|rule| {
            let entries = dict_entries(*rule);
            entry(&entries, "scope")
                .and_then(|n| n.text())
                .is_some_and(mentions_dynamic)
        })
        .map(|rule| {
            let range = rule.range();
            let end = if text[range.end..].starts_with('\n') {
                range.end + 1
            } else {
                range.end
            };
            range.start..end
        })
        .collect()
}

/// Copy `span` of `text`, leaving out the ordered `cuts` inside it
fn push_without(out: &mut String, text: &str, span: Range<usize>, cuts: &[Range<usize>]) {
    let mut pos = span.start;
    for cut in cuts {
        out.push_str(&text[pos..cut.start]);
        pos = cut.end;
    }
    out.push_str(&text[pos..span.end]);
}

/// Append rule dicts to the end of the rule array.
///
/// Returns a complete document: [`PREAMBLE`] followed by the `<plist>`
/// element of `text` with `nodes` inserted before the closing `</array>`.
/// Rule dicts left over from an earlier pass are dropped first, so feeding
/// a generated theme back in does not accumulate them.
pub fn append_rules<'n, I>(text: &str, nodes: I) -> Result<String, ThemeError>
where
    I: IntoIterator<Item = &'n PlistNode>,
{
    let doc = parse(text)?;
    let array = rule_array(&doc)?;
    let plist: Range<usize> = doc.root_element().range();
    let array_range: Range<usize> = array.range();

    let inserted: String = nodes
        .into_iter()
        .map(|node| format!("{}\n", node.to_markup()))
        .collect();

    let array_text = &text[array_range.clone()];
    let mut out = String::with_capacity(PREAMBLE.len() + plist.len() + inserted.len() + 16);
    out.push_str(PREAMBLE);

    if array_text.ends_with("/>") {
        // <array/>
        out.push_str(&text[plist.start..array_range.start]);
        out.push_str("<array>\n");
        out.push_str(&inserted);
        out.push_str("</array>");
        out.push_str(&text[array_range.end..plist.end]);
    } else {
        let close = array_text
            .rfind("</")
            .map(|offset| array_range.start + offset)
            .ok_or(ThemeError::MissingRuleArray)?;
        let stale = dynamic_rules(text, array);
        push_without(&mut out, text, plist.start..close, &stale);
        out.push_str(&inserted);
        out.push_str(&text[close..plist.end]);
    }

    out.push('\n');
    Ok(out)
}
