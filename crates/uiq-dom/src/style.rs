//! Inline style declarations and computed-style fallbacks.
//!
//! The in-memory document has no cascade. A computed value is the inline
//! declaration when one is set, otherwise a per-property default derived from
//! the element's tag and natural size.

use std::collections::BTreeMap;

/// Tags that render inline when no `display` is declared.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "button", "code", "em", "i", "img", "input", "label", "select", "small",
    "span", "strong", "sub", "sup", "textarea",
];

/// Tags that are never rendered.
const HIDDEN_TAGS: &[&str] = &["head", "link", "meta", "script", "style", "template", "title"];

/// Inline style declarations of one element, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclarations {
    values: BTreeMap<String, String>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a declaration. An empty value removes it, mirroring
    /// `element.style[name] = ''`.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim();
        let value = value.trim();
        if value.is_empty() {
            self.values.remove(name);
        } else {
            self.values.insert(name.to_string(), value.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse the text of a `style="..."` attribute.
///
/// Declarations without a colon are skipped.
pub fn parse_style_attribute(text: &str) -> StyleDeclarations {
    let mut declarations = StyleDeclarations::new();
    for declaration in text.split(';') {
        if let Some((name, value)) = declaration.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            if !name.is_empty() {
                declarations.set(&name, value);
            }
        }
    }
    declarations
}

/// Default `display` for an element that declares none.
pub(crate) fn default_display(tag: &str, hidden_attr: bool) -> &'static str {
    if hidden_attr || HIDDEN_TAGS.contains(&tag) {
        "none"
    } else if INLINE_TAGS.contains(&tag) {
        "inline"
    } else {
        "block"
    }
}

/// Fallback for properties that are not declared inline.
pub(crate) fn default_value(name: &str, displayed: bool, natural: (f64, f64)) -> String {
    match name {
        "opacity" => "1".to_string(),
        "visibility" => "visible".to_string(),
        "overflow" => "visible".to_string(),
        "font-size" => "16px".to_string(),
        "line-height" => "normal".to_string(),
        "left" | "top" | "right" | "bottom" => "auto".to_string(),
        "width" | "height" if !displayed => "auto".to_string(),
        "width" => format!("{}px", natural.0),
        "height" => format!("{}px", natural.1),
        _ if name.starts_with("margin-") || name.starts_with("padding-") => "0px".to_string(),
        _ => String::new(),
    }
}
