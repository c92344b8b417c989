//! Markup Scanner
//!
//! Lightweight, allocation-friendly tag scanner for page markup. Not a
//! full HTML parser: it finds start tags and their attributes, which is
//! all the content features need.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static START_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<([a-z][a-z0-9-]*)\b([^>]*)>").expect("valid start tag regex")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("valid attribute regex")
});

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("valid title regex")
});

/// A start tag with lower-cased name and attribute keys
#[derive(Debug, Clone, Default)]
pub struct Tag {
    pub name: String,
    pub attrs: HashMap<String, String>,
}

impl Tag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// Case-insensitive attribute equality
    pub fn attr_is(&self, name: &str, value: &str) -> bool {
        self.attr(name)
            .map(|v| v.trim().eq_ignore_ascii_case(value))
            .unwrap_or(false)
    }
}

/// Parsed view over a markup string
#[derive(Debug, Clone, Default)]
pub struct Document {
    tags: Vec<Tag>,
    title: String,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        let tags = START_TAG
            .captures_iter(markup)
            .map(|cap| Tag {
                name: cap[1].to_lowercase(),
                attrs: parse_attributes(cap.get(2).map(|m| m.as_str()).unwrap_or("")),
            })
            .collect();

        let title = TITLE
            .captures(markup)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Self { tags, title }
    }

    /// Trimmed text of the first `<title>`, empty when missing
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.tags(name).count()
    }

    pub fn any<F>(&self, name: &str, predicate: F) -> bool
    where
        F: Fn(&Tag) -> bool,
    {
        self.tags(name).any(predicate)
    }

    pub fn count_where<F>(&self, name: &str, predicate: F) -> usize
    where
        F: Fn(&Tag) -> bool,
    {
        self.tags(name).filter(|t| predicate(*t)).count()
    }
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();

    for cap in ATTRIBUTE.captures_iter(raw) {
        let key = cap[1].to_lowercase();
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        // first occurrence wins, like a browser
        attrs.entry(key).or_insert(value);
    }

    attrs
}
