//! Queryable document tree used by the rule sets

mod html;

pub use html::HtmlDocument;

use thiserror::Error;

/// Errors raised while building a document tree. No report is produced when one occurs.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Input is empty or contains only whitespace
    #[error("document is empty")]
    EmptyDocument,
    /// Input bytes are not valid UTF-8
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Snapshot of one element: tag name, attributes and text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase local name
    pub tag: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl Element {
    pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>, text: String) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            text,
        }
    }

    /// Raw attribute value, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated descendant text (like DOM `textContent`)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Capability the rule sets need from a parsed document.
///
/// Implementations must return elements in document order and must not
/// mutate anything, so one tree can be audited in both modes concurrently.
pub trait DocumentTree {
    /// All elements whose tag is one of `tags`, in document order
    fn elements(&self, tags: &[&str]) -> Vec<Element>;

    /// Text content of `<body>` (empty when there is none)
    fn body_text(&self) -> String;

    /// Text of every HTML comment in the document
    fn comments(&self) -> Vec<String>;

    /// Whether any element carries the named attribute
    fn has_attribute(&self, name: &str) -> bool;

    /// First element with the given tag
    fn first(&self, tag: &str) -> Option<Element> {
        self.elements(&[tag]).into_iter().next()
    }

    /// Elements with the given tag whose attribute equals `value`. Keyword
    /// attributes (`type`, `rel`) compare ASCII case-insensitively.
    fn elements_with_attr(&self, tag: &str, attr: &str, value: &str) -> Vec<Element> {
        self.elements(&[tag])
            .into_iter()
            .filter(|e| e.attr(attr).is_some_and(|v| attr_value_matches(attr, v, value)))
            .collect()
    }
}

/// Attributes whose values are keywords or MIME types rather than free text
const CASELESS_VALUE_ATTRS: [&str; 2] = ["type", "rel"];

fn attr_value_matches(attr: &str, actual: &str, expected: &str) -> bool {
    if CASELESS_VALUE_ATTRS
        .iter()
        .any(|a| a.eq_ignore_ascii_case(attr))
    {
        actual.eq_ignore_ascii_case(expected)
    } else {
        actual == expected
    }
}
