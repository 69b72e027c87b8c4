//! HTML5 document backed by scraper (html5ever)

use super::{AuditError, DocumentTree, Element};
use scraper::{ElementRef, Html};

/// A parsed HTML document
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse HTML text. Markup errors are recovered the way browsers do;
    /// only blank input is rejected.
    pub fn parse(source: &str) -> Result<Self, AuditError> {
        if source.trim().is_empty() {
            return Err(AuditError::EmptyDocument);
        }
        Ok(Self {
            html: Html::parse_document(source),
        })
    }

    /// Parse raw bytes, which must be UTF-8
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuditError> {
        let source = std::str::from_utf8(bytes)?;
        Self::parse(source)
    }

    fn element_refs(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }
}

fn snapshot(el: ElementRef<'_>) -> Element {
    let attributes = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Element::new(el.value().name(), attributes, el.text().collect())
}

impl DocumentTree for HtmlDocument {
    fn elements(&self, tags: &[&str]) -> Vec<Element> {
        self.element_refs()
            .filter(|el| tags.contains(&el.value().name()))
            .map(snapshot)
            .collect()
    }

    fn body_text(&self) -> String {
        self.element_refs()
            .find(|el| el.value().name() == "body")
            .map(|body| body.text().collect())
            .unwrap_or_default()
    }

    fn comments(&self) -> Vec<String> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| node.value().as_comment().map(|c| String::from(&**c)))
            .collect()
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.element_refs().any(|el| el.value().attr(name).is_some())
    }
}
