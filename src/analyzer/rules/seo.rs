//! Conventional on-page SEO checks: title, meta tags, headings, images,
//! structured data and content length.

use super::{word_count, RuleSet};
use crate::analyzer::aggregate::ReportBuilder;
use crate::analyzer::jsonld;
use crate::document::DocumentTree;
use crate::{
    AuditMode, Check, ContentFinding, Findings, Fix, HeadingFinding, ImageFinding, MetaFinding,
    Priority, SchemaFinding, SeoFindings, TitleFinding,
};

/// Pages below this many body words get a warning (no fix offered)
const MIN_WORD_COUNT: usize = 300;

const HEAD_SECTION: &str = "Inside <head> section";

const ORGANIZATION_SCHEMA: &str = r#"<script type="application/ld+json">
{
  "@context": "https://schema.org",
  "@type": "Organization",
  "name": "Your Company",
  "url": "https://yourdomain.com"
}
</script>"#;

/// SEO rule set
pub struct SeoRuleSet;

impl SeoRuleSet {
    pub fn new() -> Self {
        Self
    }

    fn title(doc: &dyn DocumentTree) -> TitleFinding {
        let text = doc.first("title").map(|t| t.text().to_string());
        let length = text.as_deref().map(|t| t.chars().count()).unwrap_or(0);
        TitleFinding {
            content: text.filter(|t| !t.is_empty()),
            length,
        }
    }

    /// First `<tag attr="value">` and the named attribute of it, if non-empty
    fn first_attr(
        doc: &dyn DocumentTree,
        tag: &str,
        (attr, value): (&str, &str),
        read: &str,
    ) -> Option<String> {
        doc.elements_with_attr(tag, attr, value)
            .into_iter()
            .next()
            .and_then(|el| el.attr(read).map(str::to_string))
            .filter(|v| !v.is_empty())
    }

    fn meta(doc: &dyn DocumentTree) -> MetaFinding {
        let description = Self::first_attr(doc, "meta", ("name", "description"), "content");
        MetaFinding {
            description_length: description
                .as_deref()
                .map(|d| d.chars().count())
                .unwrap_or(0),
            description,
            canonical: Self::first_attr(doc, "link", ("rel", "canonical"), "href"),
            viewport: Self::first_attr(doc, "meta", ("name", "viewport"), "content"),
        }
    }

    fn headings(doc: &dyn DocumentTree) -> HeadingFinding {
        let mut headers = HeadingFinding::default();
        for el in doc.elements(&["h1", "h2", "h3"]) {
            let text = el.trimmed_text().to_string();
            match el.tag.as_str() {
                "h1" => headers.h1.push(text),
                "h2" => headers.h2.push(text),
                _ => headers.h3.push(text),
            }
        }
        headers
    }

    fn images(doc: &dyn DocumentTree) -> ImageFinding {
        let images = doc.elements(&["img"]);
        let mut finding = ImageFinding {
            total: images.len(),
            ..ImageFinding::default()
        };
        for img in &images {
            let has_alt = img.attr("alt").is_some_and(|alt| !alt.trim().is_empty());
            if has_alt {
                finding.with_alt += 1;
            } else {
                let src = img
                    .attr("src")
                    .filter(|s| !s.is_empty())
                    .unwrap_or("Unknown");
                finding.missing_alt.push(src.to_string());
            }
        }
        finding
    }
}

impl Default for SeoRuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for SeoRuleSet {
    fn mode(&self) -> AuditMode {
        AuditMode::Seo
    }

    fn evaluate(&self, doc: &dyn DocumentTree, report: &mut ReportBuilder<'_>) -> Findings {
        let title = Self::title(doc);
        if title.length == 0 {
            report.critical(
                Check::MissingTitle,
                "Missing title tag",
                Fix::new(
                    Priority::Critical,
                    "Add Title Tag",
                    "Essential for search engine rankings",
                    "<title>Your Page Title - Brand Name (50-60 chars)</title>",
                    HEAD_SECTION,
                ),
            );
        }

        let meta = Self::meta(doc);
        if meta.description_length == 0 {
            report.critical(
                Check::MissingMetaDescription,
                "Missing meta description",
                Fix::new(
                    Priority::Critical,
                    "Add Meta Description",
                    "Improves click-through rate from search results",
                    r#"<meta name="description" content="Compelling description 150-160 characters.">"#,
                    HEAD_SECTION,
                ),
            );
        }

        // Canonical is informational only
        if meta.viewport.is_none() {
            report.critical(
                Check::MissingViewport,
                "Missing viewport meta tag",
                Fix::new(
                    Priority::Critical,
                    "Add Viewport Tag",
                    "Required for mobile-friendly sites",
                    r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#,
                    HEAD_SECTION,
                ),
            );
        }

        let headers = Self::headings(doc);
        if headers.h1.is_empty() {
            report.critical(
                Check::MissingH1,
                "Missing H1 tag",
                Fix::new(
                    Priority::Critical,
                    "Add H1 Heading",
                    "Every page needs exactly one H1 with primary keyword",
                    "<h1>Your Main Page Heading With Primary Keyword</h1>",
                    "Top of main content",
                ),
            );
        }

        let images = Self::images(doc);
        if !images.missing_alt.is_empty() {
            report.warning(
                Check::ImagesMissingAlt,
                format!("{} images missing ALT text", images.missing_alt.len()),
                Some(Fix::new(
                    Priority::High,
                    "Add ALT Text to Images",
                    "Improves accessibility and image SEO",
                    r#"<img src="your-image.jpg" alt="Descriptive text about the image">"#,
                    "Every <img> tag",
                )),
            );
        }

        let schema = SchemaFinding {
            json_ld: jsonld::parse_blocks(doc),
            microdata: doc.has_attribute("itemtype"),
        };
        if schema.json_ld.is_empty() {
            report.critical(
                Check::MissingStructuredData,
                "No structured data found",
                Fix::new(
                    Priority::Critical,
                    "Add Schema.org Markup",
                    "Enables rich results in search",
                    ORGANIZATION_SCHEMA,
                    "In <head> or before </body>",
                ),
            );
        }

        let content = ContentFinding {
            word_count: word_count(&doc.body_text()),
        };
        if content.word_count < MIN_WORD_COUNT {
            report.warning(
                Check::LowWordCount,
                format!("Low word count ({} words)", content.word_count),
                None,
            );
        }

        Findings::Seo(SeoFindings {
            title,
            meta,
            headers,
            images,
            schema,
            content,
        })
    }
}
