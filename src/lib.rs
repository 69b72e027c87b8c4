//! Pageaudit: SEO and AEO auditor for HTML documents
//!
//! This library inspects a parsed HTML document against two rule sets,
//! traditional Search Engine Optimization and Answer Engine Optimization
//! (readiness for AI answer extraction), and produces a structured report
//! of issues, warnings, recommendations and copy-paste-ready fixes.

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod document;
pub mod prompt;
pub mod reporter;
pub mod watcher;

pub use analyzer::AuditEngine;
pub use document::{AuditError, DocumentTree, HtmlDocument};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The result of one evaluation run over a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Rule set that produced this report
    #[serde(rename = "auditType")]
    pub mode: AuditMode,
    /// Mode-specific structured findings
    pub findings: Findings,
    /// Critical issues, in discovery order
    pub critical_issues: Vec<String>,
    /// Warnings, in discovery order
    pub warnings: Vec<String>,
    /// Recommendations, in discovery order
    pub recommendations: Vec<String>,
    /// Remediation snippets, sorted by priority (stable)
    pub fixes: Vec<Fix>,
}

impl AuditReport {
    /// Summary counts for this report
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_report(self)
    }

    /// Whether any fix at or above `priority` is present
    pub fn has_fix_at_or_above(&self, priority: Priority) -> bool {
        self.fixes
            .iter()
            .any(|f| f.priority.rank() <= priority.rank())
    }
}

/// Counts derived from a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub critical_issues: usize,
    pub warnings: usize,
    pub recommendations: usize,
    pub critical_fixes: usize,
    pub high_fixes: usize,
    pub medium_fixes: usize,
}

impl ReportSummary {
    pub fn from_report(report: &AuditReport) -> Self {
        let count = |p: Priority| report.fixes.iter().filter(|f| f.priority == p).count();
        Self {
            critical_issues: report.critical_issues.len(),
            warnings: report.warnings.len(),
            recommendations: report.recommendations.len(),
            critical_fixes: count(Priority::Critical),
            high_fixes: count(Priority::High),
            medium_fixes: count(Priority::Medium),
        }
    }

    /// Total number of fixes
    pub fn total_fixes(&self) -> usize {
        self.critical_fixes + self.high_fixes + self.medium_fixes
    }
}

/// Audit mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditMode {
    /// Search Engine Optimization
    #[serde(rename = "SEO", alias = "seo")]
    Seo,
    /// Answer Engine Optimization
    #[serde(rename = "AEO", alias = "aeo")]
    Aeo,
}

impl AuditMode {
    /// Long human-readable name
    pub fn long_name(&self) -> &'static str {
        match self {
            AuditMode::Seo => "SEO (Search Engine Optimization)",
            AuditMode::Aeo => "AEO (Answer Engine Optimization)",
        }
    }
}

impl fmt::Display for AuditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditMode::Seo => write!(f, "SEO"),
            AuditMode::Aeo => write!(f, "AEO"),
        }
    }
}

impl FromStr for AuditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seo" => Ok(AuditMode::Seo),
            "aeo" => Ok(AuditMode::Aeo),
            other => Err(format!("unknown audit mode '{}' (expected seo or aeo)", other)),
        }
    }
}

/// Fix priority. Ordering follows rank: critical < high < medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
}

impl Priority {
    /// Sort rank (0 = most urgent)
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            other => Err(format!(
                "unknown priority '{}' (expected critical, high or medium)",
                other
            )),
        }
    }
}

/// A remediation record with a literal snippet to paste into the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    /// How urgent the fix is
    pub priority: Priority,
    /// Short label
    pub title: String,
    /// Why it matters
    pub description: String,
    /// Snippet to copy into the page
    pub code: String,
    /// Where to insert the snippet
    pub location: String,
}

impl Fix {
    pub fn new(
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
        code: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            title: title.into(),
            description: description.into(),
            code: code.into(),
            location: location.into(),
        }
    }
}

/// Individual checks. Every issue, warning and recommendation is emitted under one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    // SEO
    MissingTitle,
    MissingMetaDescription,
    MissingViewport,
    MissingH1,
    ImagesMissingAlt,
    MissingStructuredData,
    LowWordCount,
    // AEO
    MissingFaqSchema,
    NoQuestionHeaders,
    FewQuestionHeaders,
    NoDirectAnswers,
    FewLists,
    NoTables,
    NoDefinitionOpening,
    MissingHowtoSchema,
    LongParagraphs,
}

impl Check {
    pub const ALL: [Check; 16] = [
        Check::MissingTitle,
        Check::MissingMetaDescription,
        Check::MissingViewport,
        Check::MissingH1,
        Check::ImagesMissingAlt,
        Check::MissingStructuredData,
        Check::LowWordCount,
        Check::MissingFaqSchema,
        Check::NoQuestionHeaders,
        Check::FewQuestionHeaders,
        Check::NoDirectAnswers,
        Check::FewLists,
        Check::NoTables,
        Check::NoDefinitionOpening,
        Check::MissingHowtoSchema,
        Check::LongParagraphs,
    ];

    /// Mode this check belongs to
    pub fn mode(&self) -> AuditMode {
        use Check::*;
        match self {
            MissingTitle | MissingMetaDescription | MissingViewport | MissingH1
            | ImagesMissingAlt | MissingStructuredData | LowWordCount => AuditMode::Seo,
            MissingFaqSchema | NoQuestionHeaders | FewQuestionHeaders | NoDirectAnswers
            | FewLists | NoTables | NoDefinitionOpening | MissingHowtoSchema | LongParagraphs => {
                AuditMode::Aeo
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::MissingTitle => write!(f, "missing-title"),
            Check::MissingMetaDescription => write!(f, "missing-meta-description"),
            Check::MissingViewport => write!(f, "missing-viewport"),
            Check::MissingH1 => write!(f, "missing-h1"),
            Check::ImagesMissingAlt => write!(f, "images-missing-alt"),
            Check::MissingStructuredData => write!(f, "missing-structured-data"),
            Check::LowWordCount => write!(f, "low-word-count"),
            Check::MissingFaqSchema => write!(f, "missing-faq-schema"),
            Check::NoQuestionHeaders => write!(f, "no-question-headers"),
            Check::FewQuestionHeaders => write!(f, "few-question-headers"),
            Check::NoDirectAnswers => write!(f, "no-direct-answers"),
            Check::FewLists => write!(f, "few-lists"),
            Check::NoTables => write!(f, "no-tables"),
            Check::NoDefinitionOpening => write!(f, "no-definition-opening"),
            Check::MissingHowtoSchema => write!(f, "missing-howto-schema"),
            Check::LongParagraphs => write!(f, "long-paragraphs"),
        }
    }
}

impl FromStr for Check {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Check::ALL
            .iter()
            .copied()
            .find(|c| c.to_string() == wanted)
            .ok_or_else(|| format!("unknown check '{}'", wanted))
    }
}

/// Mode-specific structured findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Findings {
    Seo(SeoFindings),
    Aeo(AeoFindings),
}

/// Structured SEO findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoFindings {
    pub title: TitleFinding,
    pub meta: MetaFinding,
    pub headers: HeadingFinding,
    pub images: ImageFinding,
    pub schema: SchemaFinding,
    pub content: ContentFinding,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleFinding {
    /// Title text; None when absent or empty
    pub content: Option<String>,
    /// Character count (0 when absent)
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaFinding {
    pub description: Option<String>,
    pub description_length: usize,
    /// Raw href of `link[rel=canonical]`; informational only
    pub canonical: Option<String>,
    pub viewport: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingFinding {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFinding {
    pub total: usize,
    /// Source URL (or "Unknown") of each image without alt text
    pub missing_alt: Vec<String>,
    pub with_alt: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFinding {
    /// Successfully parsed JSON-LD blocks
    pub json_ld: Vec<serde_json::Value>,
    /// Any element carries an `itemtype` attribute
    pub microdata: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFinding {
    pub word_count: usize,
}

/// Structured AEO findings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AeoFindings {
    pub faq_schema: FaqSchemaFinding,
    pub how_to_schema: HowToSchemaFinding,
    pub question_headers: ExampleCount,
    pub direct_answers: ExampleCount,
    pub lists: ListFinding,
    pub tables: TableFinding,
    pub definition_style: DefinitionFinding,
    pub content_structure: ContentStructure,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqSchemaFinding {
    pub present: bool,
    /// Size of the `mainEntity` list
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HowToSchemaFinding {
    pub present: bool,
}

/// A running count with the first few matching texts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleCount {
    pub count: usize,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFinding {
    /// `<ol>` elements
    pub numbered: usize,
    /// `<ul>` elements
    pub bulleted: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFinding {
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionFinding {
    pub present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStructure {
    /// Paragraphs of at most 100 words
    pub short_paragraphs: usize,
    pub total_paragraphs: usize,
}

impl ContentStructure {
    /// Percentage of short paragraphs, 0 when there are no paragraphs
    pub fn short_paragraph_ratio(&self) -> f64 {
        if self.total_paragraphs == 0 {
            0.0
        } else {
            self.short_paragraphs as f64 / self.total_paragraphs as f64 * 100.0
        }
    }
}
