//! Markdown reporter: a shareable audit document with copy-ready fixes

use crate::analyzer::{AggregateStats, FileReport};
use crate::{AuditReport, Findings};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Reporter that renders reports as Markdown
pub struct MarkdownReporter {
    /// Stamp shown under the title; None leaves the date out
    generated_at: Option<DateTime<Utc>>,
}

impl MarkdownReporter {
    pub fn new() -> Self {
        Self { generated_at: None }
    }

    /// Include a "Generated" line with the current time
    pub fn with_timestamp(self) -> Self {
        self.generated_at(Utc::now())
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Render one file report
    pub fn report(&self, file: &FileReport) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# {} Audit: {}",
            file.report.mode.long_name(),
            file.path.display()
        );
        let _ = writeln!(out);
        if let Some(at) = self.generated_at {
            let _ = writeln!(out, "_Generated {}_", at.format("%Y-%m-%d %H:%M UTC"));
            let _ = writeln!(out);
        }
        write_report_body(&mut out, &file.report);
        out
    }

    /// Render several file reports with a summary table at the end
    pub fn report_many(&self, results: &[FileReport], stats: &AggregateStats) -> String {
        let mut out = String::new();
        for file in results {
            out.push_str(&self.report(file));
            let _ = writeln!(out, "---");
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "## Summary");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Metric | Count |");
        let _ = writeln!(out, "|---|---|");
        let _ = writeln!(out, "| Files audited | {} |", stats.files_audited);
        let _ = writeln!(out, "| Files with critical fixes | {} |", stats.files_with_critical);
        let _ = writeln!(out, "| Critical issues | {} |", stats.critical_issues);
        let _ = writeln!(out, "| Warnings | {} |", stats.warnings);
        let _ = writeln!(out, "| Recommendations | {} |", stats.recommendations);
        let _ = writeln!(out, "| Fixes | {} |", stats.total_fixes);
        out
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {}", heading);
    let _ = writeln!(out);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
    let _ = writeln!(out);
}

fn write_report_body(out: &mut String, report: &AuditReport) {
    write_list(out, "Critical Issues", &report.critical_issues);
    write_list(out, "Warnings", &report.warnings);
    write_list(out, "Recommendations", &report.recommendations);

    let _ = writeln!(out, "## Findings");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Check | Result |");
    let _ = writeln!(out, "|---|---|");
    for (label, value) in findings_rows(&report.findings) {
        let _ = writeln!(out, "| {} | {} |", label, table_cell(&value));
    }
    let _ = writeln!(out);

    if report.fixes.is_empty() {
        return;
    }
    let _ = writeln!(out, "## Fixes");
    let _ = writeln!(out);
    for (idx, fix) in report.fixes.iter().enumerate() {
        let _ = writeln!(
            out,
            "### {}. {} [{}]",
            idx + 1,
            fix.title,
            fix.priority.to_string().to_uppercase()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "**Description:** {}", fix.description);
        let _ = writeln!(out);
        let _ = writeln!(out, "**Location:** {}", fix.location);
        let _ = writeln!(out);
        let _ = writeln!(out, "```html");
        let _ = writeln!(out, "{}", fix.code);
        let _ = writeln!(out, "```");
        let _ = writeln!(out);
    }
}

/// Page text can carry pipes and line breaks, either of which splits a row
fn table_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

fn findings_rows(findings: &Findings) -> Vec<(&'static str, String)> {
    match findings {
        Findings::Seo(f) => vec![
            (
                "Title",
                f.title
                    .content
                    .as_ref()
                    .map(|t| format!("{} ({} chars)", t, f.title.length))
                    .unwrap_or_else(|| "missing".into()),
            ),
            (
                "Meta description",
                format!("{} chars", f.meta.description_length),
            ),
            (
                "Canonical",
                f.meta.canonical.clone().unwrap_or_else(|| "none".into()),
            ),
            (
                "Viewport",
                f.meta.viewport.clone().unwrap_or_else(|| "missing".into()),
            ),
            ("H1 headings", f.headers.h1.len().to_string()),
            ("H2 headings", f.headers.h2.len().to_string()),
            ("H3 headings", f.headers.h3.len().to_string()),
            (
                "Images missing alt",
                format!("{} of {}", f.images.missing_alt.len(), f.images.total),
            ),
            ("JSON-LD blocks", f.schema.json_ld.len().to_string()),
            ("Microdata", f.schema.microdata.to_string()),
            ("Word count", f.content.word_count.to_string()),
        ],
        Findings::Aeo(f) => vec![
            (
                "FAQ schema",
                format!("{} ({} questions)", f.faq_schema.present, f.faq_schema.count),
            ),
            ("HowTo schema", f.how_to_schema.present.to_string()),
            ("Question headers", f.question_headers.count.to_string()),
            ("Direct answers", f.direct_answers.count.to_string()),
            ("Numbered lists", f.lists.numbered.to_string()),
            ("Bulleted lists", f.lists.bulleted.to_string()),
            ("Tables", f.tables.count.to_string()),
            (
                "Definition opening",
                f.definition_style.present.to_string(),
            ),
            (
                "Short paragraphs",
                format!(
                    "{} of {} ({}%)",
                    f.content_structure.short_paragraphs,
                    f.content_structure.total_paragraphs,
                    f.content_structure.short_paragraph_ratio().round()
                ),
            ),
        ],
    }
}
