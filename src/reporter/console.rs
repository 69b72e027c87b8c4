//! Console reporter with colored output

use crate::analyzer::{AggregateStats, FileReport};
use crate::{AeoFindings, AuditReport, Findings, Fix, Priority, SeoFindings};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show fix snippets
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output (fix snippets)
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print a single file report
    pub fn report(&self, file: &FileReport) {
        print!("{}", self.render(file));
    }

    /// Print multiple file reports followed by a summary
    pub fn report_many(&self, results: &[FileReport], stats: &AggregateStats) {
        for file in results {
            self.report(file);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Print one line per file
    pub fn report_quiet(&self, file: &FileReport) {
        println!("{}", self.render_quiet(file));
    }

    pub fn render_quiet(&self, file: &FileReport) -> String {
        let summary = file.report.summary();
        let critical = format!("{} critical", summary.critical_issues);
        format!(
            "{}: {} {}, {} warnings, {} recommendations",
            file.path.display(),
            file.report.mode,
            if summary.critical_issues > 0 {
                self.paint(&critical, |s| s.red().bold())
            } else {
                self.paint(&critical, |s| s.green())
            },
            summary.warnings,
            summary.recommendations
        )
    }

    /// Full report text for one file
    pub fn render(&self, file: &FileReport) -> String {
        let report = &file.report;
        let summary = report.summary();
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.paint(
                &format!("📊 {} Audit: {}", report.mode.long_name(), file.path.display()),
                |s| s.bold()
            )
        );
        let _ = writeln!(
            out,
            "   Critical: {} | Warnings: {} | Recommendations: {} | Fixes: {}",
            summary.critical_issues,
            summary.warnings,
            summary.recommendations,
            summary.total_fixes()
        );
        let _ = writeln!(out);

        self.write_findings(&mut out, report);
        self.write_bucket(
            &mut out,
            "Critical Issues:",
            &report.critical_issues,
            |s| s.red(),
            "✗",
        );
        self.write_bucket(&mut out, "Warnings:", &report.warnings, |s| s.yellow(), "⚠");
        self.write_bucket(
            &mut out,
            "Recommendations:",
            &report.recommendations,
            |s| s.blue(),
            "ℹ",
        );
        self.write_fixes(&mut out, &report.fixes);

        if summary.critical_issues == 0 && summary.warnings == 0 && summary.recommendations == 0 {
            let _ = writeln!(out, "   {}", self.paint("No issues found", |s| s.green()));
            let _ = writeln!(out);
        }
        out
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.paint("Summary", |s| s.bold()));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Files audited:        {}", stats.files_audited);
        let _ = writeln!(out, "   Files with critical:  {}", stats.files_with_critical);
        let _ = writeln!(out, "   Critical issues:      {}", stats.critical_issues);
        let _ = writeln!(out, "   Warnings:             {}", stats.warnings);
        let _ = writeln!(out, "   Recommendations:      {}", stats.recommendations);
        let _ = writeln!(out, "   Fixes:                {}", stats.total_fixes);
        let _ = writeln!(out);
        out
    }

    fn write_bucket(
        &self,
        out: &mut String,
        heading: &str,
        items: &[String],
        color: fn(&str) -> ColoredString,
        icon: &str,
    ) {
        if items.is_empty() {
            return;
        }
        let _ = writeln!(out, "   {}", self.paint(heading, |s| s.bold()));
        for item in items {
            let _ = writeln!(out, "   {} {}", self.paint(icon, color), item);
        }
        let _ = writeln!(out);
    }

    fn write_fixes(&self, out: &mut String, fixes: &[Fix]) {
        if fixes.is_empty() {
            return;
        }
        let _ = writeln!(out, "   {}", self.paint("Fixes:", |s| s.bold()));
        for (idx, fix) in fixes.iter().enumerate() {
            let _ = writeln!(
                out,
                "   {}. {} {} - {}",
                idx + 1,
                self.priority_label(fix.priority),
                fix.title,
                fix.description
            );
            let _ = writeln!(
                out,
                "      {} {}",
                self.paint("→", |s| s.dimmed()),
                self.paint(&fix.location, |s| s.italic())
            );
            if self.verbose {
                for line in fix.code.lines() {
                    let _ = writeln!(out, "        {}", self.paint(line, |s| s.cyan()));
                }
            }
        }
        let _ = writeln!(out);
    }

    fn write_findings(&self, out: &mut String, report: &AuditReport) {
        let _ = writeln!(out, "   {}", self.paint("Findings:", |s| s.bold()));
        let lines = match &report.findings {
            Findings::Seo(f) => seo_lines(f),
            Findings::Aeo(f) => aeo_lines(f),
        };
        for (label, value) in lines {
            let _ = writeln!(out, "   {:<20} {}", self.paint(&label, |s| s.dimmed()), value);
        }
        let _ = writeln!(out);
    }

    fn priority_label(&self, priority: Priority) -> String {
        let label = format!("[{}]", priority.to_string().to_uppercase());
        match priority {
            Priority::Critical => self.paint(&label, |s| s.red().bold()),
            Priority::High => self.paint(&label, |s| s.yellow()),
            Priority::Medium => self.paint(&label, |s| s.blue()),
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

fn seo_lines(f: &SeoFindings) -> Vec<(String, String)> {
    vec![
        (
            "Title".into(),
            match &f.title.content {
                Some(t) => format!("\"{}\" ({} chars)", t, f.title.length),
                None => "missing".into(),
            },
        ),
        (
            "Meta description".into(),
            match f.meta.description {
                Some(_) => format!("{} chars", f.meta.description_length),
                None => "missing".into(),
            },
        ),
        (
            "Canonical".into(),
            f.meta.canonical.clone().unwrap_or_else(|| "none".into()),
        ),
        (
            "Viewport".into(),
            f.meta.viewport.clone().unwrap_or_else(|| "missing".into()),
        ),
        (
            "Headings".into(),
            format!(
                "h1: {}, h2: {}, h3: {}",
                f.headers.h1.len(),
                f.headers.h2.len(),
                f.headers.h3.len()
            ),
        ),
        (
            "Images".into(),
            format!(
                "{} total, {} with alt, {} missing alt",
                f.images.total,
                f.images.with_alt,
                f.images.missing_alt.len()
            ),
        ),
        (
            "Structured data".into(),
            format!(
                "{} JSON-LD blocks, microdata: {}",
                f.schema.json_ld.len(),
                yes_no(f.schema.microdata)
            ),
        ),
        ("Word count".into(), f.content.word_count.to_string()),
    ]
}

fn aeo_lines(f: &AeoFindings) -> Vec<(String, String)> {
    vec![
        (
            "FAQ schema".into(),
            if f.faq_schema.present {
                format!("yes ({} questions)", f.faq_schema.count)
            } else {
                "no".into()
            },
        ),
        ("HowTo schema".into(), yes_no(f.how_to_schema.present)),
        (
            "Question headers".into(),
            f.question_headers.count.to_string(),
        ),
        ("Direct answers".into(), f.direct_answers.count.to_string()),
        (
            "Lists".into(),
            format!(
                "{} numbered, {} bulleted",
                f.lists.numbered, f.lists.bulleted
            ),
        ),
        ("Tables".into(), f.tables.count.to_string()),
        (
            "Definition opening".into(),
            yes_no(f.definition_style.present),
        ),
        (
            "Short paragraphs".into(),
            format!(
                "{}/{} ({}%)",
                f.content_structure.short_paragraphs,
                f.content_structure.total_paragraphs,
                f.content_structure.short_paragraph_ratio().round()
            ),
        ),
    ]
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
