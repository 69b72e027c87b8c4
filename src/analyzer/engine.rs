//! Audit engine - picks the rule set for a mode and assembles the report

use crate::config::Config;
use crate::document::{AuditError, DocumentTree, HtmlDocument};
use crate::{AuditMode, AuditReport, Check, Priority};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::aggregate::ReportBuilder;
use super::directives::ignored_checks;
use super::rules::rule_set_for;

/// Main audit engine
#[derive(Debug, Clone, Default)]
pub struct AuditEngine {
    /// Checks dropped from every report this engine produces
    disabled: HashSet<Check>,
    /// Honor `<!-- pageaudit-ignore ... -->` comments in audited pages
    inline_directives: bool,
}

impl AuditEngine {
    /// Create a new audit engine with every check enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch off checks for every document
    pub fn with_disabled_checks(mut self, checks: impl IntoIterator<Item = Check>) -> Self {
        self.disabled.extend(checks);
        self
    }

    /// Let pages switch checks off with `pageaudit-ignore` comments. Off by
    /// default, so an audited page cannot hide its own issues.
    pub fn with_inline_directives(mut self, enabled: bool) -> Self {
        self.inline_directives = enabled;
        self
    }

    /// Audit an already parsed document. Pure: the same tree and mode always
    /// give the same report, and the tree is never modified.
    pub fn audit_document(&self, doc: &dyn DocumentTree, mode: AuditMode) -> AuditReport {
        self.audit_with(doc, mode, &HashSet::new())
    }

    fn audit_with(
        &self,
        doc: &dyn DocumentTree,
        mode: AuditMode,
        extra_disabled: &HashSet<Check>,
    ) -> AuditReport {
        let mut disabled: HashSet<Check> = self.disabled.union(extra_disabled).copied().collect();
        if self.inline_directives {
            disabled.extend(ignored_checks(doc));
        }

        let mut builder = ReportBuilder::new(mode, &disabled);
        let findings = rule_set_for(mode).evaluate(doc, &mut builder);
        let report = builder.finish(findings);

        let summary = report.summary();
        debug!(
            %mode,
            critical = summary.critical_issues,
            warnings = summary.warnings,
            recommendations = summary.recommendations,
            fixes = summary.total_fixes(),
            "audit finished"
        );
        report
    }

    /// Parse HTML text and audit it
    pub fn audit_source(&self, source: &str, mode: AuditMode) -> Result<AuditReport, AuditError> {
        let doc = HtmlDocument::parse(source)?;
        Ok(self.audit_document(&doc, mode))
    }

    /// Read, parse and audit a file. The config (with per-file overrides)
    /// supplies the mode and disabled checks; without one, `mode` defaults to SEO.
    pub fn audit_file(&self, path: &Path, config: Option<&Config>) -> Result<FileReport> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        let doc = HtmlDocument::from_bytes(&bytes)
            .with_context(|| format!("Failed to parse document: {}", path.display()))?;

        let (mode, disabled) = match config {
            Some(cfg) => {
                let effective = cfg.effective_for_file(path);
                (effective.mode, effective.disabled_checks())
            }
            None => (AuditMode::Seo, HashSet::new()),
        };

        debug!(path = %path.display(), %mode, "auditing file");
        Ok(FileReport {
            path: path.to_path_buf(),
            report: self.audit_with(&doc, mode, &disabled),
        })
    }

    /// Audit multiple files sequentially
    pub fn audit_many(&self, paths: &[PathBuf], config: Option<&Config>) -> Vec<Result<FileReport>> {
        paths.iter().map(|p| self.audit_file(p, config)).collect()
    }

    /// Audit multiple files in parallel using rayon. Results keep input order.
    pub fn audit_parallel(
        &self,
        paths: &[PathBuf],
        config: Option<&Config>,
    ) -> Vec<Result<FileReport>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.audit_file(p, config)).collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[FileReport]) -> AggregateStats {
        let mut stats = AggregateStats {
            files_audited: results.len(),
            ..AggregateStats::default()
        };
        for file in results {
            let summary = file.report.summary();
            stats.critical_issues += summary.critical_issues;
            stats.warnings += summary.warnings;
            stats.recommendations += summary.recommendations;
            stats.total_fixes += summary.total_fixes();
            if file.report.has_fix_at_or_above(Priority::Critical) {
                stats.files_with_critical += 1;
            }
        }
        stats
    }
}

/// A report tied to the file it was produced from
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: AuditReport,
}

/// Aggregate statistics from multiple file audits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of files audited
    pub files_audited: usize,
    /// Files with at least one critical fix
    pub files_with_critical: usize,
    pub critical_issues: usize,
    pub warnings: usize,
    pub recommendations: usize,
    pub total_fixes: usize,
}
