//! Rule sets: one per audit mode

pub mod aeo;
pub mod seo;

pub use aeo::AeoRuleSet;
pub use seo::SeoRuleSet;

use super::aggregate::ReportBuilder;
use crate::document::DocumentTree;
use crate::{AuditMode, Findings};

/// A complete, independent pass over a document for one audit mode
pub trait RuleSet {
    /// Mode this rule set implements
    fn mode(&self) -> AuditMode;

    /// Inspect the document, push issues and fixes in discovery order, and
    /// return the structured findings. Must not depend on anything but `doc`.
    fn evaluate(&self, doc: &dyn DocumentTree, report: &mut ReportBuilder<'_>) -> Findings;
}

/// The rule set for a mode
pub fn rule_set_for(mode: AuditMode) -> Box<dyn RuleSet + Send + Sync> {
    match mode {
        AuditMode::Seo => Box::new(SeoRuleSet::new()),
        AuditMode::Aeo => Box::new(AeoRuleSet::new()),
    }
}

/// Whitespace-separated word count, ignoring empty tokens
pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
