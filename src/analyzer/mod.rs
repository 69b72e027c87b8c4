//! Analyzer module - SEO/AEO audit engine

pub mod aggregate;
pub mod directives;
pub mod engine;
pub mod jsonld;
pub mod rules;

pub use aggregate::{prioritize_fixes, ReportBuilder};
pub use engine::{AggregateStats, AuditEngine, FileReport};
pub use rules::{rule_set_for, AeoRuleSet, RuleSet, SeoRuleSet};
