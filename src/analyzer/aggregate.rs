//! Fix aggregation and report assembly

use crate::{AuditMode, AuditReport, Check, Findings, Fix, Priority};
use std::collections::HashSet;

/// Sort fixes by priority rank. The sort is stable, so equal-priority fixes
/// keep their discovery order. Fix content is never altered or dropped.
pub fn prioritize_fixes(mut fixes: Vec<Fix>) -> Vec<Fix> {
    fixes.sort_by_key(|f| f.priority.rank());
    fixes
}

/// Collects the issue buckets and fixes emitted by one rule set, then
/// assembles the final [`AuditReport`].
pub struct ReportBuilder<'a> {
    mode: AuditMode,
    disabled: &'a HashSet<Check>,
    critical_issues: Vec<String>,
    warnings: Vec<String>,
    recommendations: Vec<String>,
    fixes: Vec<Fix>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(mode: AuditMode, disabled: &'a HashSet<Check>) -> Self {
        Self {
            mode,
            disabled,
            critical_issues: Vec::new(),
            warnings: Vec::new(),
            recommendations: Vec::new(),
            fixes: Vec::new(),
        }
    }

    pub fn mode(&self) -> AuditMode {
        self.mode
    }

    fn enabled(&self, check: Check) -> bool {
        !self.disabled.contains(&check)
    }

    /// Record a critical issue. Every critical issue carries its own critical fix.
    pub fn critical(&mut self, check: Check, issue: impl Into<String>, fix: Fix) {
        debug_assert_eq!(fix.priority, Priority::Critical, "{} fix must be critical", check);
        if !self.enabled(check) {
            return;
        }
        self.critical_issues.push(issue.into());
        self.fixes.push(fix);
    }

    pub fn warning(&mut self, check: Check, message: impl Into<String>, fix: Option<Fix>) {
        if !self.enabled(check) {
            return;
        }
        self.warnings.push(message.into());
        self.fixes.extend(fix);
    }

    pub fn recommendation(&mut self, check: Check, message: impl Into<String>, fix: Option<Fix>) {
        if !self.enabled(check) {
            return;
        }
        self.recommendations.push(message.into());
        self.fixes.extend(fix);
    }

    /// Sort fixes and wrap everything into the report
    pub fn finish(self, findings: Findings) -> AuditReport {
        AuditReport {
            mode: self.mode,
            findings,
            critical_issues: self.critical_issues,
            warnings: self.warnings,
            recommendations: self.recommendations,
            fixes: prioritize_fixes(self.fixes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AeoFindings;
    use proptest::prelude::*;

    fn fix(priority: Priority, title: &str) -> Fix {
        Fix::new(priority, title, "d", "<x>", "here")
    }

    #[test]
    fn sorts_by_rank_keeping_discovery_order() {
        let fixes = vec![
            fix(Priority::Medium, "m1"),
            fix(Priority::Critical, "c1"),
            fix(Priority::High, "h1"),
            fix(Priority::Medium, "m2"),
            fix(Priority::Critical, "c2"),
        ];
        let titles: Vec<String> = prioritize_fixes(fixes)
            .into_iter()
            .map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["c1", "c2", "h1", "m1", "m2"]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(prioritize_fixes(Vec::new()).is_empty());
    }

    #[test]
    fn disabled_check_drops_issue_and_fix_together() {
        let disabled: HashSet<Check> = [Check::NoTables].into_iter().collect();
        let mut builder = ReportBuilder::new(AuditMode::Aeo, &disabled);
        builder.recommendation(Check::NoTables, "tables", Some(fix(Priority::Medium, "t")));
        builder.warning(Check::FewLists, "lists", Some(fix(Priority::Medium, "l")));
        let report = builder.finish(Findings::Aeo(AeoFindings::default()));
        assert!(report.recommendations.is_empty());
        assert_eq!(report.warnings, vec!["lists"]);
        assert_eq!(report.fixes.len(), 1);
        assert_eq!(report.fixes[0].title, "l");
    }

    #[test]
    fn critical_issue_pairs_with_fix() {
        let disabled = HashSet::new();
        let mut builder = ReportBuilder::new(AuditMode::Seo, &disabled);
        builder.warning(Check::LowWordCount, "Low word count (3 words)", None);
        builder.critical(Check::MissingH1, "Missing H1 tag", fix(Priority::Critical, "h1"));
        let report = builder.finish(Findings::Aeo(AeoFindings::default()));
        assert_eq!(report.critical_issues.len(), 1);
        assert_eq!(report.fixes.len(), 1);
        assert_eq!(report.fixes[0].priority, Priority::Critical);
    }

    fn priority_strategy() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Critical),
            Just(Priority::High),
            Just(Priority::Medium),
        ]
    }

    proptest! {
        #[test]
        fn sorted_fixes_are_monotone_and_stable(priorities in prop::collection::vec(priority_strategy(), 0..40)) {
            let fixes: Vec<Fix> = priorities
                .iter()
                .enumerate()
                .map(|(i, p)| fix(*p, &i.to_string()))
                .collect();
            let sorted = prioritize_fixes(fixes.clone());

            prop_assert_eq!(sorted.len(), fixes.len());
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].priority.rank() <= pair[1].priority.rank());
                if pair[0].priority == pair[1].priority {
                    let a: usize = pair[0].title.parse().unwrap();
                    let b: usize = pair[1].title.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
