//! JSON reporter for machine-readable output

use crate::analyzer::{AggregateStats, FileReport};
use crate::AuditReport;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// A single report, serialized as-is
    pub fn report(&self, report: &AuditReport) -> String {
        self.render(report, "{}")
    }

    /// Multiple file reports with an aggregate summary
    pub fn report_with_summary(&self, results: &[FileReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results,
            summary: stats,
        };
        self.render(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [FileReport],
    summary: &'a AggregateStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuditEngine, AuditMode};

    fn report(mode: AuditMode) -> AuditReport {
        AuditEngine::new()
            .audit_source("<html><body><h1>Hello</h1></body></html>", mode)
            .unwrap()
    }

    #[test]
    fn test_json_single_report_has_expected_keys() {
        let json = JsonReporter::new().report(&report(AuditMode::Seo));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["auditType"], "SEO");
        assert!(parsed.get("findings").is_some());
        assert!(parsed.get("criticalIssues").is_some());
        assert!(parsed.get("warnings").is_some());
        assert!(parsed.get("recommendations").is_some());
        assert!(parsed["findings"]["title"]["content"].is_null());
        assert_eq!(parsed["findings"]["headers"]["h1"][0], "Hello");
        assert_eq!(parsed["fixes"][0]["priority"], "critical");
        assert!(parsed["fixes"][0].get("code").is_some());
    }

    #[test]
    fn test_json_aeo_field_names() {
        let json = JsonReporter::new().report(&report(AuditMode::Aeo));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let findings = &parsed["findings"];
        assert_eq!(parsed["auditType"], "AEO");
        for key in [
            "faqSchema",
            "howToSchema",
            "questionHeaders",
            "directAnswers",
            "lists",
            "tables",
            "definitionStyle",
            "contentStructure",
        ] {
            assert!(findings.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(findings["contentStructure"]["totalParagraphs"], 0);
    }

    #[test]
    fn test_json_round_trips() {
        let original = report(AuditMode::Aeo);
        let json = JsonReporter::new().pretty().report(&original);
        let parsed: AuditReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_json_pretty_output() {
        let json = JsonReporter::new().pretty().report(&report(AuditMode::Seo));
        assert!(json.contains('\n'), "pretty JSON should have newlines");
        assert!(json.contains("  "), "pretty JSON should have indentation");
    }

    #[test]
    fn test_json_report_with_summary() {
        let results = vec![
            FileReport {
                path: "a.html".into(),
                report: report(AuditMode::Seo),
            },
            FileReport {
                path: "b.html".into(),
                report: report(AuditMode::Seo),
            },
        ];
        let stats = AuditEngine::aggregate_stats(&results);

        let json = JsonReporter::new().report_with_summary(&results, &stats);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["results"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["results"][0]["path"], "a.html");
        assert_eq!(parsed["results"][1]["auditType"], "SEO");
        assert_eq!(parsed["summary"]["filesAudited"], 2);
    }
}
