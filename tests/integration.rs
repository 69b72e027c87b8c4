//! Integration tests: full audit pipeline from HTML text to report

use pageaudit::analyzer::prioritize_fixes;
use pageaudit::{
    AeoFindings, AuditEngine, AuditMode, AuditReport, Findings, Fix, HtmlDocument, Priority,
    SeoFindings,
};
use proptest::prelude::*;

fn audit(html: &str, mode: AuditMode) -> AuditReport {
    AuditEngine::new()
        .audit_source(html, mode)
        .unwrap_or_else(|e| panic!("audit failed: {}", e))
}

fn seo(report: &AuditReport) -> &SeoFindings {
    match &report.findings {
        Findings::Seo(f) => f,
        other => panic!("expected SEO findings, got {:?}", other),
    }
}

fn aeo(report: &AuditReport) -> &AeoFindings {
    match &report.findings {
        Findings::Aeo(f) => f,
        other => panic!("expected AEO findings, got {:?}", other),
    }
}

fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

fn assert_sorted(fixes: &[Fix]) {
    let ranks: Vec<u8> = fixes.iter().map(|f| f.priority.rank()).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted, "fixes out of priority order");
}

// --- Scenarios ---

#[test]
fn bare_page_has_five_critical_seo_issues() {
    let report = audit("<html><body><p>Just some text</p></body></html>", AuditMode::Seo);

    assert_eq!(
        report.critical_issues,
        vec![
            "Missing title tag",
            "Missing meta description",
            "Missing viewport meta tag",
            "Missing H1 tag",
            "No structured data found",
        ]
    );
    assert_eq!(report.fixes.len(), 5);
    assert!(report.fixes.iter().all(|f| f.priority == Priority::Critical));
    // only the word count check warns
    assert_eq!(report.warnings, vec!["Low word count (3 words)"]);
    assert!(report.recommendations.is_empty());
}

#[test]
fn page_comments_cannot_hide_issues_by_default() {
    let doc = HtmlDocument::parse(
        "<head><!-- pageaudit-ignore missing-title missing-meta-description missing-viewport \
         missing-h1 missing-structured-data --></head><body><p>x</p></body>",
    )
    .unwrap();
    let report = AuditEngine::new().audit_document(&doc, AuditMode::Seo);
    assert_eq!(report.critical_issues.len(), 5);
    assert_eq!(report.fixes.len(), 5);
}

#[test]
fn faq_schema_with_three_entities() {
    let html = r#"<html><head>
        <script type="application/ld+json">{"@type":"FAQPage","mainEntity":[{},{},{}]}</script>
        </head><body></body></html>"#;
    let report = audit(html, AuditMode::Aeo);
    let findings = aeo(&report);

    assert!(findings.faq_schema.present);
    assert_eq!(findings.faq_schema.count, 3);
    assert!(!report
        .critical_issues
        .iter()
        .any(|i| i.starts_with("No FAQPage schema")));
}

#[test]
fn malformed_json_ld_is_treated_as_absent() {
    let html = r#"<html><head>
        <script type="application/ld+json">{"@type": "FAQPage", </script>
        </head><body><h1>How to bake bread</h1></body></html>"#;

    let seo_report = audit(html, AuditMode::Seo);
    assert!(seo_report
        .critical_issues
        .contains(&"No structured data found".to_string()));
    assert!(seo(&seo_report).schema.json_ld.is_empty());

    let aeo_report = audit(html, AuditMode::Aeo);
    let findings = aeo(&aeo_report);
    assert!(!findings.faq_schema.present);
    assert!(!findings.how_to_schema.present);
    assert!(aeo_report
        .warnings
        .contains(&"HowTo content detected but no HowTo schema".to_string()));
}

#[test]
fn malformed_block_does_not_hide_valid_one() {
    let html = r#"<head>
        <script type="application/ld+json">not json</script>
        <script type="application/ld+json">{"@type":"HowTo","name":"x"}</script>
        </head>"#;
    let report = audit(html, AuditMode::Aeo);
    assert!(aeo(&report).how_to_schema.present);
}

#[test]
fn mixed_case_rel_and_type_are_recognized() {
    let html = r#"<head>
        <link rel="Canonical" href="https://acme.test/">
        <script type="Application/LD+JSON">{"@type":"Organization"}</script>
        </head><body><h1>Acme</h1></body>"#;
    let report = audit(html, AuditMode::Seo);
    let findings = seo(&report);

    assert_eq!(findings.meta.canonical.as_deref(), Some("https://acme.test/"));
    assert_eq!(findings.schema.json_ld.len(), 1);
    assert!(!report
        .critical_issues
        .contains(&"No structured data found".to_string()));
}

#[test]
fn paragraph_ratio_seventy_vs_fifty() {
    let short = format!("<p>{}</p>", words(20));
    let long = format!("<p>{}</p>", words(150));

    let seventy = audit(
        &format!("<body>{}{}</body>", short.repeat(7), long.repeat(3)),
        AuditMode::Aeo,
    );
    let structure = &aeo(&seventy).content_structure;
    assert_eq!(structure.short_paragraphs, 7);
    assert_eq!(structure.total_paragraphs, 10);
    assert_eq!(structure.short_paragraph_ratio(), 70.0);
    assert!(!seventy.fixes.iter().any(|f| f.title == "Break Up Long Paragraphs"));

    let fifty = audit(
        &format!("<body>{}{}</body>", short.repeat(5), long.repeat(5)),
        AuditMode::Aeo,
    );
    assert!(fifty
        .recommendations
        .contains(&"Only 50% short paragraphs - aim for 60%+".to_string()));
    assert!(fifty.fixes.iter().any(|f| f.title == "Break Up Long Paragraphs"));
}

#[test]
fn two_of_three_headings_are_questions() {
    let html = "<body><h2>What is X?</h2><h2>Our Team</h2><h3>How does Y work</h3></body>";
    let report = audit(html, AuditMode::Aeo);
    let headers = &aeo(&report).question_headers;

    assert_eq!(headers.count, 2);
    assert_eq!(headers.examples, vec!["What is X?", "How does Y work"]);
    assert!(report
        .warnings
        .contains(&"Only 2 question headers - aim for 5+".to_string()));
}

// --- Boundaries ---

#[test]
fn direct_answer_window_is_inclusive() {
    for (n, expected) in [(39, 0), (40, 1), (60, 1), (61, 0)] {
        let report = audit(&format!("<body><p>{}</p></body>", words(n)), AuditMode::Aeo);
        assert_eq!(
            aeo(&report).direct_answers.count,
            expected,
            "{} words",
            n
        );
    }
}

#[test]
fn two_lists_are_enough() {
    let one = audit("<body><ul><li>a</li></ul></body>", AuditMode::Aeo);
    assert!(one.fixes.iter().any(|f| f.title == "Add Structured Lists"));

    let two = audit(
        "<body><ol><li>a</li></ol><ul><li>b</li></ul></body>",
        AuditMode::Aeo,
    );
    let lists = &aeo(&two).lists;
    assert_eq!((lists.numbered, lists.bulleted), (1, 1));
    assert!(!two.fixes.iter().any(|f| f.title == "Add Structured Lists"));
}

#[test]
fn definition_opening_uses_first_paragraph_only() {
    let yes = audit(
        "<body><p>Composting is the process of recycling organic matter.</p></body>",
        AuditMode::Aeo,
    );
    assert!(aeo(&yes).definition_style.present);

    let no = audit(
        "<body><p>Welcome to our blog.</p><p>Composting is great.</p></body>",
        AuditMode::Aeo,
    );
    assert!(!aeo(&no).definition_style.present);
    assert!(no.warnings.contains(&"No definition-style opening".to_string()));
}

// --- Report invariants ---

#[test]
fn every_critical_issue_has_a_critical_fix() {
    for mode in [AuditMode::Seo, AuditMode::Aeo] {
        let report = audit("<body><p>tiny</p></body>", mode);
        let critical_fixes = report
            .fixes
            .iter()
            .filter(|f| f.priority == Priority::Critical)
            .count();
        assert!(critical_fixes >= report.critical_issues.len(), "{}", mode);
    }
}

#[test]
fn audits_are_idempotent() {
    let html = r#"<html><head><title>Garden</title></head><body>
        <h1>How to grow tomatoes?</h1><p>Tomatoes is a fruit.</p>
        <img src="a.png"><table></table></body></html>"#;
    for mode in [AuditMode::Seo, AuditMode::Aeo] {
        let first = audit(html, mode);
        let second = audit(html, mode);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn aeo_fixes_are_sorted_with_stable_ties() {
    let report = audit("<body><h2>Intro</h2><p>short</p></body>", AuditMode::Aeo);
    assert_sorted(&report.fixes);

    let titles: Vec<&str> = report.fixes.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Add FAQPage Schema Markup",
            "Add Question-Based Headers",
            "Add Direct Answer Paragraphs",
            "Add Definition-Style Content",
            "Add Structured Lists",
            "Add Comparison Tables",
        ]
    );
}

#[test]
fn json_uses_camel_case_field_names() {
    let report = audit("<body><h1>Hi</h1></body>", AuditMode::Seo);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["auditType"], "SEO");
    assert!(value["criticalIssues"].is_array());
    assert!(value["findings"]["meta"]["descriptionLength"].is_number());
    assert!(value["findings"]["images"]["missingAlt"].is_array());
}

#[test]
fn engine_with_disabled_checks_drops_issue_and_fix() {
    let report = AuditEngine::new()
        .with_disabled_checks([pageaudit::Check::MissingFaqSchema])
        .audit_source("<body></body>", AuditMode::Aeo)
        .unwrap();
    assert!(!report.fixes.iter().any(|f| f.title == "Add FAQPage Schema Markup"));
    assert_eq!(report.critical_issues, vec!["No question-based headers found"]);
}

// --- Properties ---

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Critical),
        Just(Priority::High),
        Just(Priority::Medium)
    ]
}

proptest! {
    #[test]
    fn prioritize_is_stable_sort(priorities in prop::collection::vec(priority(), 0..20)) {
        let fixes: Vec<Fix> = priorities
            .iter()
            .enumerate()
            .map(|(i, p)| Fix::new(*p, format!("fix {}", i), "", "", ""))
            .collect();
        let sorted = prioritize_fixes(fixes.clone());

        prop_assert_eq!(sorted.len(), fixes.len());
        assert_sorted(&sorted);
        for window in sorted.windows(2) {
            if window[0].priority == window[1].priority {
                let a: usize = window[0].title[4..].parse().unwrap();
                let b: usize = window[1].title[4..].parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn short_paragraph_ratio_is_a_percentage(lengths in prop::collection::vec(0usize..200, 0..12)) {
        let body: String = lengths.iter().map(|n| format!("<p>{}</p>", words(*n))).collect();
        let report = audit(&format!("<body>{}</body>", body), AuditMode::Aeo);
        let structure = &aeo(&report).content_structure;

        prop_assert!(structure.short_paragraphs <= structure.total_paragraphs);
        prop_assert_eq!(structure.total_paragraphs, lengths.len());
        let ratio = structure.short_paragraph_ratio();
        prop_assert!((0.0..=100.0).contains(&ratio));
        if lengths.is_empty() {
            prop_assert_eq!(ratio, 0.0);
        }
    }
}
