//! Edge case tests: degenerate inputs must not panic.

use pageaudit::{AuditEngine, AuditError, AuditMode, Findings, HtmlDocument};
use std::io::Write;
use tempfile::NamedTempFile;

fn both_modes(html: &str) {
    for mode in [AuditMode::Seo, AuditMode::Aeo] {
        let result = AuditEngine::new().audit_source(html, mode);
        assert!(result.is_ok(), "{} failed on {:?}", mode, html);
    }
}

#[test]
fn empty_document_is_an_error() {
    let err = AuditEngine::new()
        .audit_source("", AuditMode::Seo)
        .unwrap_err();
    assert!(matches!(err, AuditError::EmptyDocument));
}

#[test]
fn whitespace_document_is_an_error() {
    let err = AuditEngine::new()
        .audit_source(" \n\t ", AuditMode::Aeo)
        .unwrap_err();
    assert!(matches!(err, AuditError::EmptyDocument));
}

#[test]
fn invalid_utf8_is_an_error() {
    let err = HtmlDocument::from_bytes(&[0x3c, 0x70, 0x3e, 0xff, 0xfe]).err();
    assert!(matches!(err, Some(AuditError::Encoding(_))));
}

#[test]
fn invalid_utf8_file_yields_no_report() {
    let mut file = NamedTempFile::with_suffix(".html").unwrap();
    file.write_all(&[0xc3, 0x28, 0xa0, 0xa1]).unwrap();
    file.flush().unwrap();

    let err = AuditEngine::new().audit_file(file.path(), None).unwrap_err();
    assert!(format!("{:#}", err).contains("not valid UTF-8"));
}

#[test]
fn missing_file_is_an_error() {
    let result = AuditEngine::new().audit_file(std::path::Path::new("/no/such/page.html"), None);
    assert!(result.is_err());
}

#[test]
fn plain_text_no_panic() {
    both_modes("hello world, not really html");
}

#[test]
fn fragment_without_body_no_panic() {
    both_modes("<h2>Is this a fragment?</h2><p>Yes it is a fragment.</p>");
}

#[test]
fn unclosed_tags_no_panic() {
    both_modes("<html><head><title>Broken<body><p>never closed<ul><li>one");
}

#[test]
fn deeply_nested_markup_no_panic() {
    let html = format!("{}text{}", "<div>".repeat(500), "</div>".repeat(500));
    both_modes(&html);
}

#[test]
fn json_ld_edge_values() {
    // scalar, array and null payloads are all valid JSON
    for payload in ["42", "null", "[]", r#"[{"@type":"FAQPage"}]"#, "{}", ""] {
        let html = format!(
            r#"<head><script type="application/ld+json">{}</script></head>"#,
            payload
        );
        both_modes(&html);
    }
}

#[test]
fn faq_without_main_entity_counts_zero() {
    let html = r#"<script type="application/ld+json">{"@type":"FAQPage"}</script>"#;
    let report = AuditEngine::new().audit_source(html, AuditMode::Aeo).unwrap();
    match report.findings {
        Findings::Aeo(f) => {
            assert!(f.faq_schema.present);
            assert_eq!(f.faq_schema.count, 0);
        }
        other => panic!("expected AEO findings, got {:?}", other),
    }
}

#[test]
fn image_without_src_reported_as_unknown() {
    let report = AuditEngine::new()
        .audit_source("<body><img alt=''><img src='b.png' alt='B'></body>", AuditMode::Seo)
        .unwrap();
    match report.findings {
        Findings::Seo(f) => {
            assert_eq!(f.images.total, 2);
            assert_eq!(f.images.missing_alt, vec!["Unknown"]);
            assert_eq!(f.images.with_alt, 1);
        }
        other => panic!("expected SEO findings, got {:?}", other),
    }
    assert!(report
        .warnings
        .contains(&"1 images missing ALT text".to_string()));
}

#[test]
fn no_paragraphs_gives_zero_ratio_recommendation() {
    let report = AuditEngine::new()
        .audit_source("<body><h1>What is this?</h1></body>", AuditMode::Aeo)
        .unwrap();
    assert!(report
        .recommendations
        .contains(&"Only 0% short paragraphs - aim for 60%+".to_string()));
    assert!(report
        .warnings
        .contains(&"No definition-style opening".to_string()));
}

fn audit_with_directives(html: &str) -> pageaudit::AuditReport {
    AuditEngine::new()
        .with_inline_directives(true)
        .audit_source(html, AuditMode::Seo)
        .unwrap()
}

#[test]
fn ignore_directive_without_list_disables_nothing() {
    let report = audit_with_directives("<!-- pageaudit-ignore --><body></body>");
    assert_eq!(report.critical_issues.len(), 5);
}

#[test]
fn ignore_directive_with_checks() {
    let report =
        audit_with_directives("<!-- pageaudit-ignore missing-title, missing-h1 --><body></body>");
    assert!(!report.critical_issues.contains(&"Missing title tag".to_string()));
    assert!(!report.critical_issues.contains(&"Missing H1 tag".to_string()));
    assert_eq!(report.critical_issues.len(), 3);
}

#[test]
fn ignore_directive_needs_opt_in() {
    let html = "<!-- pageaudit-ignore missing-title, missing-h1 --><body></body>";
    let report = AuditEngine::new().audit_source(html, AuditMode::Seo).unwrap();
    assert_eq!(report.critical_issues.len(), 5);
}
