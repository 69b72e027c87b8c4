//! Answer-engine checks: how well a page lends itself to extraction by
//! AI answer engines (FAQ/HowTo schema, question headings, concise answer
//! paragraphs, lists, tables and definition-style openings).

use super::{word_count, RuleSet};
use crate::analyzer::aggregate::ReportBuilder;
use crate::analyzer::jsonld;
use crate::document::DocumentTree;
use crate::{
    AeoFindings, AuditMode, Check, ContentStructure, DefinitionFinding, ExampleCount,
    FaqSchemaFinding, Findings, Fix, HowToSchemaFinding, ListFinding, Priority, TableFinding,
};
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

static QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(what|how|why|when|where|who|is|are|can|does|do)\s").unwrap()
});
static DEFINITION_IS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^.+\s+is\s+").unwrap());
static DEFINITION_REFERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^.+\s+refers to\s+").unwrap());

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

const MAX_QUESTION_EXAMPLES: usize = 5;
/// Question headings below this count (but above zero) get a warning
const FEW_QUESTION_HEADERS: usize = 3;
const DIRECT_ANSWER_WORDS: RangeInclusive<usize> = 40..=60;
const MAX_ANSWER_EXAMPLES: usize = 3;
const ANSWER_EXAMPLE_CHARS: usize = 100;
const SHORT_PARAGRAPH_WORDS: usize = 100;
const MIN_LISTS: usize = 2;
const MIN_SHORT_PARAGRAPH_PERCENT: f64 = 60.0;

const FAQ_TEMPLATE: &str = r#"<script type="application/ld+json">
{
  "@context": "https://schema.org",
  "@type": "FAQPage",
  "mainEntity": [{
    "@type": "Question",
    "name": "What is your main service?",
    "acceptedAnswer": {
      "@type": "Answer",
      "text": "Provide a clear, concise answer here."
    }
  }]
}
</script>"#;

const QUESTION_HEADERS_TEMPLATE: &str = "<h2>What is [Your Topic]?</h2>
<p>Provide a direct, concise answer in the first 40-60 words...</p>

<h2>How does [Your Service] work?</h2>
<p>Step-by-step explanation...</p>

<h2>Why choose [Your Product]?</h2>
<p>List key benefits...</p>";

const DIRECT_ANSWER_TEMPLATE: &str = "<h2>What is [Topic]?</h2>
<p>[Topic] is a [concise definition in 40-60 words]. This direct answer format helps AI engines extract and cite your content. Keep it clear, specific, and self-contained.</p>";

const LISTS_TEMPLATE: &str = "<h3>How to [Do Something]:</h3>
<ol>
  <li>First step with clear action</li>
  <li>Second step with specific details</li>
  <li>Third step with expected outcome</li>
</ol>

<h3>Key Benefits:</h3>
<ul>
  <li>Benefit one with explanation</li>
  <li>Benefit two with data point</li>
  <li>Benefit three with use case</li>
</ul>";

const TABLE_TEMPLATE: &str = "<table>
  <thead>
    <tr>
      <th>Feature</th>
      <th>Option A</th>
      <th>Option B</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <td>Price</td>
      <td>$99/mo</td>
      <td>$199/mo</td>
    </tr>
    <tr>
      <td>Users</td>
      <td>Up to 10</td>
      <td>Unlimited</td>
    </tr>
  </tbody>
</table>";

const DEFINITION_TEMPLATE: &str = "<h1>What is [Your Topic]?</h1>
<p>[Your Topic] is [a clear definition that AI can extract]. It [key characteristic or purpose]. This [benefit or use case].</p>";

const HOWTO_TEMPLATE: &str = r#"<script type="application/ld+json">
{
  "@context": "https://schema.org",
  "@type": "HowTo",
  "name": "How to [Do Something]",
  "step": [
    {
      "@type": "HowToStep",
      "name": "Step 1",
      "text": "First step description"
    },
    {
      "@type": "HowToStep",
      "name": "Step 2",
      "text": "Second step description"
    }
  ]
}
</script>"#;

const PARAGRAPH_SPLIT_TEMPLATE: &str = "<!-- BEFORE: Long paragraph -->
<p>This is a very long paragraph with multiple ideas that makes it hard for AI to extract specific information and it goes on and on without clear structure...</p>

<!-- AFTER: Short, focused paragraphs -->
<p>First key idea in 2-3 sentences.</p>
<p>Second key idea with supporting detail.</p>
<p>Third key idea with clear takeaway.</p>";

/// Whether trimmed heading text reads as a question
pub fn is_question_heading(text: &str) -> bool {
    QUESTION_START.is_match(text) || text.ends_with('?')
}

/// Whether text opens as "<subject> is ..." or "<subject> refers to ..."
pub fn is_definition_opening(text: &str) -> bool {
    DEFINITION_IS.is_match(text) || DEFINITION_REFERS.is_match(text)
}

fn answer_example(text: &str) -> String {
    let mut example: String = text.chars().take(ANSWER_EXAMPLE_CHARS).collect();
    example.push_str("...");
    example
}

/// AEO rule set
pub struct AeoRuleSet;

impl AeoRuleSet {
    pub fn new() -> Self {
        Self
    }

    /// FAQPage and HowTo detection across every entity of every block.
    /// A later FAQPage entity replaces the count of an earlier one.
    fn schemas(doc: &dyn DocumentTree) -> (FaqSchemaFinding, HowToSchemaFinding) {
        let mut faq = FaqSchemaFinding::default();
        let mut how_to = HowToSchemaFinding::default();
        for block in jsonld::parse_blocks(doc) {
            for entity in jsonld::entities(&block) {
                if jsonld::has_type(entity, "FAQPage") {
                    faq.present = true;
                    faq.count = jsonld::main_entity_count(entity);
                }
                if jsonld::has_type(entity, "HowTo") {
                    how_to.present = true;
                }
            }
        }
        (faq, how_to)
    }

    /// Question headings among all heading levels, in document order
    fn question_headers(headings: &[String]) -> ExampleCount {
        let mut found = ExampleCount::default();
        for text in headings.iter().filter(|t| is_question_heading(t)) {
            found.count += 1;
            if found.examples.len() < MAX_QUESTION_EXAMPLES {
                found.examples.push(text.clone());
            }
        }
        found
    }

    fn paragraphs(paragraphs: &[String]) -> (ExampleCount, ContentStructure) {
        let mut answers = ExampleCount::default();
        let mut structure = ContentStructure::default();
        for text in paragraphs {
            let words = word_count(text);
            if DIRECT_ANSWER_WORDS.contains(&words) {
                answers.count += 1;
                if answers.examples.len() < MAX_ANSWER_EXAMPLES {
                    answers.examples.push(answer_example(text));
                }
            }
            if words <= SHORT_PARAGRAPH_WORDS {
                structure.short_paragraphs += 1;
            }
            structure.total_paragraphs += 1;
        }
        (answers, structure)
    }
}

impl Default for AeoRuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for AeoRuleSet {
    fn mode(&self) -> AuditMode {
        AuditMode::Aeo
    }

    fn evaluate(&self, doc: &dyn DocumentTree, report: &mut ReportBuilder<'_>) -> Findings {
        let (faq_schema, how_to_schema) = Self::schemas(doc);
        if !faq_schema.present {
            report.critical(
                Check::MissingFaqSchema,
                "No FAQPage schema - AI engines cannot extract Q&A",
                Fix::new(
                    Priority::Critical,
                    "Add FAQPage Schema Markup",
                    "Critical for AI answer extraction and featured snippets",
                    FAQ_TEMPLATE,
                    "Add to <head> or before </body>",
                ),
            );
        }

        let headings: Vec<String> = doc
            .elements(&HEADING_TAGS)
            .iter()
            .map(|h| h.trimmed_text().to_string())
            .collect();
        let question_headers = Self::question_headers(&headings);
        match question_headers.count {
            0 => report.critical(
                Check::NoQuestionHeaders,
                "No question-based headers found",
                Fix::new(
                    Priority::Critical,
                    "Add Question-Based Headers",
                    "AI engines prioritize content that directly answers questions",
                    QUESTION_HEADERS_TEMPLATE,
                    "Throughout your content",
                ),
            ),
            n if n < FEW_QUESTION_HEADERS => report.warning(
                Check::FewQuestionHeaders,
                format!("Only {} question headers - aim for 5+", n),
                None,
            ),
            _ => {}
        }

        let paragraphs: Vec<String> = doc
            .elements(&["p"])
            .iter()
            .map(|p| p.trimmed_text().to_string())
            .collect();
        let (direct_answers, content_structure) = Self::paragraphs(&paragraphs);
        if direct_answers.count == 0 {
            report.warning(
                Check::NoDirectAnswers,
                "No concise answer paragraphs (40-60 words) found",
                Some(Fix::new(
                    Priority::High,
                    "Add Direct Answer Paragraphs",
                    "AI engines extract 40-60 word answers for featured snippets",
                    DIRECT_ANSWER_TEMPLATE,
                    "After each question-based header",
                )),
            );
        }

        let lists = ListFinding {
            numbered: doc.elements(&["ol"]).len(),
            bulleted: doc.elements(&["ul"]).len(),
        };
        if lists.numbered + lists.bulleted < MIN_LISTS {
            report.warning(
                Check::FewLists,
                "Few or no lists - AI engines prioritize structured content",
                Some(Fix::new(
                    Priority::Medium,
                    "Add Structured Lists",
                    "Lists help AI engines extract step-by-step information",
                    LISTS_TEMPLATE,
                    "Throughout content",
                )),
            );
        }

        let tables = TableFinding {
            count: doc.elements(&["table"]).len(),
        };
        if tables.count == 0 {
            report.recommendation(
                Check::NoTables,
                "No comparison tables - great for AI extraction",
                Some(Fix::new(
                    Priority::Medium,
                    "Add Comparison Tables",
                    "Tables enable AI engines to extract structured comparisons",
                    TABLE_TEMPLATE,
                    "In comparison or pricing sections",
                )),
            );
        }

        let definition_style = DefinitionFinding {
            present: paragraphs
                .first()
                .is_some_and(|first| is_definition_opening(first)),
        };
        if !definition_style.present {
            report.warning(
                Check::NoDefinitionOpening,
                "No definition-style opening",
                Some(Fix::new(
                    Priority::High,
                    "Add Definition-Style Content",
                    "AI engines prioritize clear definitions for informational queries",
                    DEFINITION_TEMPLATE,
                    "Top of main content",
                )),
            );
        }

        let how_to_heading = headings
            .iter()
            .any(|h| h.to_lowercase().contains("how to"));
        if !how_to_schema.present && how_to_heading {
            report.warning(
                Check::MissingHowtoSchema,
                "HowTo content detected but no HowTo schema",
                Some(Fix::new(
                    Priority::High,
                    "Add HowTo Schema",
                    "Essential for step-by-step content in AI results",
                    HOWTO_TEMPLATE,
                    "In <head> or before </body>",
                )),
            );
        }

        let ratio = content_structure.short_paragraph_ratio();
        if ratio < MIN_SHORT_PARAGRAPH_PERCENT {
            report.recommendation(
                Check::LongParagraphs,
                format!("Only {}% short paragraphs - aim for 60%+", ratio.round()),
                Some(Fix::new(
                    Priority::Medium,
                    "Break Up Long Paragraphs",
                    "AI engines prefer scannable, concise content",
                    PARAGRAPH_SPLIT_TEMPLATE,
                    "Break long paragraphs throughout content",
                )),
            );
        }

        Findings::Aeo(AeoFindings {
            faq_schema,
            how_to_schema,
            question_headers,
            direct_answers,
            lists,
            tables,
            definition_style,
            content_structure,
        })
    }
}
