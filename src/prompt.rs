//! Strategic report prompt generation
//!
//! Turns a technical audit into the instruction text for a language model
//! that writes a business-facing strategic report. Sending the prompt is
//! left to the caller.

use crate::{AuditMode, AuditReport};

/// Builder for the strategic report prompt
pub struct StrategicPromptBuilder {
    /// Extra context about the site, appended when set
    site_context: Option<String>,
}

impl StrategicPromptBuilder {
    pub fn new() -> Self {
        Self { site_context: None }
    }

    /// Add free-form context (industry, audience, competitors)
    pub fn with_site_context(mut self, context: impl Into<String>) -> Self {
        self.site_context = Some(context.into());
        self
    }

    /// Generate the prompt for one report. Deterministic for a given report.
    pub fn build(&self, report: &AuditReport) -> String {
        let name = report.mode.long_name();
        let findings = serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());

        let mut prompt = format!(
            r#"You are an expert {name} strategist analyzing technical audit findings. Based on the data below, generate a comprehensive strategic report.

TECHNICAL AUDIT FINDINGS:
{findings}

Generate a strategic {name} report with:

1. **Executive Summary** - Overall health score (1-10), top 3 critical findings, projected impact
2. **Business Impact Analysis** - How issues affect traffic/conversions, competitive implications, risks
3. **Prioritized Action Plan** - Week 1 (critical), Weeks 2-4 (high priority), Months 2-3 (strategic)
4. **ROI Projections** - Expected improvements, timeline, resources needed
5. **Competitive Positioning** - Industry comparison, opportunities, strengths/weaknesses
6. **Strategic Recommendations** - Content strategy, technical architecture, long-term roadmap

{focus}

Format in clean markdown with headers, bullets, and clear sections. Be specific and actionable."#,
            name = name,
            findings = findings,
            focus = mode_focus(report.mode),
        );

        if let Some(ref context) = self.site_context {
            prompt.push_str("\n\nSITE CONTEXT:\n");
            prompt.push_str(context);
        }
        prompt
    }
}

impl Default for StrategicPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn mode_focus(mode: AuditMode) -> &'static str {
    match mode {
        AuditMode::Aeo => "Focus on AI-powered search engines (ChatGPT, Perplexity, Google AI Overviews, Bing Chat) and how to optimize for answer extraction and citations.",
        AuditMode::Seo => "Focus on traditional search engines (Google, Bing) and ranking factors.",
    }
}
