//! Report rendering: text for terminals, JSON for machines, HTML for
//! sharing.

use crate::interaction::InteractionKind;
use crate::report::AnalysisReport;
use std::fmt::Write;

/// Render a report as human-readable text.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut r = Renderer::new();

    r.line(&format!(
        "System: {} ({}, {})",
        report.system, report.domain, report.scale
    ));
    if !report.description.is_empty() {
        r.line(&format!("  {}", report.description));
    }
    r.line(&format!(
        "  {} components, {} relations, {} principles, {} tests",
        report.profile.components,
        report.profile.relations,
        report.profile.principles,
        report.profile.tests
    ));

    r.blank();
    r.line("Profile");
    r.line(&format!(
        "  mean confidence: {:.2}",
        report.profile.mean_confidence
    ));
    r.line(&format!(
        "  test coverage: {:.0}%",
        report.profile.test_coverage * 100.0
    ));
    if !report.profile.principles_by_category.is_empty() {
        let by_category: Vec<String> = report
            .profile
            .principles_by_category
            .iter()
            .map(|(category, count)| format!("{} {}", category, count))
            .collect();
        r.line(&format!("  by category: {}", by_category.join(", ")));
    }

    if !report.hypotheses.is_empty() {
        r.blank();
        r.line("Hypotheses");
        for h in &report.hypotheses {
            let refutable = if h.refutable { "refutable" } else { "IRREFUTABLE" };
            r.line(&format!(
                "  [{}] {} (confidence {:.2}, {})",
                h.principle, h.statement, h.confidence, refutable
            ));
        }
    }

    if !report.interactions.is_empty() {
        r.blank();
        r.line("Interactions");
        for finding in &report.interactions {
            let marker = match finding.kind {
                InteractionKind::Synergy => "+",
                InteractionKind::Tension => "!",
            };
            r.line(&format!(
                "  {} {} / {}: {}",
                marker, finding.a, finding.b, finding.note
            ));
        }
    }

    if !report.suggestions.is_empty() {
        r.blank();
        r.line("Pattern suggestions");
        for s in &report.suggestions {
            let params = if s.parameters.is_empty() {
                String::new()
            } else {
                format!(" [parameters: {}]", s.parameters.join(", "))
            };
            r.line(&format!(
                "  - {} (specializes {}): {}{}",
                s.pattern, s.parent, s.description, params
            ));
        }
    }

    if !report.warnings.is_empty() {
        r.blank();
        r.line("Warnings");
        for warning in &report.warnings {
            r.line(&format!("  - {}", warning));
            r.line(&format!("    hint: {}", warning.fix_hint()));
        }
    }

    if !report.recommendations.is_empty() {
        r.blank();
        r.line("Recommendations");
        for recommendation in &report.recommendations {
            r.line(&format!("  - {}", recommendation));
        }
    }

    r.output
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Render a report as a self-contained HTML page.
pub fn render_html(report: &AnalysisReport) -> String {
    let mut r = Renderer::new();

    r.line("<!DOCTYPE html>");
    r.line("<html lang=\"en\">");
    r.line("<head>");
    r.line("<meta charset=\"utf-8\">");
    r.line(&format!(
        "<title>SysLang analysis: {}</title>",
        escape(&report.system)
    ));
    r.line("<style>");
    r.line("body { font-family: sans-serif; max-width: 50rem; margin: 2rem auto; }");
    r.line("h2 { border-bottom: 1px solid #ccc; }");
    r.line(".tension { color: #a40000; } .synergy { color: #00693e; }");
    r.line(".irrefutable { color: #a40000; font-weight: bold; }");
    r.line("li { margin: 0.3rem 0; }");
    r.line("</style>");
    r.line("</head>");
    r.line("<body>");

    r.line(&format!(
        "<h1>{} <small>({}, {})</small></h1>",
        escape(&report.system),
        escape(&report.domain),
        escape(&report.scale)
    ));
    if !report.description.is_empty() {
        r.line(&format!("<p>{}</p>", escape(&report.description)));
    }
    r.line(&format!(
        "<p>{} components, {} relations, {} principles, {} tests; \
         mean confidence {:.2}, test coverage {:.0}%</p>",
        report.profile.components,
        report.profile.relations,
        report.profile.principles,
        report.profile.tests,
        report.profile.mean_confidence,
        report.profile.test_coverage * 100.0
    ));

    if !report.hypotheses.is_empty() {
        r.line("<h2>Hypotheses</h2>");
        r.line("<ul>");
        for h in &report.hypotheses {
            let badge = if h.refutable {
                String::new()
            } else {
                " <span class=\"irrefutable\">irrefutable</span>".to_string()
            };
            r.line(&format!(
                "<li><strong>{}</strong>: {} <em>(confidence {:.2})</em>{}</li>",
                escape(&h.principle),
                escape(&h.statement),
                h.confidence,
                badge
            ));
        }
        r.line("</ul>");
    }

    if !report.interactions.is_empty() {
        r.line("<h2>Interactions</h2>");
        r.line("<ul>");
        for finding in &report.interactions {
            let class = match finding.kind {
                InteractionKind::Synergy => "synergy",
                InteractionKind::Tension => "tension",
            };
            r.line(&format!(
                "<li class=\"{}\">{} / {}: {}</li>",
                class,
                escape(&finding.a),
                escape(&finding.b),
                escape(&finding.note)
            ));
        }
        r.line("</ul>");
    }

    if !report.suggestions.is_empty() {
        r.line("<h2>Pattern suggestions</h2>");
        r.line("<ul>");
        for s in &report.suggestions {
            r.line(&format!(
                "<li><strong>{}</strong> (specializes {}): {}</li>",
                escape(&s.pattern),
                escape(&s.parent),
                escape(&s.description)
            ));
        }
        r.line("</ul>");
    }

    if !report.warnings.is_empty() {
        r.line("<h2>Warnings</h2>");
        r.line("<ul>");
        for warning in &report.warnings {
            r.line(&format!(
                "<li>{} <em>({})</em></li>",
                escape(&warning.to_string()),
                escape(warning.fix_hint())
            ));
        }
        r.line("</ul>");
    }

    if !report.recommendations.is_empty() {
        r.line("<h2>Recommendations</h2>");
        r.line("<ul>");
        for recommendation in &report.recommendations {
            r.line(&format!("<li>{}</li>", escape(&recommendation.to_string())));
        }
        r.line("</ul>");
    }

    r.line("</body>");
    r.line("</html>");
    r.output
}

struct Renderer {
    output: String,
}

impl Renderer {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn line(&mut self, s: &str) {
        let _ = writeln!(self.output, "{}", s);
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
