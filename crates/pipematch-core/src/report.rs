//! Rendering of a [`ValidationResult`] into human-readable documents.
//!
//! Pure formatting: nothing here makes decisions, it only presents the
//! fields the orchestrator already assembled.

use crate::model::ValidationResult;

/// Presentation band for the score panel, distinct from the verdict
/// thresholds: >= 90 renders green, >= 70 amber, below that red.
fn score_class(score: f64) -> &'static str {
    if score >= 90.0 {
        "high"
    } else if score >= 70.0 {
        "medium"
    } else {
        "low"
    }
}

/// Escape text destined for HTML element content.
fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn match_row(label: &str, matched: bool) -> String {
    format!(
        "    <p>{}: <span class=\"{}\">{}</span></p>\n",
        label,
        if matched { "pass" } else { "fail" },
        if matched { "PASS" } else { "FAIL" },
    )
}

/// Render the validation result as a standalone HTML document.
pub fn render_html(result: &ValidationResult) -> String {
    let mut html = String::new();

    html.push_str(
        "<!DOCTYPE html>\n\
         <html>\n<head>\n\
         <title>Migration Validation Report</title>\n\
         <style>\n\
         body { font-family: Arial, sans-serif; margin: 40px; }\n\
         .header { background: #2c3e50; color: white; padding: 20px; border-radius: 5px; }\n\
         .score { font-size: 48px; font-weight: bold; }\n\
         .score.high { color: #27ae60; }\n\
         .score.medium { color: #f39c12; }\n\
         .score.low { color: #e74c3c; }\n\
         .section { margin: 20px 0; padding: 20px; border: 1px solid #ddd; border-radius: 5px; }\n\
         .pass { color: #27ae60; font-weight: bold; }\n\
         .fail { color: #e74c3c; font-weight: bold; }\n\
         .diff { background: #fff3cd; padding: 10px; margin: 10px 0; border-left: 4px solid #ffc107; }\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str("  <div class=\"header\">\n    <h1>Migration Validation Report</h1>\n");
    html.push_str(&format!(
        "    <p>Jenkins Build: {} | GHA Run: {}</p>\n",
        escape_html(&result.jenkins_build),
        escape_html(&result.gha_run),
    ));
    html.push_str(&format!(
        "    <p>Timestamp: {}</p>\n  </div>\n",
        result.timestamp.to_rfc3339()
    ));

    html.push_str("  <div class=\"section\">\n    <h2>Confidence Score</h2>\n");
    html.push_str(&format!(
        "    <div class=\"score {}\">{:.1}%</div>\n",
        score_class(result.confidence_score),
        result.confidence_score,
    ));
    html.push_str(&format!("    <p>Verdict: {}</p>\n  </div>\n", result.verdict));

    html.push_str("  <div class=\"section\">\n    <h2>Validation Results</h2>\n");
    html.push_str(&match_row("Tests Match", result.tests_match));
    html.push_str(&match_row("Artifacts Match", result.artifacts_match));
    html.push_str(&match_row("Exit Codes Match", result.exit_codes_match));
    html.push_str("  </div>\n");

    html.push_str("  <div class=\"section\">\n    <h2>Differences Found</h2>\n");
    if result.differences.is_empty() {
        html.push_str("    <p>No differences found!</p>\n");
    } else {
        for diff in &result.differences {
            html.push_str(&format!(
                "    <div class=\"diff\">{}</div>\n",
                escape_html(diff)
            ));
        }
    }
    html.push_str("  </div>\n</body>\n</html>\n");

    html
}

/// Render a plain-text summary for terminal output.
pub fn render_summary(result: &ValidationResult) -> String {
    let mark = |matched: bool| if matched { "yes" } else { "NO" };

    let mut summary = String::new();
    summary.push_str(&"=".repeat(60));
    summary.push('\n');
    summary.push_str(&format!(
        "Confidence Score: {:.1}%\n",
        result.confidence_score
    ));
    summary.push_str(&format!("Tests Match: {}\n", mark(result.tests_match)));
    summary.push_str(&format!(
        "Artifacts Match: {}\n",
        mark(result.artifacts_match)
    ));
    summary.push_str(&format!(
        "Exit Codes Match: {}\n",
        mark(result.exit_codes_match)
    ));
    summary.push('\n');
    summary.push_str(&format!("Verdict: {}\n", result.verdict));
    summary.push_str(&"=".repeat(60));
    summary.push('\n');

    summary
}
