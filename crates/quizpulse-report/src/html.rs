//! HTML report generator.
//!
//! Produces a self-contained HTML file with CSS and the trend chart inlined.

use anyhow::Result;
use std::path::Path;

use quizpulse_core::model::Outcome;
use quizpulse_core::recommend::RecommendationKind;
use quizpulse_core::report::AnalysisReport;

use crate::chart::generate_trend_svg;
use crate::escape;

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.1}")).unwrap_or_else(|| "–".to_string())
}

/// Generate an HTML report from an analysis report.
pub fn generate_html(report: &AnalysisReport) -> String {
    let analysis = &report.analysis;
    let totals = &analysis.totals;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>quizpulse report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>quizpulse report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Source: <strong>{}</strong> | {} questions | {} historical attempts | {}</p>\n",
        escape(&report.source),
        totals.total_questions,
        analysis.history.len(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Totals
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"totals\">Marks <strong>{:.1}</strong> / {:.1} | correct {} | incorrect {} | unanswered {} | accuracy on attempted {:.1}%</p>\n",
        totals.total_marks,
        totals.max_marks,
        totals.correct,
        totals.incorrect,
        totals.unanswered,
        totals.attempt_accuracy() * 100.0
    ));

    // Topic table
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Topic</th><th>Difficulty</th><th>Questions</th><th>Correct</th><th>Accuracy</th><th>Marks</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for stat in &analysis.topic_stats {
        let class = if report.rules.is_weak(stat) {
            "weak"
        } else if report.rules.is_strong(stat) {
            "strong"
        } else {
            ""
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}</td></tr>\n",
            class,
            escape(&stat.topic),
            escape(&stat.difficulty_level),
            stat.total_questions,
            stat.correct_answers,
            stat.accuracy() * 100.0,
            stat.total_marks,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Recommendations
    html.push_str("<section class=\"recommendations\">\n");
    html.push_str("<h2>Recommendations</h2>\n");
    if analysis.recommendations.is_empty() {
        html.push_str("<p class=\"meta\">No recommendations.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for rec in &analysis.recommendations {
            let class = match rec.kind {
                RecommendationKind::WeakTopic | RecommendationKind::NeedsImprovement => "weak",
                RecommendationKind::StrongTopic | RecommendationKind::SteadilyImproving => "strong",
            };
            html.push_str(&format!(
                "<li class=\"{}\">{}</li>\n",
                class,
                escape(&rec.message)
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // History
    html.push_str("<section class=\"history\">\n");
    html.push_str("<h2>Historical Performance</h2>\n");
    html.push_str(&generate_trend_svg(&analysis.history.attempts));
    html.push_str("<table class=\"history-table\">\n");
    html.push_str("<thead><tr><th>Submission</th><th>Score %</th><th>Accuracy %</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for a in &analysis.history.attempts {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            a.submission_order,
            fmt_opt(a.score),
            fmt_opt(a.accuracy)
        ));
    }
    html.push_str("</tbody></table>\n");
    for w in &analysis.history.warnings {
        html.push_str(&format!("<p class=\"warning\">{}</p>\n", escape(&w.to_string())));
    }
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"questions\">\n");
    html.push_str("<details>\n<summary>Per-question results</summary>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str("<thead><tr><th>Question</th><th>Topic</th><th>Difficulty</th><th>Selected</th><th>Outcome</th><th>Marks</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for q in &analysis.questions {
        let class = match q.outcome {
            Outcome::Correct => "pass",
            Outcome::Incorrect => "fail",
            Outcome::Unanswered => "",
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:+.1}</td></tr>\n",
            class,
            escape(&q.question_id),
            escape(&q.topic),
            escape(&q.difficulty_level),
            escape(&q.selected_option.to_string()),
            q.outcome,
            q.marks
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</details>\n</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass, .strong { background: var(--pass); }
.fail, .weak { background: var(--fail); }
.warning { color: #b45309; font-size: 0.9rem; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; max-width: 100%; height: auto; }
"#;
