//! The `quizpulse analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizpulse_core::engine::Analyzer;
use quizpulse_core::model::{HistoricalAttempt, TopicStat};
use quizpulse_core::recommend::Recommendation;
use quizpulse_core::report::AnalysisReport;
use quizpulse_core::statistics::QuizTotals;
use quizpulse_core::traits::{AnalysisSink, MultiSink};
use quizpulse_report::chart::SvgChartSink;
use quizpulse_report::html::write_html_report;
use quizpulse_sources::config::load_config_from;

use super::{resolve_source, SourceArgs};

/// Prints the three tabular outputs to stdout. The chart request is left to
/// the SVG sink.
struct ConsoleSink;

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.1}")).unwrap_or_else(|| "–".to_string())
}

impl AnalysisSink for ConsoleSink {
    fn on_topic_summary(&self, totals: &QuizTotals, stats: &[TopicStat]) -> Result<()> {
        let mut table = Table::new();
        table.set_header(vec![
            "Topic",
            "Difficulty",
            "Questions",
            "Correct",
            "Accuracy",
            "Marks",
        ]);
        for s in stats {
            table.add_row(vec![
                Cell::new(&s.topic),
                Cell::new(&s.difficulty_level),
                Cell::new(s.total_questions),
                Cell::new(s.correct_answers),
                Cell::new(format!("{:.1}%", s.accuracy() * 100.0)),
                Cell::new(format!("{:.1}", s.total_marks)),
            ]);
        }

        println!("\nPerformance Summary:");
        println!("{table}");
        println!(
            "Total marks: {:.1} / {:.1} (correct {}, incorrect {}, unanswered {})",
            totals.total_marks, totals.max_marks, totals.correct, totals.incorrect, totals.unanswered
        );
        Ok(())
    }

    fn on_history(&self, attempts: &[HistoricalAttempt]) -> Result<()> {
        let mut table = Table::new();
        table.set_header(vec!["Submission", "Score %", "Accuracy %"]);
        for a in attempts {
            table.add_row(vec![
                Cell::new(a.submission_order),
                Cell::new(fmt_opt(a.score)),
                Cell::new(fmt_opt(a.accuracy)),
            ]);
        }

        println!("\nHistorical Performance:");
        println!("{table}");
        Ok(())
    }

    fn on_recommendations(&self, recommendations: &[Recommendation]) -> Result<()> {
        println!("\nRecommendations:");
        if recommendations.is_empty() {
            println!("  (none)");
        }
        for rec in recommendations {
            println!("- {rec}");
        }
        Ok(())
    }

    fn on_trend_chart(&self, _: &[HistoricalAttempt]) -> Result<()> {
        Ok(())
    }
}

pub async fn execute(
    source_args: SourceArgs,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "svg"]
    } else {
        format.split(',').map(str::trim).filter(|f| !f.is_empty()).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "json" | "html" | "svg" | "none"),
            "unknown format '{fmt}' (expected json, html, svg, all, or none)"
        );
    }

    let source = resolve_source(&source_args, &config)?;
    eprintln!(
        "quizpulse v{}: analyzing payloads from {} source",
        env!("CARGO_PKG_VERSION"),
        source.name()
    );

    let analyzer = Analyzer::new(config.rules);
    let analysis = analyzer.run(source.as_ref()).await?;
    let report = AnalysisReport::new(source.name(), config.rules, analysis);

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let wants = |f: &str| formats.contains(&f);

    let chart_sink = SvgChartSink::new(output.join(format!("trend-{timestamp}.svg")));
    let console = ConsoleSink;
    let sinks: Vec<&dyn AnalysisSink> = if wants("svg") {
        vec![&console, &chart_sink]
    } else {
        vec![&console]
    };
    analyzer.present(&report.analysis, &MultiSink::new(sinks))?;

    if wants("svg") {
        eprintln!("Trend chart: {}", chart_sink.path().display());
    }
    if wants("json") {
        let path = output.join(format!("report-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Results saved to: {}", path.display());
    }
    if wants("html") {
        let path = output.join(format!("report-{timestamp}.html"));
        write_html_report(&report, &path)?;
        eprintln!("HTML report: {}", path.display());
    }

    Ok(())
}
