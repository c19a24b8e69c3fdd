//! SVG line chart of the historical series.
//!
//! Plots score and accuracy (percent) against submission order. Missing
//! values leave a gap in their line rather than being interpolated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizpulse_core::model::{HistoricalAttempt, TopicStat};
use quizpulse_core::recommend::Recommendation;
use quizpulse_core::statistics::QuizTotals;
use quizpulse_core::traits::AnalysisSink;

use crate::escape;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

const SCORE_COLOR: &str = "#2563eb";
const ACCURACY_COLOR: &str = "#f97316";

/// Axis bounds for the value (y) axis. At least 0..100, widened to fit
/// any value outside that range.
fn y_bounds(attempts: &[HistoricalAttempt]) -> (f64, f64) {
    let values = attempts.iter().flat_map(|a| [a.score, a.accuracy]).flatten();
    let (lo, hi) = values.fold((0.0f64, 100.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo, hi)
}

struct Scale {
    n: usize,
    y_min: f64,
    y_max: f64,
}

impl Scale {
    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, order: u32) -> f64 {
        if self.n <= 1 {
            MARGIN_LEFT + Self::plot_width() / 2.0
        } else {
            MARGIN_LEFT + (order as f64 - 1.0) / (self.n as f64 - 1.0) * Self::plot_width()
        }
    }

    fn y(&self, value: f64) -> f64 {
        let span = (self.y_max - self.y_min).max(f64::EPSILON);
        MARGIN_TOP + (1.0 - (value - self.y_min) / span) * Self::plot_height()
    }
}

/// Split a series into runs of consecutive present points.
fn segments(points: impl Iterator<Item = (u32, Option<f64>)>) -> Vec<Vec<(u32, f64)>> {
    let mut out: Vec<Vec<(u32, f64)>> = Vec::new();
    let mut current = Vec::new();
    for (order, value) in points {
        match value {
            Some(v) => current.push((order, v)),
            None => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn push_series(
    svg: &mut String,
    scale: &Scale,
    label: &str,
    color: &str,
    points: impl Iterator<Item = (u32, Option<f64>)>,
) {
    svg.push_str(&format!("  <g class=\"series\" data-series=\"{label}\">\n"));
    for run in segments(points) {
        let coords: Vec<String> = run
            .iter()
            .map(|(o, v)| format!("{:.1},{:.1}", scale.x(*o), scale.y(*v)))
            .collect();
        if coords.len() > 1 {
            svg.push_str(&format!(
                "    <polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"/>\n",
                coords.join(" ")
            ));
        }
        for (o, v) in &run {
            svg.push_str(&format!(
                "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{color}\"><title>{label} #{o}: {v:.1}%</title></circle>\n",
                scale.x(*o),
                scale.y(*v)
            ));
        }
    }
    svg.push_str("  </g>\n");
}

/// Render the historical series as a standalone SVG document.
pub fn generate_trend_svg(attempts: &[HistoricalAttempt]) -> String {
    let (y_min, y_max) = y_bounds(attempts);
    let scale = Scale {
        n: attempts.len(),
        y_min,
        y_max,
    };

    let mut svg = format!(
        "<svg width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" font-family=\"sans-serif\">\n"
    );
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"28\" font-size=\"18\" text-anchor=\"middle\" fill=\"currentColor\">Historical Performance Trends</text>\n",
        WIDTH / 2.0
    ));

    // horizontal grid with percentage ticks
    let ticks = 5;
    for i in 0..=ticks {
        let value = y_min + (y_max - y_min) * i as f64 / ticks as f64;
        let y = scale.y(value);
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e5e7eb\"/>\n",
            WIDTH - MARGIN_RIGHT
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"12\" text-anchor=\"end\" dominant-baseline=\"middle\" fill=\"currentColor\">{value:.0}</text>\n",
            MARGIN_LEFT - 8.0
        ));
    }

    for a in attempts {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" fill=\"currentColor\">{}</text>\n",
            scale.x(a.submission_order),
            HEIGHT - MARGIN_BOTTOM + 20.0,
            a.submission_order
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\" fill=\"currentColor\">Quiz Submission Order</text>\n",
        MARGIN_LEFT + Scale::plot_width() / 2.0,
        HEIGHT - 15.0
    ));
    svg.push_str(&format!(
        "  <text x=\"20\" y=\"{y:.1}\" font-size=\"14\" text-anchor=\"middle\" fill=\"currentColor\" transform=\"rotate(-90 20 {y:.1})\">Percentage</text>\n",
        y = MARGIN_TOP + Scale::plot_height() / 2.0
    ));

    if attempts.is_empty() {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\" fill=\"#6b7280\">No historical attempts</text>\n",
            WIDTH / 2.0,
            HEIGHT / 2.0
        ));
    }

    push_series(
        &mut svg,
        &scale,
        "Score",
        SCORE_COLOR,
        attempts.iter().map(|a| (a.submission_order, a.score)),
    );
    push_series(
        &mut svg,
        &scale,
        "Accuracy",
        ACCURACY_COLOR,
        attempts.iter().map(|a| (a.submission_order, a.accuracy)),
    );

    // legend
    let lx = WIDTH - MARGIN_RIGHT - 120.0;
    for (i, (label, color)) in [("Score", SCORE_COLOR), ("Accuracy", ACCURACY_COLOR)]
        .iter()
        .enumerate()
    {
        let ly = MARGIN_TOP + 10.0 + i as f64 * 20.0;
        svg.push_str(&format!(
            "  <line x1=\"{lx:.1}\" y1=\"{ly:.1}\" x2=\"{:.1}\" y2=\"{ly:.1}\" stroke=\"{color}\" stroke-width=\"2\"/>\n",
            lx + 20.0
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{ly:.1}\" font-size=\"12\" dominant-baseline=\"middle\" fill=\"currentColor\">{}</text>\n",
            lx + 28.0,
            escape(label)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write the trend chart to a file.
pub fn write_trend_svg(attempts: &[HistoricalAttempt], path: &Path) -> Result<()> {
    let svg = generate_trend_svg(attempts);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, svg)
        .with_context(|| format!("failed to write chart to {}", path.display()))?;
    Ok(())
}

/// Sink that answers the chart request by writing an SVG file and ignores
/// the tabular outputs.
pub struct SvgChartSink {
    path: PathBuf,
}

impl SvgChartSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnalysisSink for SvgChartSink {
    fn on_topic_summary(&self, _: &QuizTotals, _: &[TopicStat]) -> Result<()> {
        Ok(())
    }

    fn on_history(&self, _: &[HistoricalAttempt]) -> Result<()> {
        Ok(())
    }

    fn on_recommendations(&self, _: &[Recommendation]) -> Result<()> {
        Ok(())
    }

    fn on_trend_chart(&self, attempts: &[HistoricalAttempt]) -> Result<()> {
        write_trend_svg(attempts, &self.path)
    }
}
