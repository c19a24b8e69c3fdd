//! quizpulse-report — Report rendering for quizpulse.
//!
//! Renders the historical trend as a standalone SVG line chart and the full
//! analysis as a self-contained HTML page.

pub mod chart;
pub mod html;

pub(crate) fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
