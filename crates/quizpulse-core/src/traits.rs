//! Seams to the outside world: where payloads come from and where results go.
//!
//! [`DataSource`] is implemented by `quizpulse-sources`; [`AnalysisSink`] by
//! the CLI console printer and the `quizpulse-report` writers.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{FetchError, PayloadKind};
use crate::model::{HistoricalAttempt, TopicStat};
use crate::recommend::Recommendation;
use crate::statistics::QuizTotals;

// ---------------------------------------------------------------------------
// Data source trait
// ---------------------------------------------------------------------------

/// Retrieves one of the three upstream JSON payloads.
///
/// Implementations make a single attempt and return parsed JSON or a
/// [`FetchError`]. Shape checks are the pipeline's job, not the source's.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable source name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch and parse one payload.
    async fn fetch(&self, kind: PayloadKind) -> Result<Value, FetchError>;
}

// ---------------------------------------------------------------------------
// Presentation sink trait
// ---------------------------------------------------------------------------

/// Receives the final outputs of an analysis. Each method gets one
/// independent output; the pipeline does not transform them further.
pub trait AnalysisSink {
    fn on_topic_summary(&self, totals: &QuizTotals, stats: &[TopicStat]) -> anyhow::Result<()>;
    fn on_history(&self, attempts: &[HistoricalAttempt]) -> anyhow::Result<()>;
    fn on_recommendations(&self, recommendations: &[Recommendation]) -> anyhow::Result<()>;
    /// Line-chart request: score and accuracy against submission order.
    fn on_trend_chart(&self, attempts: &[HistoricalAttempt]) -> anyhow::Result<()>;
}

/// Sink that discards everything.
pub struct NoopSink;

impl AnalysisSink for NoopSink {
    fn on_topic_summary(&self, _: &QuizTotals, _: &[TopicStat]) -> anyhow::Result<()> {
        Ok(())
    }
    fn on_history(&self, _: &[HistoricalAttempt]) -> anyhow::Result<()> {
        Ok(())
    }
    fn on_recommendations(&self, _: &[Recommendation]) -> anyhow::Result<()> {
        Ok(())
    }
    fn on_trend_chart(&self, _: &[HistoricalAttempt]) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Fans every output out to several sinks in order.
pub struct MultiSink<'a> {
    sinks: Vec<&'a dyn AnalysisSink>,
}

impl<'a> MultiSink<'a> {
    pub fn new(sinks: Vec<&'a dyn AnalysisSink>) -> Self {
        Self { sinks }
    }
}

impl AnalysisSink for MultiSink<'_> {
    fn on_topic_summary(&self, totals: &QuizTotals, stats: &[TopicStat]) -> anyhow::Result<()> {
        self.sinks
            .iter()
            .try_for_each(|s| s.on_topic_summary(totals, stats))
    }

    fn on_history(&self, attempts: &[HistoricalAttempt]) -> anyhow::Result<()> {
        self.sinks.iter().try_for_each(|s| s.on_history(attempts))
    }

    fn on_recommendations(&self, recommendations: &[Recommendation]) -> anyhow::Result<()> {
        self.sinks
            .iter()
            .try_for_each(|s| s.on_recommendations(recommendations))
    }

    fn on_trend_chart(&self, attempts: &[HistoricalAttempt]) -> anyhow::Result<()> {
        self.sinks.iter().try_for_each(|s| s.on_trend_chart(attempts))
    }
}
