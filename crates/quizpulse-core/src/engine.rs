//! Pipeline orchestrator.
//!
//! Fetches the three payloads concurrently (single attempt each), then runs
//! merge → score → aggregate and history normalization, then the
//! recommendation rules, and finally hands the outputs to a sink.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnalysisError, DataShapeError, FetchError, ParseWarning, PayloadKind};
use crate::history::{normalize_history, HistorySeries};
use crate::merge::{merge, parse_questions, parse_submission};
use crate::model::{
    QuizPayload, RawAttempt, ScoredQuestion, SubmissionPayload, TopicStat,
};
use crate::recommend::{recommend, Recommendation, RecommendationRules};
use crate::scoring::{score, ScoringRules};
use crate::statistics::{aggregate_by_topic, QuizTotals};
use crate::traits::{AnalysisSink, DataSource};

/// The three payloads as parsed JSON, before any shape checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    pub quiz: Value,
    pub submission: Value,
    pub history: Value,
}

/// Everything the pipeline derives from one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub scoring: ScoringRules,
    pub questions: Vec<ScoredQuestion>,
    pub totals: QuizTotals,
    pub topic_stats: Vec<TopicStat>,
    pub history: HistorySeries,
    pub recommendations: Vec<Recommendation>,
}

/// Counts reported by a shape-only check of the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub questions: usize,
    pub answered: usize,
    /// Selections whose question id is not in the quiz.
    pub unmatched_selections: usize,
    pub historical_attempts: usize,
    pub warnings: Vec<ParseWarning>,
}

/// Fetch all three payloads concurrently. The first failure aborts the
/// whole fetch; nothing is retried.
#[tracing::instrument(skip(source), fields(source = source.name()))]
pub async fn fetch_inputs(source: &dyn DataSource) -> Result<RawInputs, FetchError> {
    let (quiz, submission, history) = futures::try_join!(
        source.fetch(PayloadKind::Quiz),
        source.fetch(PayloadKind::Submission),
        source.fetch(PayloadKind::History),
    )?;
    Ok(RawInputs {
        quiz,
        submission,
        history,
    })
}

fn decode<T: DeserializeOwned>(
    value: &Value,
    component: &'static str,
    kind: PayloadKind,
) -> Result<T, DataShapeError> {
    T::deserialize(value).map_err(|e| {
        DataShapeError::new(component, format!("unexpected {kind} payload shape: {e}"))
    })
}

fn decode_history(value: &Value) -> Result<Vec<RawAttempt>, DataShapeError> {
    if !value.is_array() {
        return Err(DataShapeError::new(
            "historical normalizer",
            "history payload must be a JSON array",
        ));
    }
    decode(value, "historical normalizer", PayloadKind::History)
}

/// Runs the analysis pipeline with a fixed set of recommendation rules.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    rules: RecommendationRules,
}

impl Analyzer {
    pub fn new(rules: RecommendationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RecommendationRules {
        &self.rules
    }

    /// Fetch from `source` and analyze. Fetch failures abort before any
    /// core component runs.
    pub async fn run(&self, source: &dyn DataSource) -> Result<Analysis, AnalysisError> {
        let inputs = fetch_inputs(source).await?;
        Ok(self.analyze(&inputs)?)
    }

    /// Run the core pipeline over already-fetched inputs. Pure: the same
    /// inputs always give the same output.
    pub fn analyze(&self, inputs: &RawInputs) -> Result<Analysis, DataShapeError> {
        let start = Instant::now();

        let quiz: QuizPayload = decode(&inputs.quiz, "quiz merger", PayloadKind::Quiz)?;
        let submission: SubmissionPayload =
            decode(&inputs.submission, "quiz merger", PayloadKind::Submission)?;
        let raw_history = decode_history(&inputs.history)?;

        let questions = parse_questions(&quiz)?;
        let submission = parse_submission(&submission)?;
        let merged = merge(&questions, &submission)?;

        let scoring = ScoringRules::from_payload(&quiz)?;
        let scored = score(&merged, &scoring);
        let totals = QuizTotals::compute(&scored, &scoring);
        let topic_stats = aggregate_by_topic(&scored);

        let history = normalize_history(&raw_history);
        let recommendations = recommend(&topic_stats, &history, &self.rules);

        tracing::info!(
            questions = scored.len(),
            topics = topic_stats.len(),
            attempts = history.len(),
            recommendations = recommendations.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "analysis complete"
        );

        Ok(Analysis {
            scoring,
            questions: scored,
            totals,
            topic_stats,
            history,
            recommendations,
        })
    }

    /// Shape-check the inputs without scoring anything.
    pub fn inspect(&self, inputs: &RawInputs) -> Result<InputSummary, DataShapeError> {
        let quiz: QuizPayload = decode(&inputs.quiz, "quiz merger", PayloadKind::Quiz)?;
        let submission: SubmissionPayload =
            decode(&inputs.submission, "quiz merger", PayloadKind::Submission)?;
        let raw_history = decode_history(&inputs.history)?;

        let questions = parse_questions(&quiz)?;
        let submission = parse_submission(&submission)?;
        merge(&questions, &submission)?;
        ScoringRules::from_payload(&quiz)?;
        let history = normalize_history(&raw_history);

        let answered = questions
            .iter()
            .filter(|q| submission.selection_for(&q.id).is_some())
            .count();

        Ok(InputSummary {
            questions: questions.len(),
            answered,
            unmatched_selections: submission.selections.len() - answered,
            historical_attempts: history.len(),
            warnings: history.warnings,
        })
    }

    /// Hand the outputs to `sink`: topic summary, historical series,
    /// recommendations, then the chart request.
    pub fn present(&self, analysis: &Analysis, sink: &dyn AnalysisSink) -> anyhow::Result<()> {
        sink.on_topic_summary(&analysis.totals, &analysis.topic_stats)?;
        sink.on_history(&analysis.history.attempts)?;
        sink.on_recommendations(&analysis.recommendations)?;
        sink.on_trend_chart(&analysis.history.attempts)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::model::{HistoricalAttempt, Outcome};
    use crate::recommend::RecommendationKind;

    fn inputs() -> RawInputs {
        RawInputs {
            quiz: json!({
                "quiz": {
                    "correct_answer_marks": "4.0",
                    "negative_marks": "1.0",
                    "questions": [
                        {"id": 1, "topic": "math", "difficulty_level": " Easy ",
                         "options": [{"id": "a", "is_correct": true}, {"id": "b", "is_correct": false}]},
                        {"id": 2, "topic": "Math ", "difficulty_level": "easy",
                         "options": [{"id": "c", "is_correct": false}, {"id": "d", "is_correct": true}]},
                        {"id": 3, "topic": "physics", "difficulty_level": null,
                         "options": [{"id": "e", "is_correct": true}]}
                    ]
                }
            }),
            submission: json!({"response_map": {"1": "a", "2": "c", "42": "z"}}),
            history: json!([
                {"score": "55%", "accuracy": "60%"},
                {"score": 60, "accuracy": "70 %"},
                {"score": "72", "accuracy": "n/a"}
            ]),
        }
    }

    struct StaticSource {
        inputs: RawInputs,
        fail: Option<PayloadKind>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl DataSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch(&self, kind: PayloadKind) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail == Some(kind) {
                return Err(FetchError::Network {
                    payload: kind,
                    message: "connection refused".into(),
                });
            }
            Ok(match kind {
                PayloadKind::Quiz => self.inputs.quiz.clone(),
                PayloadKind::Submission => self.inputs.submission.clone(),
                PayloadKind::History => self.inputs.history.clone(),
            })
        }
    }

    #[test]
    fn full_pipeline() {
        let analysis = Analyzer::default().analyze(&inputs()).unwrap();

        assert_eq!(analysis.questions.len(), 3);
        assert_eq!(analysis.questions[0].outcome, Outcome::Correct);
        assert_eq!(analysis.questions[1].outcome, Outcome::Incorrect);
        assert_eq!(analysis.questions[2].outcome, Outcome::Unanswered);

        // "math" / " Easy " and "Math " / "easy" collapse into one group
        assert_eq!(analysis.topic_stats.len(), 2);
        let math = &analysis.topic_stats[0];
        assert_eq!((math.topic.as_str(), math.difficulty_level.as_str()), ("Math", "Easy"));
        assert_eq!(math.total_questions, 2);
        assert_eq!(math.correct_answers, 1);
        assert_eq!(math.total_marks, 3.0);
        let physics = &analysis.topic_stats[1];
        assert_eq!(physics.difficulty_level, "Unknown Level");

        assert_eq!(analysis.totals.total_marks, 3.0);
        assert_eq!(analysis.history.warnings.len(), 1);

        let kinds: Vec<_> = analysis.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::WeakTopic,
                RecommendationKind::SteadilyImproving
            ]
        );
        assert!(analysis.recommendations[0].message.contains("Physics"));
    }

    #[test]
    fn analysis_is_deterministic() {
        let analyzer = Analyzer::default();
        let a = serde_json::to_string(&analyzer.analyze(&inputs()).unwrap()).unwrap();
        let b = serde_json::to_string(&analyzer.analyze(&inputs()).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn history_must_be_array() {
        let mut bad = inputs();
        bad.history = json!({"score": 1});
        let err = Analyzer::default().analyze(&bad).unwrap_err();
        assert_eq!(err.component, "historical normalizer");
    }

    #[test]
    fn wrongly_typed_field_is_shape_error() {
        let mut bad = inputs();
        bad.quiz = json!({"quiz": {"questions": "not a list"}});
        let err = Analyzer::default().analyze(&bad).unwrap_err();
        assert_eq!(err.component, "quiz merger");
        assert!(err.message.contains("quiz payload"));
    }

    #[test]
    fn inspect_counts() {
        let summary = Analyzer::default().inspect(&inputs()).unwrap();
        assert_eq!(summary.questions, 3);
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.unmatched_selections, 1);
        assert_eq!(summary.historical_attempts, 3);
        assert_eq!(summary.warnings.len(), 1);
    }

    #[tokio::test]
    async fn run_fetches_each_payload_once() {
        let source = StaticSource {
            inputs: inputs(),
            fail: None,
            calls: AtomicU32::new(0),
        };
        let analysis = Analyzer::default().run(&source).await.unwrap();
        assert_eq!(analysis.questions.len(), 3);
        assert_eq!(source.calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn fetch_failure_short_circuits() {
        let source = StaticSource {
            inputs: inputs(),
            fail: Some(PayloadKind::Submission),
            calls: AtomicU32::new(0),
        };
        let err = Analyzer::default().run(&source).await.unwrap_err();
        match err {
            AnalysisError::Fetch(e) => assert_eq!(e.payload(), PayloadKind::Submission),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: RefCell<Vec<String>>,
    }

    impl AnalysisSink for RecordingSink {
        fn on_topic_summary(&self, _: &QuizTotals, stats: &[TopicStat]) -> anyhow::Result<()> {
            self.events.borrow_mut().push(format!("summary:{}", stats.len()));
            Ok(())
        }
        fn on_history(&self, attempts: &[HistoricalAttempt]) -> anyhow::Result<()> {
            self.events.borrow_mut().push(format!("history:{}", attempts.len()));
            Ok(())
        }
        fn on_recommendations(&self, recs: &[Recommendation]) -> anyhow::Result<()> {
            self.events.borrow_mut().push(format!("recs:{}", recs.len()));
            Ok(())
        }
        fn on_trend_chart(&self, attempts: &[HistoricalAttempt]) -> anyhow::Result<()> {
            self.events.borrow_mut().push(format!("chart:{}", attempts.len()));
            Ok(())
        }
    }

    #[test]
    fn present_emits_outputs_in_order() {
        let analyzer = Analyzer::default();
        let analysis = analyzer.analyze(&inputs()).unwrap();
        let sink = RecordingSink::default();
        analyzer.present(&analysis, &sink).unwrap();
        assert_eq!(
            *sink.events.borrow(),
            vec!["summary:2", "history:3", "recs:2", "chart:3"]
        );
    }
}
