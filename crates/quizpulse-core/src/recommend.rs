//! Rule-based study recommendations.
//!
//! Three rule families run in a fixed order: weak topics, strong topics, then
//! at most one line about the recent historical trend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::history::HistorySeries;
use crate::model::TopicStat;

pub const NEEDS_IMPROVEMENT: &str = "Consistent improvement needed across recent quizzes.";
pub const STEADILY_IMPROVING: &str = "Great job! Your scores are steadily improving.";

/// Thresholds for the recommendation rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRules {
    /// A topic is weak when `correct < total * weak_ratio`.
    #[serde(default = "default_weak_ratio")]
    pub weak_ratio: f64,
    /// A topic is strong when `correct > total * strong_ratio`.
    #[serde(default = "default_strong_ratio")]
    pub strong_ratio: f64,
    /// How many of the most recent attempts the trend rule looks at.
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    /// Mean recent score below which improvement is called for.
    #[serde(default = "default_low_mean_threshold")]
    pub low_mean_threshold: f64,
}

fn default_weak_ratio() -> f64 {
    0.5
}
fn default_strong_ratio() -> f64 {
    0.8
}
fn default_trend_window() -> usize {
    5
}
fn default_low_mean_threshold() -> f64 {
    50.0
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self {
            weak_ratio: default_weak_ratio(),
            strong_ratio: default_strong_ratio(),
            trend_window: default_trend_window(),
            low_mean_threshold: default_low_mean_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    WeakTopic,
    StrongTopic,
    NeedsImprovement,
    SteadilyImproving,
}

/// A single line of advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Direction of the recent score window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    NeedsImprovement,
    SteadilyImproving,
}

impl RecommendationRules {
    pub fn is_weak(&self, stat: &TopicStat) -> bool {
        (stat.correct_answers as f64) < stat.total_questions as f64 * self.weak_ratio
    }

    pub fn is_strong(&self, stat: &TopicStat) -> bool {
        (stat.correct_answers as f64) > stat.total_questions as f64 * self.strong_ratio
    }

    /// Classify the last `trend_window` scores.
    ///
    /// Needs at least two attempts in the whole history. Missing scores are
    /// left out of the mean and break monotonicity; a window with no scores
    /// at all yields no trend.
    pub fn trend(&self, history: &HistorySeries) -> Option<Trend> {
        if history.len() <= 1 {
            return None;
        }

        let window = history.recent_scores(self.trend_window);
        let present: Vec<f64> = window.iter().flatten().copied().collect();
        if present.is_empty() {
            return None;
        }

        let mean = present.iter().sum::<f64>() / present.len() as f64;
        if mean < self.low_mean_threshold {
            return Some(Trend::NeedsImprovement);
        }

        let complete = present.len() == window.len();
        let non_decreasing = present.windows(2).all(|w| w[0] <= w[1]);
        if complete && non_decreasing {
            Some(Trend::SteadilyImproving)
        } else {
            None
        }
    }
}

/// Evaluate every rule family in order.
pub fn recommend(
    stats: &[TopicStat],
    history: &HistorySeries,
    rules: &RecommendationRules,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    for stat in stats.iter().filter(|s| rules.is_weak(s)) {
        out.push(Recommendation {
            kind: RecommendationKind::WeakTopic,
            message: format!(
                "Focus on topic '{}' at difficulty level '{}'.",
                stat.topic, stat.difficulty_level
            ),
        });
    }

    for stat in stats.iter().filter(|s| rules.is_strong(s)) {
        out.push(Recommendation {
            kind: RecommendationKind::StrongTopic,
            message: format!(
                "Maintain your strength in topic '{}' at difficulty level '{}'.",
                stat.topic, stat.difficulty_level
            ),
        });
    }

    match rules.trend(history) {
        Some(Trend::NeedsImprovement) => out.push(Recommendation {
            kind: RecommendationKind::NeedsImprovement,
            message: NEEDS_IMPROVEMENT.to_string(),
        }),
        Some(Trend::SteadilyImproving) => out.push(Recommendation {
            kind: RecommendationKind::SteadilyImproving,
            message: STEADILY_IMPROVING.to_string(),
        }),
        None => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HistoricalAttempt;

    fn stat(topic: &str, total: u32, correct: u32) -> TopicStat {
        TopicStat {
            topic: topic.into(),
            difficulty_level: "Easy".into(),
            total_questions: total,
            correct_answers: correct,
            total_marks: 0.0,
        }
    }

    fn history(scores: &[Option<f64>]) -> HistorySeries {
        HistorySeries {
            attempts: scores
                .iter()
                .enumerate()
                .map(|(i, s)| HistoricalAttempt {
                    submission_order: i as u32 + 1,
                    score: *s,
                    accuracy: None,
                })
                .collect(),
            warnings: vec![],
        }
    }

    fn some(scores: &[f64]) -> HistorySeries {
        history(&scores.iter().copied().map(Some).collect::<Vec<_>>())
    }

    #[test]
    fn weak_and_strong_thresholds() {
        let rules = RecommendationRules::default();
        assert!(rules.is_weak(&stat("A", 10, 3)));
        assert!(!rules.is_weak(&stat("A", 10, 5)));
        assert!(rules.is_strong(&stat("A", 10, 9)));
        assert!(!rules.is_strong(&stat("A", 10, 8)));
    }

    #[test]
    fn weak_topic_message() {
        let recs = recommend(
            &[stat("Math", 10, 3)],
            &HistorySeries::default(),
            &RecommendationRules::default(),
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::WeakTopic);
        assert_eq!(
            recs[0].message,
            "Focus on topic 'Math' at difficulty level 'Easy'."
        );
    }

    #[test]
    fn strong_topic_message() {
        let recs = recommend(
            &[stat("Physics", 10, 9)],
            &HistorySeries::default(),
            &RecommendationRules::default(),
        );
        assert_eq!(
            recs[0].to_string(),
            "Maintain your strength in topic 'Physics' at difficulty level 'Easy'."
        );
    }

    #[test]
    fn low_mean_needs_improvement() {
        let rules = RecommendationRules::default();
        assert_eq!(
            rules.trend(&some(&[40.0, 30.0, 20.0, 45.0, 60.0])),
            Some(Trend::NeedsImprovement)
        );
    }

    #[test]
    fn monotonic_rise_is_improving() {
        let rules = RecommendationRules::default();
        let h = some(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        // mean is 30, so the low-mean rule fires first
        assert_eq!(rules.trend(&h), Some(Trend::NeedsImprovement));

        let h = some(&[55.0, 60.0, 60.0, 70.0, 90.0]);
        assert_eq!(rules.trend(&h), Some(Trend::SteadilyImproving));
    }

    #[test]
    fn only_last_window_counts() {
        let rules = RecommendationRules::default();
        let h = some(&[99.0, 10.0, 60.0, 65.0, 70.0, 80.0, 85.0]);
        assert_eq!(rules.trend(&h), Some(Trend::SteadilyImproving));
    }

    #[test]
    fn missing_values_break_monotonicity_but_not_mean() {
        let rules = RecommendationRules::default();
        let h = history(&[Some(60.0), None, Some(70.0), Some(80.0), Some(90.0)]);
        assert_eq!(rules.trend(&h), None);

        let h = history(&[Some(10.0), None, Some(20.0)]);
        assert_eq!(rules.trend(&h), Some(Trend::NeedsImprovement));

        let h = history(&[None, None]);
        assert_eq!(rules.trend(&h), None);
    }

    #[test]
    fn single_attempt_has_no_trend() {
        let rules = RecommendationRules::default();
        assert_eq!(rules.trend(&some(&[10.0])), None);
        assert_eq!(rules.trend(&HistorySeries::default()), None);
    }

    #[test]
    fn falling_high_scores_yield_nothing() {
        let rules = RecommendationRules::default();
        assert_eq!(rules.trend(&some(&[90.0, 80.0, 70.0])), None);
    }

    #[test]
    fn ordering_weak_then_strong_then_trend() {
        let stats = vec![
            stat("Alpha", 10, 10),
            stat("Beta", 10, 2),
            stat("Gamma", 10, 6),
            stat("Delta", 4, 1),
        ];
        let recs = recommend(
            &stats,
            &some(&[10.0, 20.0]),
            &RecommendationRules::default(),
        );
        let kinds: Vec<RecommendationKind> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::WeakTopic,
                RecommendationKind::WeakTopic,
                RecommendationKind::StrongTopic,
                RecommendationKind::NeedsImprovement,
            ]
        );
        assert!(recs[0].message.contains("Beta"));
        assert!(recs[1].message.contains("Delta"));
        assert_eq!(recs[3].message, NEEDS_IMPROVEMENT);
    }

    #[test]
    fn custom_thresholds() {
        let rules = RecommendationRules {
            weak_ratio: 0.7,
            strong_ratio: 0.95,
            trend_window: 2,
            low_mean_threshold: 10.0,
        };
        assert!(rules.is_weak(&stat("A", 10, 6)));
        assert!(!rules.is_strong(&stat("A", 10, 9)));
        assert_eq!(
            rules.trend(&some(&[90.0, 20.0, 30.0])),
            Some(Trend::SteadilyImproving)
        );
    }
}
