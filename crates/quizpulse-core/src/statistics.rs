//! Topic aggregation and overall quiz totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Outcome, ScoredQuestion, TopicStat};
use crate::scoring::ScoringRules;

/// Group scored questions by `(topic, difficulty_level)`.
///
/// Returns one row per distinct key, sorted by key. The result does not
/// depend on input order: marks within a group are summed in sorted order so
/// floating-point totals are identical for any permutation of `scored`.
pub fn aggregate_by_topic(scored: &[ScoredQuestion]) -> Vec<TopicStat> {
    let mut groups: BTreeMap<(&str, &str), Vec<&ScoredQuestion>> = BTreeMap::new();
    for s in scored {
        groups
            .entry((s.topic.as_str(), s.difficulty_level.as_str()))
            .or_default()
            .push(s);
    }

    groups
        .into_iter()
        .map(|((topic, difficulty_level), members)| {
            let mut marks: Vec<f64> = members.iter().map(|s| s.marks).collect();
            marks.sort_by(f64::total_cmp);

            TopicStat {
                topic: topic.to_string(),
                difficulty_level: difficulty_level.to_string(),
                total_questions: members.len() as u32,
                correct_answers: members.iter().filter(|s| s.is_correct()).count() as u32,
                total_marks: marks.iter().sum(),
            }
        })
        .collect()
}

/// Whole-quiz summary shown next to the topic table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizTotals {
    pub total_questions: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub total_marks: f64,
    /// Marks for a perfect paper.
    pub max_marks: f64,
}

impl QuizTotals {
    pub fn compute(scored: &[ScoredQuestion], rules: &ScoringRules) -> Self {
        let count = |outcome: Outcome| scored.iter().filter(|s| s.outcome == outcome).count() as u32;
        let correct = count(Outcome::Correct);
        let incorrect = count(Outcome::Incorrect);
        let unanswered = count(Outcome::Unanswered);

        let total_marks = correct as f64 * rules.marks_for(Outcome::Correct)
            + incorrect as f64 * rules.marks_for(Outcome::Incorrect);

        Self {
            total_questions: scored.len() as u32,
            correct,
            incorrect,
            unanswered,
            total_marks,
            max_marks: scored.len() as f64 * rules.correct_answer_marks,
        }
    }

    /// Correct answers as a fraction of attempted questions.
    pub fn attempt_accuracy(&self) -> f64 {
        let attempted = self.correct + self.incorrect;
        if attempted == 0 {
            0.0
        } else {
            self.correct as f64 / attempted as f64
        }
    }
}
