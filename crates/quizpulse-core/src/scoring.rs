//! Per-question correctness, marks, and label normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DataShapeError;
use crate::merge::MergedQuestion;
use crate::model::{Outcome, QuizPayload, ScoredQuestion, Selection};

const COMPONENT: &str = "scorer";

pub const UNKNOWN_TOPIC: &str = "Unknown Topic";
pub const UNKNOWN_LEVEL: &str = "Unknown Level";

/// Marks awarded per outcome, taken from the quiz metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Awarded for a correct answer.
    pub correct_answer_marks: f64,
    /// Deducted for an incorrect answer (stored positive).
    pub negative_marks: f64,
}

impl ScoringRules {
    /// Read the marking scheme from a quiz payload. Both fields accept a
    /// number or a numeric string.
    pub fn from_payload(payload: &QuizPayload) -> Result<Self, DataShapeError> {
        let quiz = payload
            .quiz
            .as_ref()
            .ok_or_else(|| DataShapeError::new(COMPONENT, "missing `quiz` object").at("quiz"))?;

        Ok(Self {
            correct_answer_marks: parse_marks(
                quiz.correct_answer_marks.as_ref(),
                "quiz.correct_answer_marks",
            )?,
            negative_marks: parse_marks(quiz.negative_marks.as_ref(), "quiz.negative_marks")?,
        })
    }

    /// Marks for a judged question.
    pub fn marks_for(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Correct => self.correct_answer_marks,
            // subtract from +0.0 so a zero penalty stays +0.0
            Outcome::Incorrect => 0.0 - self.negative_marks,
            Outcome::Unanswered => 0.0,
        }
    }
}

fn parse_marks(value: Option<&Value>, field: &str) -> Result<f64, DataShapeError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataShapeError::new(COMPONENT, "marks must be a finite number").at(field))
}

/// Judge every merged record and normalize its grouping labels.
pub fn score(merged: &[MergedQuestion], rules: &ScoringRules) -> Vec<ScoredQuestion> {
    merged
        .iter()
        .map(|record| {
            let question = &record.question;
            let outcome = match &record.selected_option {
                Selection::Unanswered => Outcome::Unanswered,
                Selection::Chosen(selected) => match question.correct_option() {
                    Some(correct) if correct.id == *selected => Outcome::Correct,
                    Some(_) => Outcome::Incorrect,
                    None => {
                        tracing::warn!(
                            question_id = %question.id,
                            "question has no option flagged correct; scoring as incorrect"
                        );
                        Outcome::Incorrect
                    }
                },
            };

            ScoredQuestion {
                question_id: question.id.clone(),
                topic: normalize_label(question.topic.as_deref(), UNKNOWN_TOPIC),
                difficulty_level: normalize_label(
                    question.difficulty_level.as_deref(),
                    UNKNOWN_LEVEL,
                ),
                selected_option: record.selected_option.clone(),
                outcome,
                marks: rules.marks_for(outcome),
            }
        })
        .collect()
}

/// Trim and title-case a label, substituting `default` when absent or blank.
pub fn normalize_label(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => title_case(s),
        _ => default.to_string(),
    }
}

/// Uppercase the first letter of every run of letters and lowercase the rest.
///
/// Any non-alphabetic character starts a new word, so `"3d-geometry"` becomes
/// `"3D-Geometry"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
