//! Core data model types for quizpulse.
//!
//! Two layers live here: the loosely-typed payloads exactly as the upstream
//! feeds send them (`Raw*`, every field optional), and the validated records
//! the pipeline works with. Conversion between the two happens once, at the
//! ingestion boundary in [`crate::merge`] and [`crate::scoring`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel used for questions the learner did not answer.
pub const UNANSWERED: &str = "Unanswered";

// ---------------------------------------------------------------------------
// Raw payloads
// ---------------------------------------------------------------------------

/// Quiz payload: `{"quiz": {"questions": [...], "correct_answer_marks", "negative_marks"}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizPayload {
    #[serde(default)]
    pub quiz: Option<RawQuiz>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuiz {
    #[serde(default)]
    pub questions: Option<Vec<RawQuestion>>,
    /// Number or numeric string.
    #[serde(default)]
    pub correct_answer_marks: Option<Value>,
    /// Number or numeric string.
    #[serde(default)]
    pub negative_marks: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuestion {
    /// String or integer.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<RawOption>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOption {
    #[serde(default, alias = "option_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

/// Submission payload: `{"response_map": {question_id: option_id}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(default)]
    pub response_map: Option<BTreeMap<String, Value>>,
}

/// One entry of the historical feed. Values are numbers or percent strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAttempt {
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub accuracy: Option<Value>,
}

/// Render a JSON scalar as an identifier string. Ids compare as strings
/// regardless of whether the feed sent `1` or `"1"`.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Validated records
// ---------------------------------------------------------------------------

/// A question definition after ingestion checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// The first option flagged correct, if any.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub is_correct: bool,
}

/// Learner selections keyed by question id. Null selections are dropped at
/// ingestion and read as unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub selections: BTreeMap<String, String>,
}

impl Submission {
    pub fn selection_for(&self, question_id: &str) -> Option<&str> {
        self.selections.get(question_id).map(String::as_str)
    }
}

/// What the learner picked for one question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    Chosen(String),
    Unanswered,
}

impl Selection {
    pub fn option_id(&self) -> Option<&str> {
        match self {
            Selection::Chosen(id) => Some(id),
            Selection::Unanswered => None,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Chosen(id) => write!(f, "{id}"),
            Selection::Unanswered => write!(f, "{UNANSWERED}"),
        }
    }
}

impl From<String> for Selection {
    fn from(s: String) -> Self {
        if s == UNANSWERED {
            Selection::Unanswered
        } else {
            Selection::Chosen(s)
        }
    }
}

impl From<Selection> for String {
    fn from(s: Selection) -> Self {
        s.to_string()
    }
}

/// Correctness of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "correct"),
            Outcome::Incorrect => write!(f, "incorrect"),
            Outcome::Unanswered => write!(f, "unanswered"),
        }
    }
}

/// A question joined with the learner's answer and judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredQuestion {
    pub question_id: String,
    /// Normalized topic label.
    pub topic: String,
    /// Normalized difficulty label.
    pub difficulty_level: String,
    pub selected_option: Selection,
    pub outcome: Outcome,
    pub marks: f64,
}

impl ScoredQuestion {
    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::Correct
    }
}

/// Per-(topic, difficulty) statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStat {
    pub topic: String,
    pub difficulty_level: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub total_marks: f64,
}

impl TopicStat {
    /// Fraction of questions answered correctly (0.0 when the group is empty).
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.total_questions as f64
        }
    }
}

/// One historical attempt with percentages parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAttempt {
    /// 1-based position in the feed; the feed order is chronological.
    pub submission_order: u32,
    pub score: Option<f64>,
    pub accuracy: Option<f64>,
}
