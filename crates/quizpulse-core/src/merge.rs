//! Quiz merger: validates the quiz and submission payloads and left-joins
//! questions with the learner's selections.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DataShapeError;
use crate::model::{
    id_string, AnswerOption, Question, QuizPayload, RawQuestion, Selection, Submission,
    SubmissionPayload,
};

const COMPONENT: &str = "quiz merger";

/// One question paired with what the learner selected for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedQuestion {
    pub question: Question,
    pub selected_option: Selection,
}

/// Validate the question list of a quiz payload.
pub fn parse_questions(payload: &QuizPayload) -> Result<Vec<Question>, DataShapeError> {
    let quiz = payload
        .quiz
        .as_ref()
        .ok_or_else(|| DataShapeError::new(COMPONENT, "missing `quiz` object").at("quiz"))?;
    let raw = quiz.questions.as_ref().ok_or_else(|| {
        DataShapeError::new(COMPONENT, "missing `questions` list").at("quiz.questions")
    })?;

    raw.iter()
        .enumerate()
        .map(|(index, q)| parse_question(index, q))
        .collect()
}

fn parse_question(index: usize, raw: &RawQuestion) -> Result<Question, DataShapeError> {
    let id = raw.id.as_ref().and_then(id_string).ok_or_else(|| {
        DataShapeError::new(COMPONENT, "question is missing a string or integer `id`")
            .at(format!("quiz.questions[{index}]"))
    })?;

    let raw_options = raw.options.as_ref().ok_or_else(|| {
        DataShapeError::new(COMPONENT, "question is missing `options`")
            .at(format!("question {id}"))
    })?;

    let options = raw_options
        .iter()
        .enumerate()
        .map(|(j, o)| {
            let option_id = o.id.as_ref().and_then(id_string).ok_or_else(|| {
                DataShapeError::new(COMPONENT, "option is missing an `id`")
                    .at(format!("question {id} option [{j}]"))
            })?;
            Ok(AnswerOption {
                id: option_id,
                is_correct: o.is_correct.unwrap_or(false),
            })
        })
        .collect::<Result<Vec<_>, DataShapeError>>()?;

    Ok(Question {
        id,
        topic: raw.topic.clone(),
        difficulty_level: raw.difficulty_level.clone(),
        options,
    })
}

/// Validate a submission payload. Null selections count as unanswered.
pub fn parse_submission(payload: &SubmissionPayload) -> Result<Submission, DataShapeError> {
    let map = payload.response_map.as_ref().ok_or_else(|| {
        DataShapeError::new(COMPONENT, "missing `response_map` object").at("response_map")
    })?;

    let mut selections = BTreeMap::new();
    for (question_id, value) in map {
        match value {
            Value::Null => continue,
            other => {
                let option_id = id_string(other).ok_or_else(|| {
                    DataShapeError::new(COMPONENT, "selection must be a string or integer")
                        .at(format!("response_map.{question_id}"))
                })?;
                selections.insert(question_id.clone(), option_id);
            }
        }
    }

    Ok(Submission { selections })
}

/// Left-join questions with selections on question id.
///
/// Every question yields exactly one record, in question order. Selections
/// for ids that are not in the quiz are dropped.
pub fn merge(
    questions: &[Question],
    submission: &Submission,
) -> Result<Vec<MergedQuestion>, DataShapeError> {
    if questions.is_empty() {
        return Err(DataShapeError::new(COMPONENT, "question set is empty"));
    }

    let mut seen = HashSet::with_capacity(questions.len());
    for q in questions {
        if !seen.insert(q.id.as_str()) {
            return Err(
                DataShapeError::new(COMPONENT, "duplicate question id").at(format!("question {}", q.id))
            );
        }
    }

    let unmatched = submission
        .selections
        .keys()
        .filter(|id| !seen.contains(id.as_str()))
        .count();
    if unmatched > 0 {
        tracing::debug!(unmatched, "dropping selections for unknown question ids");
    }

    let merged: Vec<MergedQuestion> = questions
        .iter()
        .map(|q| MergedQuestion {
            question: q.clone(),
            selected_option: submission
                .selection_for(&q.id)
                .map(|s| Selection::Chosen(s.to_string()))
                .unwrap_or(Selection::Unanswered),
        })
        .collect();

    tracing::debug!(questions = merged.len(), "merged quiz with submission");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quiz(value: Value) -> QuizPayload {
        serde_json::from_value(value).unwrap()
    }

    fn submission(value: Value) -> Submission {
        parse_submission(&serde_json::from_value(value).unwrap()).unwrap()
    }

    fn sample_questions() -> Vec<Question> {
        parse_questions(&quiz(json!({
            "quiz": {
                "questions": [
                    {"id": 1, "topic": "math", "options": [{"id": "a", "is_correct": true}]},
                    {"id": "2", "topic": "physics", "options": [{"id": 9, "is_correct": true}]},
                    {"id": 3, "options": []}
                ],
                "correct_answer_marks": 4,
                "negative_marks": 1
            }
        })))
        .unwrap()
    }

    #[test]
    fn ids_are_compared_as_strings() {
        let questions = sample_questions();
        assert_eq!(questions[0].id, "1");
        assert_eq!(questions[1].id, "2");
        assert_eq!(questions[1].options[0].id, "9");

        let sub = submission(json!({"response_map": {"1": "a", "2": 9}}));
        let merged = merge(&questions, &sub).unwrap();
        assert_eq!(merged[0].selected_option, Selection::Chosen("a".into()));
        assert_eq!(merged[1].selected_option, Selection::Chosen("9".into()));
    }

    #[test]
    fn left_join_keeps_every_question_once() {
        let questions = sample_questions();
        let sub = submission(json!({"response_map": {"1": "a", "99": "z", "100": "y"}}));
        let merged = merge(&questions, &sub).unwrap();

        assert_eq!(merged.len(), questions.len());
        let ids: Vec<&str> = merged.iter().map(|m| m.question.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(merged[1].selected_option, Selection::Unanswered);
        assert_eq!(merged[2].selected_option, Selection::Unanswered);
    }

    #[test]
    fn null_selection_is_unanswered() {
        let questions = sample_questions();
        let sub = submission(json!({"response_map": {"1": null}}));
        let merged = merge(&questions, &sub).unwrap();
        assert_eq!(merged[0].selected_option, Selection::Unanswered);
    }

    #[test]
    fn empty_question_set_is_rejected() {
        let questions = parse_questions(&quiz(json!({"quiz": {"questions": []}}))).unwrap();
        let err = merge(&questions, &Submission::default()).unwrap_err();
        assert_eq!(err.component, "quiz merger");
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let questions = parse_questions(&quiz(json!({
            "quiz": {"questions": [
                {"id": 1, "options": []},
                {"id": "1", "options": []}
            ]}
        })))
        .unwrap();
        let err = merge(&questions, &Submission::default()).unwrap_err();
        assert_eq!(err.identifier.as_deref(), Some("question 1"));
    }

    #[test]
    fn missing_id_is_a_shape_error() {
        let err = parse_questions(&quiz(json!({
            "quiz": {"questions": [{"options": []}]}
        })))
        .unwrap_err();
        assert_eq!(err.identifier.as_deref(), Some("quiz.questions[0]"));
    }

    #[test]
    fn missing_options_is_a_shape_error() {
        let err = parse_questions(&quiz(json!({
            "quiz": {"questions": [{"id": 5}]}
        })))
        .unwrap_err();
        assert!(err.message.contains("options"));
        assert_eq!(err.identifier.as_deref(), Some("question 5"));
    }

    #[test]
    fn missing_quiz_and_response_map_are_shape_errors() {
        assert!(parse_questions(&quiz(json!({}))).is_err());
        assert!(parse_questions(&quiz(json!({"quiz": {}}))).is_err());

        let payload: SubmissionPayload = serde_json::from_value(json!({})).unwrap();
        let err = parse_submission(&payload).unwrap_err();
        assert_eq!(err.identifier.as_deref(), Some("response_map"));
    }

    #[test]
    fn non_scalar_selection_is_rejected() {
        let payload: SubmissionPayload =
            serde_json::from_value(json!({"response_map": {"1": ["a", "b"]}})).unwrap();
        let err = parse_submission(&payload).unwrap_err();
        assert_eq!(err.identifier.as_deref(), Some("response_map.1"));
    }
}
