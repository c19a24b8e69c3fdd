//! Historical normalizer: parses percent values and assigns submission order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseWarning;
use crate::model::{HistoricalAttempt, RawAttempt};

/// The normalized series plus every value that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub attempts: Vec<HistoricalAttempt>,
    pub warnings: Vec<ParseWarning>,
}

impl HistorySeries {
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Scores of the last `n` attempts in submission order.
    pub fn recent_scores(&self, n: usize) -> Vec<Option<f64>> {
        let start = self.attempts.len().saturating_sub(n);
        self.attempts[start..].iter().map(|a| a.score).collect()
    }
}

/// Normalize the historical feed.
///
/// The feed order is the chronology: `submission_order` is the 1-based
/// position and the attempts are never re-sorted. Unparseable values become
/// `None` and are recorded as warnings.
pub fn normalize_history(raw: &[RawAttempt]) -> HistorySeries {
    let mut series = HistorySeries::default();

    for (index, attempt) in raw.iter().enumerate() {
        let submission_order = index as u32 + 1;
        let mut field = |name: &str, value: Option<&Value>| -> Option<f64> {
            let parsed = value.and_then(parse_percentage);
            if parsed.is_none() {
                let warning = ParseWarning {
                    submission_order,
                    field: name.to_string(),
                    raw: value.map(Value::to_string).unwrap_or_else(|| "null".into()),
                };
                tracing::warn!("{warning}");
                series.warnings.push(warning);
            }
            parsed
        };

        let score = field("score", attempt.score.as_ref());
        let accuracy = field("accuracy", attempt.accuracy.as_ref());
        series.attempts.push(HistoricalAttempt {
            submission_order,
            score,
            accuracy,
        });
    }

    tracing::debug!(
        attempts = series.attempts.len(),
        warnings = series.warnings.len(),
        "normalized history"
    );
    series
}

/// Parse a number or a string such as `"85%"` or `" 72.5 "`. Trailing `%`
/// characters are stripped. NaN and non-scalar values read as missing.
pub fn parse_percentage(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| !v.is_nan())
}
