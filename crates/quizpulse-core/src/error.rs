//! Error taxonomy for the analysis pipeline.
//!
//! [`FetchError`] is defined here rather than in `quizpulse-sources` so the
//! engine can tell fetch failures apart from shape failures without string
//! matching.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the three upstream payloads an error or warning concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Quiz,
    Submission,
    History,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 3] = [
        PayloadKind::Quiz,
        PayloadKind::Submission,
        PayloadKind::History,
    ];
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Quiz => write!(f, "quiz"),
            PayloadKind::Submission => write!(f, "submission"),
            PayloadKind::History => write!(f, "history"),
        }
    }
}

/// Errors raised while retrieving a payload, before any core component runs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote could not be reached.
    #[error("network error fetching {payload}: {message}")]
    Network { payload: PayloadKind, message: String },

    /// The remote answered with a non-success status.
    #[error("HTTP {status} fetching {payload}: {message}")]
    Status {
        payload: PayloadKind,
        status: u16,
        message: String,
    },

    /// The body was not valid JSON.
    #[error("malformed JSON in {payload} payload: {message}")]
    Decode { payload: PayloadKind, message: String },

    /// A local payload file could not be read.
    #[error("failed to read {payload} payload: {message}")]
    Io { payload: PayloadKind, message: String },

    /// The request timed out.
    #[error("timed out after {secs}s fetching {payload}")]
    Timeout { payload: PayloadKind, secs: u64 },
}

impl FetchError {
    /// The payload the failure concerns.
    pub fn payload(&self) -> PayloadKind {
        match self {
            FetchError::Network { payload, .. }
            | FetchError::Status { payload, .. }
            | FetchError::Decode { payload, .. }
            | FetchError::Io { payload, .. }
            | FetchError::Timeout { payload, .. } => *payload,
        }
    }
}

/// A required field is missing or malformed in the quiz or submission structure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{component}: {message}{}", at_suffix(.identifier))]
pub struct DataShapeError {
    /// Pipeline component that rejected the input.
    pub component: &'static str,
    /// Offending identifier, e.g. a question id or JSON path.
    pub identifier: Option<String>,
    pub message: String,
}

impl DataShapeError {
    pub fn new(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            identifier: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

fn at_suffix(identifier: &Option<String>) -> String {
    identifier
        .as_ref()
        .map(|id| format!(" (at {id})"))
        .unwrap_or_default()
}

/// Anything that aborts an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    DataShape(#[from] DataShapeError),
}

/// A historical value that could not be read as a number.
///
/// Not an error: the value is treated as missing and the pipeline continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based position of the attempt in the history feed.
    pub submission_order: u32,
    /// `"score"` or `"accuracy"`.
    pub field: String,
    /// The raw value as received, rendered as JSON.
    pub raw: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempt {}: {} value {} is not numeric, treated as missing",
            self.submission_order, self.field, self.raw
        )
    }
}
