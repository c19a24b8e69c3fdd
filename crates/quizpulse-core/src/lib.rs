//! quizpulse-core — Quiz scoring, topic aggregation, and study recommendations.
//!
//! This crate turns raw quiz, submission, and historical-attempt payloads into
//! per-question scores, per-topic statistics, and rule-based advice. It performs
//! no I/O of its own: payloads arrive through the [`traits::DataSource`] seam and
//! results leave through [`traits::AnalysisSink`].

pub mod engine;
pub mod error;
pub mod history;
pub mod merge;
pub mod model;
pub mod recommend;
pub mod report;
pub mod scoring;
pub mod statistics;
pub mod traits;

pub use engine::{Analysis, Analyzer, RawInputs};
pub use error::{AnalysisError, DataShapeError, FetchError, ParseWarning, PayloadKind};
pub use recommend::{Recommendation, RecommendationKind, RecommendationRules};
