//! quizpulse-sources — Where quiz, submission, and history payloads come from.
//!
//! Implements the `DataSource` trait over HTTP endpoints and local JSON
//! files, plus an in-memory mock for tests.

pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod mock;

pub use config::{create_source, load_config, QuizpulseConfig, SourceConfig};
pub use error::FetchError;
