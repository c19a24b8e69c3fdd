//! Local JSON file data source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use quizpulse_core::traits::DataSource;

use crate::error::{FetchError, PayloadKind};

/// Reads each payload from its own JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    quiz_path: PathBuf,
    submission_path: PathBuf,
    history_path: PathBuf,
}

impl FileSource {
    pub fn new(
        quiz_path: impl Into<PathBuf>,
        submission_path: impl Into<PathBuf>,
        history_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            quiz_path: quiz_path.into(),
            submission_path: submission_path.into(),
            history_path: history_path.into(),
        }
    }

    /// `quiz.json`, `submission.json` and `history.json` inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(
            dir.join("quiz.json"),
            dir.join("submission.json"),
            dir.join("history.json"),
        )
    }

    pub fn path_for(&self, kind: PayloadKind) -> &Path {
        match kind {
            PayloadKind::Quiz => &self.quiz_path,
            PayloadKind::Submission => &self.submission_path,
            PayloadKind::History => &self.history_path,
        }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn name(&self) -> &str {
        "files"
    }

    #[instrument(skip(self), fields(path = %self.path_for(kind).display()))]
    async fn fetch(&self, kind: PayloadKind) -> Result<Value, FetchError> {
        let path = self.path_for(kind);
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::Io {
                payload: kind,
                message: format!("{}: {e}", path.display()),
            })?;

        serde_json::from_str(&content).map_err(|e| FetchError::Decode {
            payload: kind,
            message: format!("{}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_payloads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quiz.json"), r#"{"quiz": {"questions": []}}"#).unwrap();
        std::fs::write(dir.path().join("history.json"), "[]").unwrap();

        let source = FileSource::from_dir(dir.path());
        let quiz = source.fetch(PayloadKind::Quiz).await.unwrap();
        assert!(quiz["quiz"]["questions"].is_array());
        let history = source.fetch(PayloadKind::History).await.unwrap();
        assert_eq!(history, serde_json::json!([]));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::from_dir(dir.path());
        let err = source.fetch(PayloadKind::Submission).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Io {
                payload: PayloadKind::Submission,
                ..
            }
        ));
        assert!(err.to_string().contains("submission.json"));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let quiz = dir.path().join("q.json");
        std::fs::write(&quiz, "{not json").unwrap();

        let source = FileSource::new(&quiz, "s.json", "h.json");
        let err = source.fetch(PayloadKind::Quiz).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
