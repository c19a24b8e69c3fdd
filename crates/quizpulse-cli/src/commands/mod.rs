//! Subcommands and the data-source flags they share.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use quizpulse_core::traits::DataSource;
use quizpulse_sources::config::QuizpulseConfig;
use quizpulse_sources::file::FileSource;
use quizpulse_sources::{create_source, SourceConfig};

pub mod analyze;
pub mod init;
pub mod validate;

/// Where to read the three payloads from. Flags win over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Directory containing quiz.json, submission.json and history.json
    #[arg(long, conflicts_with_all = ["quiz_file", "quiz_url"])]
    pub data_dir: Option<PathBuf>,

    /// Quiz payload file
    #[arg(long, requires_all = ["submission_file", "history_file"], conflicts_with = "quiz_url")]
    pub quiz_file: Option<PathBuf>,

    /// Submission payload file
    #[arg(long, requires = "quiz_file")]
    pub submission_file: Option<PathBuf>,

    /// Historical attempts payload file
    #[arg(long, requires = "quiz_file")]
    pub history_file: Option<PathBuf>,

    /// Quiz payload URL
    #[arg(long, requires_all = ["submission_url", "history_url"])]
    pub quiz_url: Option<String>,

    /// Submission payload URL
    #[arg(long, requires = "quiz_url")]
    pub submission_url: Option<String>,

    /// Historical attempts payload URL
    #[arg(long, requires = "quiz_url")]
    pub history_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl SourceArgs {
    /// The source named on the command line, if any.
    fn to_config(&self) -> Option<SourceConfig> {
        if let (Some(q), Some(s), Some(h)) = (&self.quiz_url, &self.submission_url, &self.history_url)
        {
            return Some(SourceConfig::Http {
                quiz_url: q.clone(),
                submission_url: s.clone(),
                history_url: h.clone(),
                timeout_secs: self.timeout,
            });
        }
        if let (Some(q), Some(s), Some(h)) =
            (&self.quiz_file, &self.submission_file, &self.history_file)
        {
            return Some(SourceConfig::Files {
                quiz_path: q.clone(),
                submission_path: s.clone(),
                history_path: h.clone(),
            });
        }
        None
    }
}

/// Pick the data source: URL flags, then file flags, then `--data-dir`,
/// then the config file.
pub fn resolve_source(args: &SourceArgs, config: &QuizpulseConfig) -> Result<Box<dyn DataSource>> {
    if let Some(source) = args.to_config() {
        return create_source(&source);
    }
    if let Some(dir) = &args.data_dir {
        anyhow::ensure!(dir.is_dir(), "data directory not found: {}", dir.display());
        return Ok(Box::new(FileSource::from_dir(dir)));
    }
    match &config.source {
        Some(source) => create_source(source),
        None => anyhow::bail!(
            "no data source configured: pass --data-dir, --quiz-file/--submission-file/--history-file, \
             --quiz-url/--submission-url/--history-url, or add a [source] section to quizpulse.toml"
        ),
    }
}
