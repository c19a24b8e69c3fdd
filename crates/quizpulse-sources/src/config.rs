//! Configuration and data source factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizpulse_core::recommend::RecommendationRules;
use quizpulse_core::traits::DataSource;

use crate::file::FileSource;
use crate::http::{HttpEndpoints, HttpSource, DEFAULT_TIMEOUT_SECS};

/// Where the three payloads come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Http {
        quiz_url: String,
        submission_url: String,
        history_url: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
    Files {
        quiz_path: PathBuf,
        submission_path: PathBuf,
        history_path: PathBuf,
    },
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level quizpulse configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizpulseConfig {
    /// Default data source; CLI flags take precedence.
    #[serde(default)]
    pub source: Option<SourceConfig>,
    /// Recommendation thresholds.
    #[serde(default)]
    pub rules: RecommendationRules,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizpulse-results")
}

impl Default for QuizpulseConfig {
    fn default() -> Self {
        Self {
            source: None,
            rules: RecommendationRules::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(p: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&p.to_string_lossy()))
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Http {
            quiz_url,
            submission_url,
            history_url,
            timeout_secs,
        } => SourceConfig::Http {
            quiz_url: resolve_env_vars(quiz_url),
            submission_url: resolve_env_vars(submission_url),
            history_url: resolve_env_vars(history_url),
            timeout_secs: *timeout_secs,
        },
        SourceConfig::Files {
            quiz_path,
            submission_path,
            history_path,
        } => SourceConfig::Files {
            quiz_path: resolve_path(quiz_path),
            submission_path: resolve_path(submission_path),
            history_path: resolve_path(history_path),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizpulse.toml` in the current directory
/// 2. `~/.config/quizpulse/config.toml`
///
/// Environment variable overrides: `QUIZPULSE_QUIZ_URL`,
/// `QUIZPULSE_SUBMISSION_URL`, `QUIZPULSE_HISTORY_URL`.
pub fn load_config() -> Result<QuizpulseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizpulseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizpulse.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizpulseConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.source = config.source.as_ref().map(resolve_source_config);
    validate_rules(&config.rules)?;

    Ok(config)
}

/// Parse a TOML config string (no env handling).
pub fn parse_config(content: &str) -> Result<QuizpulseConfig> {
    Ok(toml::from_str::<QuizpulseConfig>(content)?)
}

fn apply_env_overrides(config: &mut QuizpulseConfig) -> Result<()> {
    let quiz = std::env::var("QUIZPULSE_QUIZ_URL").ok();
    let submission = std::env::var("QUIZPULSE_SUBMISSION_URL").ok();
    let history = std::env::var("QUIZPULSE_HISTORY_URL").ok();
    if quiz.is_none() && submission.is_none() && history.is_none() {
        return Ok(());
    }

    let (mut q, mut s, mut h, timeout) = match &config.source {
        Some(SourceConfig::Http {
            quiz_url,
            submission_url,
            history_url,
            timeout_secs,
        }) => (
            quiz_url.clone(),
            submission_url.clone(),
            history_url.clone(),
            *timeout_secs,
        ),
        _ => (String::new(), String::new(), String::new(), default_timeout()),
    };
    if let Some(v) = quiz {
        q = v;
    }
    if let Some(v) = submission {
        s = v;
    }
    if let Some(v) = history {
        h = v;
    }
    anyhow::ensure!(
        !q.is_empty() && !s.is_empty() && !h.is_empty(),
        "QUIZPULSE_*_URL overrides need all three URLs unless the config already has an http source"
    );

    config.source = Some(SourceConfig::Http {
        quiz_url: q,
        submission_url: s,
        history_url: h,
        timeout_secs: timeout,
    });
    Ok(())
}

/// Reject thresholds the rules cannot work with.
pub fn validate_rules(rules: &RecommendationRules) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&rules.weak_ratio),
        "rules.weak_ratio must be between 0.0 and 1.0"
    );
    anyhow::ensure!(
        (0.0..=1.0).contains(&rules.strong_ratio),
        "rules.strong_ratio must be between 0.0 and 1.0"
    );
    anyhow::ensure!(rules.trend_window >= 1, "rules.trend_window must be at least 1");
    anyhow::ensure!(
        rules.low_mean_threshold.is_finite(),
        "rules.low_mean_threshold must be a finite number"
    );
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizpulse"))
}

/// Create a data source from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn DataSource>> {
    match config {
        SourceConfig::Http {
            quiz_url,
            submission_url,
            history_url,
            timeout_secs,
        } => {
            for (name, url) in [
                ("quiz_url", quiz_url),
                ("submission_url", submission_url),
                ("history_url", history_url),
            ] {
                anyhow::ensure!(
                    url.starts_with("http://") || url.starts_with("https://"),
                    "source.{name} must be an http(s) URL, got '{url}'"
                );
            }
            Ok(Box::new(HttpSource::new(
                HttpEndpoints {
                    quiz_url: quiz_url.clone(),
                    submission_url: submission_url.clone(),
                    history_url: history_url.clone(),
                },
                *timeout_secs,
            )))
        }
        SourceConfig::Files {
            quiz_path,
            submission_path,
            history_path,
        } => Ok(Box::new(FileSource::new(
            quiz_path,
            submission_path,
            history_path,
        ))),
    }
}
