//! The `quizpulse validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizpulse_core::engine::{fetch_inputs, Analyzer};
use quizpulse_sources::config::load_config_from;

use super::{resolve_source, SourceArgs};

pub async fn execute(source_args: SourceArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let source = resolve_source(&source_args, &config)?;

    let inputs = fetch_inputs(source.as_ref()).await?;
    let summary = Analyzer::new(config.rules).inspect(&inputs)?;

    println!("Source: {}", source.name());
    println!("Questions: {}", summary.questions);
    println!("Answered: {}", summary.answered);
    if summary.unmatched_selections > 0 {
        println!(
            "  WARNING: {} selection(s) reference unknown questions and will be ignored",
            summary.unmatched_selections
        );
    }
    println!("Historical attempts: {}", summary.historical_attempts);
    for w in &summary.warnings {
        println!("  WARNING: {w}");
    }

    if summary.unmatched_selections == 0 && summary.warnings.is_empty() {
        println!("All payloads valid.");
    } else {
        println!(
            "\n{} warning(s) found.",
            summary.warnings.len() + usize::from(summary.unmatched_selections > 0)
        );
    }

    Ok(())
}
