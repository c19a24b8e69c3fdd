//! quizpulse CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::SourceArgs;

#[derive(Parser)]
#[command(
    name = "quizpulse",
    version,
    about = "Quiz performance analysis and study recommendations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a submission, summarize by topic, and recommend what to study
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, svg, all, none (comma-separated)
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check that the quiz, submission, and history payloads are well-formed
    Validate {
        #[command(flatten)]
        source: SourceArgs,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample data
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            source,
            output,
            format,
            config,
        } => commands::analyze::execute(source, output, format, config).await,
        Commands::Validate { source, config } => commands::validate::execute(source, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
