//! gradix CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradix", version, about = "Automated mission grading engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against a mission
    Grade {
        /// Learner identifier
        #[arg(long)]
        student_id: String,

        /// Path to the mission config TOML
        #[arg(long)]
        mission: PathBuf,

        /// Override the submission directory from the mission config
        #[arg(long)]
        submission_dir: Option<PathBuf>,

        /// Output directory for report files
        #[arg(long, default_value = "./results")]
        output: PathBuf,

        /// Output format: json, markdown, all
        #[arg(long, default_value = "all")]
        format: String,
    },

    /// Lint a mission config for common mistakes
    Lint {
        /// Path to the mission config TOML
        #[arg(long)]
        mission: PathBuf,
    },

    /// List the builtin validator ids
    ListValidators,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gradix=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            student_id,
            mission,
            submission_dir,
            output,
            format,
        } => commands::grade::execute(student_id, mission, submission_dir, output, format).await,
        Commands::Lint { mission } => commands::lint::execute(mission),
        Commands::ListValidators => commands::list_validators::execute(),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
