//! markwise CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "markwise",
    version,
    about = "Assignment grading and concept-gap analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against a question set
    Grade {
        /// Path to the question set .toml file
        #[arg(long)]
        questions: PathBuf,

        /// Path to the submission .toml file
        #[arg(long)]
        answers: PathBuf,

        /// Student name (overrides the submission file)
        #[arg(long)]
        student: Option<String>,

        /// Output directory
        #[arg(long, default_value = "./markwise-reports")]
        output: PathBuf,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Validate question set TOML files
    Validate {
        /// Path to question set file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Compare two grade reports for the same question set
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Minimum credit-fraction change that counts as movement
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if any question slipped
        #[arg(long)]
        fail_on_slip: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Ask the AI tutor to solve a doubt step-by-step
    Doubt {
        /// The doubt to solve
        #[arg(long)]
        question: String,

        /// Subject the doubt belongs to
        #[arg(long, default_value = "General")]
        subject: String,

        /// Model to use (defaults to the configured doubt model)
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate AI performance insights from a grade report
    Insights {
        /// Grade report JSON to summarize
        #[arg(long, conflicts_with = "summary")]
        report: Option<PathBuf>,

        /// Raw performance summary text
        #[arg(long)]
        summary: Option<String>,

        /// Model to use (defaults to the configured insights model)
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available tutor models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("markwise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            questions,
            answers,
            student,
            output,
            format,
        } => commands::grade::execute(questions, answers, student, output, format),
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_slip,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_slip, format),
        Commands::Doubt {
            question,
            subject,
            model,
            config,
        } => commands::doubt::execute(question, subject, model, config).await,
        Commands::Insights {
            report,
            summary,
            model,
            config,
        } => commands::insights::execute(report, summary, model, config).await,
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
