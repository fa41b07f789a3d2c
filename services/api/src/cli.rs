use crate::commands::{run_assess, run_batch, AssessArgs, BatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_risk::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Default Risk",
    about = "Score loan applicants against the pre-trained default risk model",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single applicant and print the risk summary
    Assess(AssessArgs),
    /// Score every applicant in a CSV export
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

/// Overrides for the artifact locations configured through the environment.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ArtifactArgs {
    /// Path to the classifier artifact (JSON)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Path to the fitted scaler artifact (JSON)
    #[arg(long, conflicts_with = "no_scaler")]
    pub(crate) scaler: Option<PathBuf>,
    /// Feed unscaled features straight to the classifier
    #[arg(long)]
    pub(crate) no_scaler: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Batch(args) => run_batch(args),
    }
}
