use clap::{Args, Parser, Subcommand};
use folio_rank::error::AppError;

use crate::demo::{run_demo, run_recompute, DemoArgs, RecomputeArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Portfolio Scoring Service",
    about = "Serve and administer weighted project scoring for portfolio selection",
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
    /// Recompute and persist every project score across all organizations
    Recompute(RecomputeArgs),
    /// Run an end-to-end CLI demo covering preview, rescore, and recompute
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recompute(args) => run_recompute(args),
        Command::Demo(args) => run_demo(args),
    }
}
