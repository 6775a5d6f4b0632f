use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use relo_pricing::error::AppError;

use crate::demo::{run_demo, run_estimate, DemoArgs, EstimateArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Relocation Pricing Engine",
    about = "Run and exercise the relocation quote pricing service from the command line",
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
    /// Price a single estimate input from a JSON file
    Estimate(EstimateArgs),
    /// Walk one job through the standard rule set and print the quote
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
    /// Pricing configuration file (JSON). Defaults to the built-in standard set.
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Tariff tables file (JSON) replacing the configuration's tariffs.
    #[arg(long)]
    pub(crate) tariffs: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Demo(args) => run_demo(args),
    }
}
