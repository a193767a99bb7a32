use clap::{Args, Parser, Subcommand};
use salescomp::error::AppError;

use crate::demo::{run_commission, run_demo, CommissionArgs, DemoArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Sales Commission Service",
    about = "Run and demonstrate the sales commission service from the command line",
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
    /// Seed the sample dataset and print every salesperson's commission breakdown
    Demo(DemoArgs),
    /// Compute one commission result against the seeded sample data
    Commission(CommissionArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload the in-memory stores with the sample dataset
    #[arg(long)]
    pub(crate) seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Commission(args) => run_commission(args).await,
    }
}
