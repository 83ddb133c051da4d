use clap::{Args, Parser, Subcommand};

use crate::demo::{run_demo, DemoArgs};
use crate::server;
use ecotrack::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EcoTrack Service",
    about = "Run the EcoTrack sustainability backend from the command line",
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
    /// Challenge maintenance tasks
    Challenges {
        #[command(subcommand)]
        command: ChallengeCommand,
    },
    /// Run an end-to-end CLI demo covering the main workflows
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ChallengeCommand {
    /// Close every open participation whose challenge window has ended
    Expire(ExpireArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExpireArgs {
    /// Evaluate expiry as of this instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) as_of: Option<chrono::DateTime<chrono::Utc>>,
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
        Command::Challenges {
            command: ChallengeCommand::Expire(args),
        } => crate::demo::run_expire(args),
        Command::Demo(args) => run_demo(args),
    }
}
