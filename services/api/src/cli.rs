use crate::demo::{run_access_check, run_browse, AccessCheckArgs, BrowseArgs};
use crate::server;
use agri_market::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Agri Market",
    about = "Serve and explore the agricultural commodity marketplace from the command line",
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
    /// Browse listings with the marketplace filters
    Listings {
        #[command(subcommand)]
        command: ListingsCommand,
    },
    /// Evaluate view access rules for a simulated session
    Access {
        #[command(subcommand)]
        command: AccessCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ListingsCommand {
    /// Filter, sort, and print listings from a CSV export or the demo data
    Browse(BrowseArgs),
}

#[derive(Subcommand, Debug)]
enum AccessCommand {
    /// Print the gate decision for a role against a view's requirements
    Check(AccessCheckArgs),
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
        Command::Listings {
            command: ListingsCommand::Browse(args),
        } => run_browse(args),
        Command::Access {
            command: AccessCommand::Check(args),
        } => run_access_check(args).await,
    }
}
