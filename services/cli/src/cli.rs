use crate::allocate::{run_allocation, AllocateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gurukul_admissions::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Gurukul Admissions",
    about = "Assign students to classes from ranked preferences, eligibility rules, and capacity",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a batch allocation over CSV tables (default command)
    Allocate(AllocateArgs),
    /// Start the HTTP service
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Default enrollment id offset for requests that carry no policy
    #[arg(long)]
    pub(crate) enrollment_id_start: Option<u32>,
    /// Default to recording an Ineligible status for requests that carry no policy
    #[arg(long)]
    pub(crate) emit_ineligible: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Allocate(AllocateArgs::default()));

    match command {
        Command::Allocate(args) => run_allocation(args),
        Command::Serve(args) => server::run(args).await,
    }
}
