use crate::demo::{run_bank_report, run_demo, BankReportArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use spectra::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Spectra Screening Service",
    about = "Run and demonstrate the adaptive two-phase screening service from the command line",
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
    /// Inspect a question-bank CSV export
    Bank {
        #[command(subcommand)]
        command: BankCommand,
    },
    /// Run an end-to-end CLI demo covering a full assessment session
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum BankCommand {
    /// Validate a bank export and print its catalog summary
    Report(BankReportArgs),
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
        Command::Bank {
            command: BankCommand::Report(args),
        } => run_bank_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
