use crate::report::{run_export, run_offers, run_report, ExportArgs, OffersArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use prospect_kpi::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Prospecting KPI Reporter",
    about = "Compute prospecting funnel KPIs from CRM contact exports",
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
    /// Print call, e-mail and meeting KPIs for a CRM export
    Report(ReportArgs),
    /// Write the contacts kept by the filters back to CSV
    Export(ExportArgs),
    /// List the standard offer catalog
    Offers(OffersArgs),
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
        Command::Report(args) => run_report(args),
        Command::Export(args) => run_export(args),
        Command::Offers(args) => run_offers(args),
    }
}
