use crate::demo::{run_dashboard, run_demo, run_questions, DashboardArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use esg_survey::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ESG Survey",
    about = "Run the ESG self-assessment service and inspect its results from the command line",
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
    /// Print the question catalog
    Questions,
    /// Print the admin dashboard for the configured submission store
    Dashboard(DashboardArgs),
    /// Submit synthetic assessments to a local store and print the resulting dashboard
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
        Command::Questions => run_questions(),
        Command::Dashboard(args) => run_dashboard(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
