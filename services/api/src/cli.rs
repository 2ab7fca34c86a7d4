use crate::demo::{run_demo, DemoArgs};
use crate::screening::{run_evaluate, run_screen, EvaluateArgs, ScreenArgs};
use crate::server;
use campus_placement::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Placement Gate",
    about = "Check placement drive eligibility and run the application gate service",
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
    /// Evaluate one student's education record against posting criteria
    Evaluate(EvaluateArgs),
    /// Screen a roster CSV against posting criteria
    Screen(ScreenArgs),
    /// Walk through eligibility checks, applications and triage on sample data
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Screen(args) => run_screen(args),
        Command::Demo(args) => run_demo(args),
    }
}
