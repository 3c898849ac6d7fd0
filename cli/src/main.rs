use clap::Parser;
use colored::Colorize;
use presentation::cli::{Cli, CliApp};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    shared::logging::init(cli.verbose);

    let result = match CliApp::new() {
        Ok(app) => app.run(cli).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
