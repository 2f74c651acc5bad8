mod platform;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = platform::cli::Cli::parse();
    platform::logging::initialize(cli.log, cli.verbose);
    platform::app::run(cli).await
}
