use std::process::ExitCode;

use clap::Parser;

use dogma_cli::{Cli, Configuration, LoggingConfig, StderrNotifier, init_logging, run};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let _logging_guard = init_logging(&LoggingConfig::from_env())?;

    let configuration = Configuration::load(&cli)?;
    let created = run(&cli, &configuration, &StderrNotifier).await?;

    Ok(if created {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
