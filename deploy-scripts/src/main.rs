use clap::Parser;
use deploy_scripts::{cli::Cli, config::DeployConfig, errors::ScriptError};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // A missing `.env` file is fine, the environment may be set directly
    dotenvy::dotenv().ok();

    let Cli {
        config,
        verbose,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(log_level(verbose))
        .init();

    let config = DeployConfig::from_args(config, command.requires_signer())?;

    command.run(&config).await
}

/// The maximum log level for the given number of `-v` flags
fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
