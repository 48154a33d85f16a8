mod config;
mod observability;

use clap::{Parser, Subcommand};
use config::{Config, ConfigError};
use gateway::config::ValidationError;
use gateway::errors::GatewayError;
use observability::ObservabilityError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Subscription gateway")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, global = true, default_value = "subgate.yaml")]
    config_file_path: PathBuf,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum CliCommand {
    /// Serve subscription requests
    Gateway,
    /// Check the configuration file and exit
    Validate,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("missing `{0}` section in config")]
    MissingSection(&'static str),
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Observability(#[from] ObservabilityError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::from_file(&cli.config_file_path)?;
    let gateway_config = config.gateway.ok_or(CliError::MissingSection("gateway"))?;

    match cli.command {
        CliCommand::Validate => {
            gateway_config.validate()?;
            println!("{}: ok", cli.config_file_path.display());
            Ok(())
        }
        CliCommand::Gateway => {
            let _guard = observability::init(&config.common)?;
            tracing::info!("Starting gateway");

            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            rt.block_on(gateway::run(gateway_config)).inspect_err(|err| {
                tracing::error!(error = %err, "Gateway stopped");
            })?;
            Ok(())
        }
    }
}
