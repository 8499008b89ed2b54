use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rootstock::cli::{Cli, Commands};
use rootstock::{commands, AppContext};
use rootstock_services::ensembl::EnsemblConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut config = EnsemblConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = &cli.base_url {
        config = config.base_url(url)?;
    }
    if let Some(secs) = cli.timeout {
        config = config.timeout(Duration::from_secs(secs));
    }

    let mut cx = AppContext {
        services: rootstock_services::get_services_with_config(config),
    };

    let outcome = match cli.command {
        Commands::Services(args) => commands::handle_services(args, &cx).map(|()| true),
        Commands::Params(args) => commands::handle_params(args, &cx).map(|()| true),
        Commands::Run(args) => commands::handle_run(args, &mut cx).await,
    };

    rootstock_services::release_services(cx.services);

    Ok(if outcome? { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
