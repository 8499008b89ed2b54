use clap::{Args, Parser, Subcommand};

/// Rootstock: run bioinformatics services from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the Ensembl REST API.
    #[arg(long, env = "ENSEMBL_REST_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Timeout for remote requests, in seconds.
    #[arg(long, env = "ENSEMBL_REST_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (use multiple times for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available services.
    Services(ServicesArgs),
    /// Show the parameters accepted by a service.
    Params(ParamsArgs),
    /// Run a service once and print the resulting jobs.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct ServicesArgs {
    /// Print the services as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Alias of the service (e.g., ensembl/search).
    pub alias: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Alias of the service (e.g., ensembl/search).
    pub alias: String,

    /// Parameter values as name=value (e.g., -p query=AT1G01010 -p type=cds).
    #[arg(short = 'p', long = "param")]
    pub params: Vec<String>,

    /// Parameter values as a JSON object (e.g., '{"query": "AT1G01010"}').
    #[arg(long)]
    pub json_params: Option<String>,
}
