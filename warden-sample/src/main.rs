use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use env_logger::Env;
use log::{error, info};
use warden_sample::config::Config;
use warden_sample::host::Host;
use warden_sample::sampleerror::SampleError;

use warden_sample::NAME;
use warden_sample::VERSION;

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration
    Validate {},
    /// Register the services, run a single sweep and print the listing
    Check {},
    /// Start the service registry until ctrl-c or TERM
    Start {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn check(config: &Config) -> Result<(), SampleError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let host = Host::new(config)?;
    let listing = runtime.block_on(host.check_once());
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

fn start(config: &Config) -> Result<(), SampleError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let mut host = Host::new(config)?;

    host.start()?;
    let watched = runtime.block_on(host.watch());
    host.stop()?;

    let failures = runtime.block_on(host.stop_services());
    if failures > 0 {
        error!("{} services failed to stop", failures);
    }
    watched
}

pub fn main() -> ExitCode {
    let log_level = Env::default().default_filter_or("info");
    env_logger::Builder::from_env(log_level).init();

    let cli = Cli::parse();

    info!("Value for config: {:?}", cli.config);

    let config: Config = match Config::figment(cli.config).extract() {
        Ok(config) => config,
        Err(err) => {
            error!("Config file not loaded: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let reply = match cli.command {
        Some(Commands::Validate {}) => {
            println!("Validating the configuration");
            println!("Config: {:?}", config);
            Ok(())
        }
        Some(Commands::Check {}) => check(&config),
        Some(Commands::Start {}) => {
            info!("Starting {}:{}", NAME, VERSION);
            start(&config)
        }
        None => {
            println!("No command specified");
            return ExitCode::FAILURE;
        }
    };

    match reply {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
