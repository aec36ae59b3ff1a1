use anyhow::Result;
use clap::Parser;
use psmanifest_core::Config;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize tracing with appropriate verbosity
    let filter = match cli.verbose {
        0 => config.verbosity.as_str(),
        1 => "debug",
        2.. => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // Process commands
    match &cli.command {
        Commands::Version(args) => {
            debug!("Version command: {:?}", args);
            cli::commands::version::execute(args, &config)?;
        }
        Commands::Attributes(args) => {
            debug!("Attributes command: {:?}", args);
            cli::commands::attributes::execute(args, &config)?;
        }
        Commands::Get(args) => {
            debug!("Get command: {:?}", args);
            cli::commands::get::execute(args, &config)?;
        }
    }

    Ok(())
}
