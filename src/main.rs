mod cli;

use clap::Parser;
use cli::{Cli, Commands, ServerArgs};
use tracing_subscriber::EnvFilter;
use zotbridge::{config::Config, connector};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let config = load_config(args)?;
            connector::run(config).await?
        }
    }

    Ok(())
}

fn load_config(args: ServerArgs) -> Result<Config, AnyError> {
    let mut config = match args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    if let Some(address) = args.address {
        config.server.bind_addr = address;
    }
    if let Some(library) = args.library {
        config.library.name = library;
    }

    config.validate()?;
    Ok(config)
}
