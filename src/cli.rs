use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "zotbridge")]
#[command(about = "Zotero Connector bridge into a local document library", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the Zotero Connector protocol
    Server(ServerArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind to (overrides server.bind_addr)
    #[arg(long)]
    pub address: Option<SocketAddr>,

    /// Library name reported to the connector (overrides library.name)
    #[arg(long)]
    pub library: Option<String>,

    /// Config file, defaults to $ZOTBRIDGE_CONFIG or config/zotbridge.toml
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}
