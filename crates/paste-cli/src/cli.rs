use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pastebin", about = "Store a text under a name, read it back with a credential", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Store a text and print its credential
    Create(CreateArgs),
    /// Print the text stored under a name
    Read(ReadArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Keep everything in memory
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub name: String,
    /// Read the text from this file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReadArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short = 'u', long)]
    pub credential: String,
}
