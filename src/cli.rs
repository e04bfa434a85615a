use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the catalog over HTTP.
    Serve(ServeArgs),
    /// Write every catalog page as static HTML.
    Render(RenderArgs),
    /// Validate a catalog and print its size.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Catalog YAML file (default: `LEARNHUB_CATALOG`, then the built-in catalog).
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Output directory for the static site.
    #[arg(long)]
    pub out: PathBuf,

    /// Catalog YAML file (default: `LEARNHUB_CATALOG`, then the built-in catalog).
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Write into a non-empty output directory.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Catalog YAML file (default: `LEARNHUB_CATALOG`, then the built-in catalog).
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}
