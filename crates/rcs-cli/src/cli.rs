use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rcs",
    about = "REST client SDK: mapping checks and dirty-data diffs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a mapping document against the naming conventions
    Check(CheckArgs),
    /// Print the fields of a model that differ from a clean snapshot
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Mapping document (`.toml` or `.json`)
    pub mapping: PathBuf,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Mapping document (`.toml` or `.json`)
    #[arg(long)]
    pub mapping: PathBuf,
    /// Class metadata key of the models
    #[arg(long)]
    pub key: String,
    /// Current model (JSON)
    pub new: PathBuf,
    /// Clean snapshot (JSON); the class's default shape when omitted
    pub old: Option<PathBuf>,
}
